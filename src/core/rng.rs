//! Deterministic random number generation for poll scheduling.
//!
//! The only randomness in a session is jitter on the poll interval.
//! A seeded ChaCha stream keeps schedules reproducible in tests, and
//! `for_context` gives two clients sharing a seed different streams.
//!
//! ```
//! use trilink::core::SessionRng;
//!
//! let base = SessionRng::new(42);
//! let mut a = base.for_context("party-1");
//! let mut b = base.for_context("party-1");
//! assert_eq!(a.gen_unit(), b.gen_unit());
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::hash::{Hash, Hasher};

/// Seeded RNG.
#[derive(Clone, Debug)]
pub struct SessionRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl SessionRng {
    /// Create an RNG from a seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Independent stream for a specific context (e.g. a party code).
    ///
    /// The same context always produces the same stream from the same seed.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;

        let mut hasher = DefaultHasher::new();
        self.seed.hash(&mut hasher);
        context.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Uniform sample in `[0, 1)`.
    pub fn gen_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// Uniform sample in `[-1, 1)`.
    pub fn gen_signed_unit(&mut self) -> f64 {
        self.gen_unit() * 2.0 - 1.0
    }

    /// Seed this RNG was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
