//! Player seats, node occupancy, and per-player storage.
//!
//! ## Player
//!
//! The game has exactly two seats. `Player::A` is the seat that moves
//! first (server role 1), `Player::B` waits first (server role 2).
//!
//! ## Occupancy
//!
//! Closed three-way state of a node: unclaimed or owned by one seat.
//!
//! ## PlayerMap
//!
//! Fixed two-slot storage indexed by `Player`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two seats.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    /// First seat. Moves first.
    A,
    /// Second seat.
    B,
}

impl Player {
    /// Both seats, in turn order.
    pub const ALL: [Player; 2] = [Player::A, Player::B];

    /// The other seat.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Player::A => Player::B,
            Player::B => Player::A,
        }
    }

    /// Slot index (A = 0, B = 1).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Player::A => 0,
            Player::B => 1,
        }
    }

    /// Color tag sent with `pushMove`.
    #[must_use]
    pub const fn color_tag(self) -> &'static str {
        match self {
            Player::A => "blue",
            Player::B => "red",
        }
    }

    /// Parse a wire color tag.
    #[must_use]
    pub fn from_color_tag(tag: &str) -> Option<Self> {
        match tag {
            "blue" => Some(Player::A),
            "red" => Some(Player::B),
            _ => None,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Player::A => write!(f, "Player A"),
            Player::B => write!(f, "Player B"),
        }
    }
}

/// Occupancy of a single node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupancy {
    #[default]
    Unclaimed,
    PlayerA,
    PlayerB,
}

impl Occupancy {
    /// Occupancy value for a node claimed by `player`.
    #[must_use]
    pub const fn claimed_by(player: Player) -> Self {
        match player {
            Player::A => Occupancy::PlayerA,
            Player::B => Occupancy::PlayerB,
        }
    }

    /// The owning seat, if claimed.
    #[must_use]
    pub const fn owner(self) -> Option<Player> {
        match self {
            Occupancy::Unclaimed => None,
            Occupancy::PlayerA => Some(Player::A),
            Occupancy::PlayerB => Some(Player::B),
        }
    }

    /// Whether nobody owns the node.
    #[must_use]
    pub const fn is_unclaimed(self) -> bool {
        matches!(self, Occupancy::Unclaimed)
    }
}

/// Per-player data storage with O(1) access.
///
/// ```
/// use trilink::core::{Player, PlayerMap};
///
/// let mut stones: PlayerMap<u32> = PlayerMap::with_value(0);
/// stones[Player::B] += 1;
/// assert_eq!(stones[Player::A], 0);
/// assert_eq!(stones[Player::B], 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(Player) -> T) -> Self {
        Self {
            data: [factory(Player::A), factory(Player::B)],
        }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Value for `player`.
    #[must_use]
    pub fn get(&self, player: Player) -> &T {
        &self.data[player.index()]
    }

    /// Mutable value for `player`.
    pub fn get_mut(&mut self, player: Player) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (Player, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Player, &T)> {
        Player::ALL.into_iter().zip(self.data.iter())
    }
}

impl<T> Index<Player> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: Player) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<Player> for PlayerMap<T> {
    fn index_mut(&mut self, player: Player) -> &mut Self::Output {
        self.get_mut(player)
    }
}
