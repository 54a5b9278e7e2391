//! Node identification.
//!
//! Every claimable position on the board has a `NodeId`.
//!
//! ## ID Layout
//!
//! Ids are 1-based and follow the order of the loaded geometry feed:
//! the first coordinate line is node 1, the second node 2, and so on.
//! The raw value `0` is never a node; on the wire it is the "no move yet"
//! sentinel.
//!
//! ```
//! use trilink::core::NodeId;
//!
//! let node = NodeId::new(5);
//! assert_eq!(node.raw(), 5);
//! assert_eq!(node.index(), 4);
//!
//! assert_eq!(NodeId::from_wire(0), None);
//! assert_eq!(NodeId::from_wire(7), Some(NodeId::new(7)));
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a board node (1-based, never zero).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Raw value used on the wire for "no move yet".
    pub const SENTINEL: u32 = 0;

    /// Create a node ID.
    ///
    /// Panics if `id` is zero.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        assert!(id != Self::SENTINEL, "Node ids start at 1");
        Self(id)
    }

    /// Decode a wire value, mapping the sentinel to `None`.
    #[must_use]
    pub const fn from_wire(raw: u32) -> Option<Self> {
        if raw == Self::SENTINEL {
            None
        } else {
            Some(Self(raw))
        }
    }

    /// Node ID for a 0-based position in the geometry feed.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// 0-based position in the geometry feed.
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for index in [0usize, 1, 23] {
            assert_eq!(NodeId::from_index(index).index(), index);
        }
        assert_eq!(NodeId::from_index(0), NodeId::new(1));
    }

    #[test]
    fn test_sentinel() {
        assert_eq!(NodeId::from_wire(NodeId::SENTINEL), None);
        assert_eq!(NodeId::from_wire(24), Some(NodeId(24)));
    }

    #[test]
    #[should_panic(expected = "Node ids start at 1")]
    fn test_zero_rejected() {
        let _ = NodeId::new(0);
    }

    #[test]
    fn test_ordering() {
        assert!(NodeId::new(2) < NodeId::new(10));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", NodeId::new(42)), "Node(42)");
    }

    #[test]
    fn test_serialization() {
        let id = NodeId::new(17);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "17");
        let deserialized: NodeId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
