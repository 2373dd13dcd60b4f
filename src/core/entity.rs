//! Entity identification.
//!
//! Every object the kernel tracks (minion, spell, hero, hero power, weapon,
//! token) has a unique `EntityId`. Ids are handed out by the
//! [`EntityStore`](crate::zones::EntityStore) in creation order, which is
//! also the order deaths are resolved in.
//!
//! ```
//! use ccg_kernel::core::EntityId;
//!
//! let first = EntityId::new(1);
//! let later = first.next();
//! assert!(first < later);
//! assert_eq!(format!("{}", later), "Entity(2)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for any game entity.
///
/// Ordering follows creation order ("play order"), so sorting a set of ids
/// yields the order in which simultaneous events are resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an entity ID from a raw value.
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// The id allocated right after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl From<u32> for EntityId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_follows_creation() {
        let a = EntityId::new(3);
        let b = a.next();
        let mut ids = vec![b, a, EntityId::new(1)];
        ids.sort();
        assert_eq!(ids, vec![EntityId::new(1), a, b]);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", EntityId(42)), "Entity(42)");
    }

    #[test]
    fn test_serialization() {
        let id = EntityId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: EntityId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }
}
