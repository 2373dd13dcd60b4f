//! Zones and the entity store.
//!
//! ## Key Types
//!
//! - `Zone`: Where an entity is (deck, hand, board, secret, ...)
//! - `EntityStore`: All entities plus per-player ordered zone collections

pub mod zone;
pub mod store;

pub use store::EntityStore;
pub use zone::Zone;
