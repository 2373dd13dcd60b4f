//! Card system: definitions, keywords, instances, catalog and factory.
//!
//! ## Key Types
//!
//! - `CardId`: Catalog identifier of a card definition
//! - `CardDefinition`: Static card data (deserializable catalog schema)
//! - `Keywords`: Keyword flags and counters of one entity
//! - `CardInstance`: Runtime entity state (zone, controller, damage, enchantments)
//! - `CardDatabase`: Card definition lookup

pub mod definition;
pub mod keywords;
pub mod instance;
pub mod database;
pub mod factory;

pub use definition::{CardClass, CardDefinition, CardId, CardType, Race, Rarity};
pub use keywords::{Keyword, Keywords};
pub use instance::{CardInstance, Enchantment};
pub use database::CardDatabase;
pub use factory::{create_instance, create_modular};
