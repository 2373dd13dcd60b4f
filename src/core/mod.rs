//! Core kernel types: entities, players, actions, RNG, configuration, errors.
//!
//! These are the building blocks every other module uses.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod error;
pub mod context;

pub use entity::EntityId;
pub use player::{Player, PlayerId, PlayerMap, PLAYER_COUNT};
pub use rng::{GameRng, GameRngState};
pub use config::KernelConfig;
pub use action::{Action, ActionRecord};
pub use error::{IllegalAction, KernelError, KernelResult};
pub use context::KernelContext;
