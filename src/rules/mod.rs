//! Rules engine trait for search collaborators.
//!
//! Search code drives a game through `RulesEngine`:
//! - Legal actions for the current state
//! - Applying an action
//! - Terminal check and result
//!
//! `Game` implements it, so the kernel is the game model; search code
//! never needs to know about sequences or triggers.

pub mod engine;

pub use engine::{GameResult, RulesEngine};
