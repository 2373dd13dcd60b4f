//! Copy-on-write snapshots for tree search.
//!
//! [`Snapshot`] is a generic map of parent-linked delta layers with O(1)
//! forking. [`GameSnapshot`] applies it to the public numbers of a game,
//! and [`MaterializedState`] is the flat, bincode-encodable result.
//!
//! Whole-game forking is separate: [`Game::fork`](crate::game::Game::fork)
//! shares structure through `im` collections.

mod game;
mod layer;

pub use game::{GameSnapshot, GlobalStat, MaterializedState, MinionState, PlayerStat, PlayerState};
pub use layer::Snapshot;
