//! Sequences: the phase pipeline every action runs through.
//!
//! An action becomes a [`Sequence`] of [`Phase`]s. Each phase runs its
//! steps and then resolves deaths, so a minion killed in one phase is gone
//! before the next begins. Card code may start nested sequences; the
//! [`SequenceManager`] keeps the stack of running frames.
//!
//! ## Key Components
//!
//! - [`Phase`] / [`Step`]: Named units of work, each run at most once
//! - [`Sequence`]: Ordered phases for one action or effect
//! - [`SequenceManager`]: Frame stack and counters
//! - [`templates`]: The standard sequence for each action
//!
//! ## Example Usage
//!
//! ```
//! use ccg_kernel::sequence::{templates, PhaseKind};
//! use ccg_kernel::core::{EntityId, PlayerId};
//!
//! let spell = templates::play_spell(PlayerId::FIRST, EntityId(9), None);
//! assert_eq!(spell.phase_kinds()[1], PhaseKind::Cast);
//! ```

mod death;
mod manager;
mod phase;
pub mod templates;

pub use manager::{Frame, Sequence, SequenceId, SequenceKind, SequenceManager};
pub use phase::{Phase, PhaseKind, RunState, Step};
