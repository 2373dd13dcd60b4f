//! Trigger bus: reactive abilities and auras.
//!
//! Cards register typed callbacks on the [`TriggerBus`], usually from their
//! `setup` hook. Reactions run when the kernel fires an event; modifiers
//! run whenever a stat is computed.
//!
//! ## Key Components
//!
//! - [`EventKind`]: Tag of every event kind (macro-generated, closed set)
//! - [`Event`] / [`Query`]: Reaction and modifier payload traits
//! - [`TriggerBus`]: Storage in registration order, with lifetimes
//! - [`StatView`]: Read-only stat computation that applies auras
//!
//! ## Example Usage
//!
//! ```
//! use ccg_kernel::core::EntityId;
//! use ccg_kernel::triggers::{CalculateAttack, Lifetime, MinionDied, TriggerBus};
//!
//! let mut bus = TriggerBus::new();
//! let leader = EntityId(7);
//!
//! // "Your other minions have +1 Attack."
//! bus.modify::<CalculateAttack, _>(leader, Lifetime::InPlay, move |view, ctx, q, attack| {
//!     if q.entity != ctx.source && view.same_side(q.entity, ctx.source) {
//!         *attack += 1;
//!     }
//! });
//!
//! // "Whenever a minion dies, ..."
//! bus.on::<MinionDied, _>(leader, Lifetime::InPlay, |_game, _ctx, died| {
//!     let _ = died.position;
//!     Ok(())
//! });
//!
//! assert_eq!(bus.owned_by(leader).count(), 2);
//! ```

mod aura;
mod bus;
mod dispatch;
mod event;

pub use aura::StatView;
pub use bus::{Lifetime, Registration, RegistrationId, TriggerBus, TriggerContext};
pub use event::*;
