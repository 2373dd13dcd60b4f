//! Card effects and targeting.
//!
//! - [`EffectRegistry`]: typed map from card id to its [`CardEffects`] hooks
//! - [`targeting`]: which entities an action may select
//!
//! Hooks receive `&mut Game`, the source entity and, for targeted hooks, a
//! target that already passed [`can_target`]. A card without registered
//! hooks simply has no rules text.

mod hooks;
mod registry;
pub mod targeting;

pub use hooks::{CardEffects, Hook, HookName, SetupFn, TargetedFn};
pub use registry::EffectRegistry;
pub use targeting::{
    attack_targets, can_target, filter_targets, get_all_targetable, TargetScope, TargetingKind,
};
