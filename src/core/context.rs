//! Shared, read-only game context.
//!
//! A `KernelContext` bundles the card catalog, the effect registry and the
//! configuration. Callers build it once and hand an `Arc` of it to every
//! game; forks share the same context.

use std::sync::Arc;

use crate::cards::CardDatabase;
use crate::core::{KernelConfig, KernelResult};
use crate::effects::EffectRegistry;

/// Catalog, hooks and limits shared by every game.
#[derive(Clone, Debug)]
pub struct KernelContext {
    cards: CardDatabase,
    effects: EffectRegistry,
    config: KernelConfig,
}

impl KernelContext {
    /// Bundle a context. The registry is validated against the catalog so
    /// that a hook for an unknown card fails here and not mid-game.
    pub fn new(
        cards: CardDatabase,
        effects: EffectRegistry,
        config: KernelConfig,
    ) -> KernelResult<Arc<Self>> {
        effects.validate(&cards)?;
        Ok(Arc::new(Self {
            cards,
            effects,
            config,
        }))
    }

    /// Card catalog.
    #[must_use]
    pub fn cards(&self) -> &CardDatabase {
        &self.cards
    }

    /// Effect registry.
    #[must_use]
    pub fn effects(&self) -> &EffectRegistry {
        &self.effects
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &KernelConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn cards_mut(&mut self) -> &mut CardDatabase {
        &mut self.cards
    }

    #[cfg(test)]
    pub(crate) fn effects_mut(&mut self) -> &mut EffectRegistry {
        &mut self.effects
    }
}
