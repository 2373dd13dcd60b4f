//! Card id → hooks lookup.

use rustc_hash::FxHashMap;
use tracing::trace;

use super::hooks::{CardEffects, Hook, HookName};
use crate::cards::{CardDatabase, CardId};
use crate::core::{KernelError, KernelResult};

/// Hooks for every card with rules text. Built once at load time and then
/// shared read-only through the kernel context.
#[derive(Clone, Debug, Default)]
pub struct EffectRegistry {
    effects: FxHashMap<CardId, CardEffects>,
}

impl EffectRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card's hooks. Registering the same card twice is an error.
    pub fn register(&mut self, card: impl Into<CardId>, effects: CardEffects) -> KernelResult<()> {
        let card = card.into();
        if self.effects.contains_key(&card) {
            return Err(KernelError::DuplicateEffect(card));
        }
        self.effects.insert(card, effects);
        Ok(())
    }

    /// Add one hook by name, for catalogs that list hooks as strings.
    ///
    /// Fails on an unknown hook name, a hook of the wrong shape for the
    /// name, or a second hook under a name already filled.
    pub fn register_named(&mut self, card: impl Into<CardId>, name: &str, hook: Hook) -> KernelResult<()> {
        let card = card.into();
        let name: HookName = name.parse()?;
        let entry = self.effects.entry(card.clone()).or_default();
        if entry.has(name) {
            return Err(KernelError::DuplicateEffect(card));
        }
        entry.set(name, hook).map_err(|name| KernelError::HookSignature {
            card,
            hook: name.to_string(),
        })
    }

    /// Hooks for a card, if it has any.
    #[must_use]
    pub fn get(&self, card: &CardId) -> Option<&CardEffects> {
        self.effects.get(card)
    }

    /// Hooks for a card. Cards without rules text get the empty set, which
    /// makes every hook a no-op.
    #[must_use]
    pub fn effects_for(&self, card: &CardId) -> CardEffects {
        match self.effects.get(card) {
            Some(effects) => *effects,
            None => {
                trace!(%card, "no effects registered");
                CardEffects::default()
            }
        }
    }

    #[must_use]
    pub fn contains(&self, card: &CardId) -> bool {
        self.effects.contains_key(card)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Every registered id must exist in the catalog.
    pub fn validate(&self, cards: &CardDatabase) -> KernelResult<()> {
        let mut missing: Vec<&CardId> = self.effects.keys().filter(|id| !cards.contains(id)).collect();
        missing.sort();
        match missing.first() {
            Some(card) => Err(KernelError::UnknownCard((*card).clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDefinition;
    use crate::core::EntityId;
    use crate::game::Game;

    fn noop(_: &mut Game, _: EntityId) -> KernelResult<()> {
        Ok(())
    }

    fn noop_targeted(_: &mut Game, _: EntityId, _: Option<EntityId>) -> KernelResult<()> {
        Ok(())
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = EffectRegistry::new();
        registry.register("CS2_222", CardEffects::new().with_setup(noop)).unwrap();
        assert_eq!(
            registry.register("CS2_222", CardEffects::new()),
            Err(KernelError::DuplicateEffect("CS2_222".into()))
        );
    }

    #[test]
    fn test_register_named() {
        let mut registry = EffectRegistry::new();
        registry
            .register_named("EX1_001", "battlecry", Hook::Targeted(noop_targeted))
            .unwrap();
        registry
            .register_named("EX1_001", "deathrattle", Hook::Untargeted(noop))
            .unwrap();

        let effects = registry.get(&"EX1_001".into()).unwrap();
        assert!(effects.has(HookName::Battlecry));
        assert!(effects.has(HookName::Deathrattle));

        assert!(matches!(
            registry.register_named("EX1_001", "on_summon", Hook::Untargeted(noop)),
            Err(KernelError::UnknownHook(_))
        ));
        assert!(matches!(
            registry.register_named("EX1_002", "setup", Hook::Targeted(noop_targeted)),
            Err(KernelError::HookSignature { .. })
        ));
        assert!(matches!(
            registry.register_named("EX1_001", "battlecry", Hook::Targeted(noop_targeted)),
            Err(KernelError::DuplicateEffect(_))
        ));
    }

    #[test]
    fn test_missing_hooks_are_empty() {
        let registry = EffectRegistry::new();
        let effects = registry.effects_for(&"vanilla".into());
        assert!(HookName::ALL.into_iter().all(|h| !effects.has(h)));
    }

    #[test]
    fn test_validate_against_catalog() {
        let db = CardDatabase::from_definitions([CardDefinition::minion("known", "Known", 1, 1, 1)]);
        let mut registry = EffectRegistry::new();
        registry.register("known", CardEffects::new().with_setup(noop)).unwrap();
        assert!(registry.validate(&db).is_ok());

        registry.register("ghost", CardEffects::new()).unwrap();
        assert_eq!(registry.validate(&db), Err(KernelError::UnknownCard("ghost".into())));
    }
}
