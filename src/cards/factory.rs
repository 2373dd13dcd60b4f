//! Entity construction from catalog ids.
//!
//! The factory turns a `CardId` into a `CardInstance`. Unknown ids are an
//! error. Modular cards absorb their module cards (stats, cost and keywords)
//! up to the configured module limit.

use tracing::trace;

use super::database::CardDatabase;
use super::definition::CardId;
use super::instance::CardInstance;
use super::keywords::Keywords;
use crate::core::{EntityId, KernelResult, PlayerId};
use crate::zones::Zone;

/// Build an entity for `card_id`.
pub fn create_instance(
    db: &CardDatabase,
    entity_id: EntityId,
    card_id: &CardId,
    owner: PlayerId,
    zone: Zone,
) -> KernelResult<CardInstance> {
    let def = db.require(card_id)?;
    Ok(CardInstance::from_definition(entity_id, def, owner, zone))
}

/// Build a modular card with its modules merged in.
///
/// Modules past `max_modules` and module ids missing from the catalog are
/// ignored.
pub fn create_modular(
    db: &CardDatabase,
    entity_id: EntityId,
    card_id: &CardId,
    modules: &[CardId],
    max_modules: usize,
    owner: PlayerId,
    zone: Zone,
) -> KernelResult<CardInstance> {
    let mut instance = create_instance(db, entity_id, card_id, owner, zone)?;

    for module_id in modules.iter().take(max_modules) {
        let Some(module) = db.get(module_id) else {
            trace!(%card_id, module = %module_id, "module not in catalog");
            continue;
        };
        instance.base_attack += module.attack;
        instance.base_health += module.health;
        instance.base_cost += module.cost;

        let mut granted = Keywords::from_list(&module.keywords);
        granted.spell_damage = module.spell_damage;
        instance.keywords.absorb(&granted);
        instance.modules.push(module_id.clone());
    }

    Ok(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{CardDefinition, Keyword};
    use crate::core::KernelError;

    fn db() -> CardDatabase {
        CardDatabase::from_definitions([
            CardDefinition::minion("TOY_330", "Zilliax Deluxe 3000", 0, 0, 0),
            CardDefinition::minion("TOY_330t5", "Perfect Module", 2, 2, 2)
                .with_keyword(Keyword::DivineShield)
                .with_keyword(Keyword::Taunt),
            CardDefinition::minion("TOY_330t9", "Virus Module", 3, 3, 3)
                .with_keyword(Keyword::Poisonous),
            CardDefinition::minion("TOY_330t11", "Pylon Module", 2, 1, 2),
        ])
    }

    #[test]
    fn test_unknown_card_is_error() {
        let err = create_instance(&db(), EntityId(1), &CardId::new("XXX"), PlayerId::FIRST, Zone::Deck)
            .unwrap_err();
        assert_eq!(err, KernelError::UnknownCard(CardId::new("XXX")));
    }

    #[test]
    fn test_modules_merge_up_to_limit() {
        let modules = [
            CardId::new("TOY_330t5"),
            CardId::new("TOY_330t9"),
            CardId::new("TOY_330t11"),
        ];
        let zilliax = create_modular(
            &db(),
            EntityId(1),
            &CardId::new("TOY_330"),
            &modules,
            2,
            PlayerId::FIRST,
            Zone::Deck,
        )
        .unwrap();

        assert_eq!(zilliax.base_attack, 5);
        assert_eq!(zilliax.base_health, 5);
        assert_eq!(zilliax.base_cost, 5);
        assert!(zilliax.keywords.taunt);
        assert!(zilliax.keywords.divine_shield);
        assert!(zilliax.keywords.poisonous);
        assert_eq!(zilliax.modules.len(), 2);
    }

    #[test]
    fn test_missing_module_is_skipped() {
        let zilliax = create_modular(
            &db(),
            EntityId(1),
            &CardId::new("TOY_330"),
            &[CardId::new("gone"), CardId::new("TOY_330t11")],
            2,
            PlayerId::FIRST,
            Zone::Deck,
        )
        .unwrap();
        assert_eq!(zilliax.base_health, 2);
        assert_eq!(zilliax.modules.len(), 1);
    }
}
