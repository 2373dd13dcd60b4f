//! Resource tests: corpses, runes and mana.

mod common;

use ccg_kernel::cards::{CardDatabase, CardDefinition, CardId};
use ccg_kernel::core::{Action, KernelConfig, KernelContext, KernelError, PlayerId};
use ccg_kernel::effects::EffectRegistry;
use ccg_kernel::game::GameBuilder;
use ccg_kernel::resources::{validate_deck, CorpseCounter, DeckRunes, RuneRequirement};
use proptest::prelude::*;

use common::*;

/// Blood-heavy runes take blood cards; frost needs a frost slot.
#[test]
fn test_rune_slots() {
    let runes = DeckRunes::new(2, 1, 0).unwrap();
    assert!(runes.can_include(&RuneRequirement::parse("BB")));
    assert!(runes.can_include(&RuneRequirement::parse("BF")));
    assert!(!runes.can_include(&RuneRequirement::parse("BBB")));

    let unholy = DeckRunes::new(2, 0, 1).unwrap();
    assert!(!unholy.can_include(&RuneRequirement::parse("BF")));
    assert!(unholy.can_include(&RuneRequirement::parse("BU")));
}

/// Rune counts must fill exactly three slots.
#[test]
fn test_set_runes_rejects_bad_totals() {
    let mut runes = DeckRunes::new(3, 0, 0).unwrap();
    assert_eq!(runes.set_runes(1, 1, 0), Err(KernelError::InvalidRuneCount(2)));
    assert_eq!(runes.set_runes(2, 2, 0), Err(KernelError::InvalidRuneCount(4)));
    // Unchanged after a failed set.
    assert_eq!(runes, DeckRunes::new(3, 0, 0).unwrap());
}

fn rune_catalog() -> CardDatabase {
    CardDatabase::from_definitions([
        CardDefinition::minion("blood", "Blood Card", 1, 1, 1).with_runes("BB"),
        CardDefinition::minion("frost", "Frost Card", 1, 1, 1).with_runes("BF"),
        CardDefinition::minion("plain", "Plain Card", 1, 1, 1),
    ])
}

/// The report lists every offending card and still gets built.
#[test]
fn test_deck_report_lists_violations() {
    let db = rune_catalog();
    let deck: Vec<CardId> = ["blood", "frost", "plain", "frost", "missing"]
        .into_iter()
        .map(CardId::from)
        .collect();
    let report = validate_deck(&db, &deck, &DeckRunes::new(2, 0, 1).unwrap());

    assert!(!report.is_valid());
    assert_eq!(report.violations.len(), 3);
    assert!(report.violations[2].contains("missing"));
}

/// Enforcement rejects the game; without it the game builds anyway.
#[test]
fn test_rune_enforcement() {
    let deck = vec![CardId::from("frost"); 5];
    let build = |enforce: bool| {
        let config = KernelConfig::default().with_rune_enforcement(enforce);
        let ctx = KernelContext::new(rune_catalog(), EffectRegistry::new(), config).unwrap();
        GameBuilder::new(ctx)
            .deck(PlayerId::FIRST, deck.clone())
            .runes(PlayerId::FIRST, DeckRunes::new(2, 0, 1).unwrap())
            .build()
    };

    assert!(matches!(build(true), Err(KernelError::DeckRejected(v)) if v.len() == 5));
    assert!(build(false).is_ok());
}

/// Deaths feed corpses; spending more than owned changes nothing.
#[test]
fn test_corpses_from_deaths() {
    let mut game = empty_game();
    let squire = summon(&mut game, PlayerId::FIRST, SQUIRE);
    game.destroy(squire).unwrap();
    game.process_deaths().unwrap();

    let corpses = &mut game.player_mut(PlayerId::FIRST).corpses;
    assert_eq!(corpses.count(), 1);
    assert!(!corpses.can_spend(2));
    assert!(!corpses.spend(2));
    assert_eq!(corpses.count(), 1);
    assert!(corpses.spend(1));
    assert_eq!(corpses.count(), 0);
}

/// The coin's temporary mana is spent before crystals.
#[test]
fn test_temporary_mana() {
    let mut game = empty_game();
    give_mana(&mut game, PlayerId::FIRST, 1);
    let coin = in_hand(&mut game, PlayerId::FIRST, COIN);
    let sniper = in_hand(&mut game, PlayerId::FIRST, SNIPER);

    play(&mut game, coin, None).unwrap();
    assert_eq!(game.player(PlayerId::FIRST).mana.available(), 2);

    let enemy_hero = game.player(PlayerId::SECOND).hero;
    play(&mut game, sniper, Some(enemy_hero)).unwrap();
    assert_eq!(game.player(PlayerId::FIRST).mana.available(), 0);
    assert_eq!(game.health(enemy_hero), 28);
}

/// Mana grows one crystal per turn up to the cap.
#[test]
fn test_mana_grows_per_turn() {
    let ctx = context_with(KernelConfig::default().with_starting_health(1_000));
    let mut game = GameBuilder::new(ctx).seed(1).build().unwrap();
    assert_eq!(game.player(PlayerId::FIRST).mana.max, 1);

    game.apply(Action::EndTurn).unwrap();
    assert_eq!(game.player(PlayerId::SECOND).mana.max, 1);
    for _ in 0..30 {
        game.apply(Action::EndTurn).unwrap();
    }
    for player in PlayerId::both() {
        assert_eq!(game.player(player).mana.max, 10);
    }
    assert!(!game.is_over());
}

proptest! {
    /// Corpses never go negative whatever the spend sequence.
    #[test]
    fn prop_corpse_spend_is_safe(start in 0u32..10, ops in prop::collection::vec((any::<bool>(), 0u32..5), 0..50)) {
        let mut corpses = CorpseCounter::new(start);
        let mut expected = i64::from(start);
        for (add, amount) in ops {
            if add {
                corpses.add(amount);
                expected += i64::from(amount);
            } else {
                let can = corpses.can_spend(amount);
                prop_assert_eq!(can, expected >= i64::from(amount));
                prop_assert_eq!(corpses.spend(amount), can);
                if can {
                    expected -= i64::from(amount);
                }
            }
            prop_assert_eq!(i64::from(corpses.count()), expected);
        }
    }

    /// A deck's runes accept a card exactly when no colour needs more slots
    /// than the deck has.
    #[test]
    fn prop_rune_inclusion(b in 0u8..=3, f in 0u8..=3, card in "[BFU]{0,3}") {
        prop_assume!(b + f <= 3);
        let runes = DeckRunes::new(b, f, 3 - b - f).unwrap();
        let req = RuneRequirement::parse(&card);
        let fits = req.blood <= b && req.frost <= f && req.unholy <= 3 - b - f;
        prop_assert_eq!(runes.can_include(&req), fits);
    }
}
