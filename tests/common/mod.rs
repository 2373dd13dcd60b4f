//! Shared fixtures: a small catalog with hooks and game helpers.

#![allow(dead_code)]

use std::sync::Arc;

use ccg_kernel::cards::{CardDatabase, CardDefinition, CardId, Keyword};
use ccg_kernel::core::{Action, EntityId, KernelConfig, KernelContext, KernelError, KernelResult, PlayerId};
use ccg_kernel::effects::{CardEffects, EffectRegistry, TargetScope};
use ccg_kernel::game::{Game, GameBuilder};
use ccg_kernel::triggers::{CalculateAttack, CalculateHealth, Lifetime};
use ccg_kernel::zones::Zone;

pub const WISP: &str = "wisp";
pub const SQUIRE: &str = "squire";
pub const YETI: &str = "yeti";
pub const CHAMPION: &str = "champion";
pub const SNIPER: &str = "sniper";
pub const HARVEST: &str = "harvest";
pub const GUARD: &str = "guard";
pub const ASSASSIN: &str = "assassin";
pub const FAERIE: &str = "faerie";
pub const FIREBALL: &str = "fireball";
pub const FLAMESTRIKE: &str = "flamestrike";
pub const MISFIRE: &str = "misfire";
pub const COIN: &str = "coin";
pub const BUBBLE: &str = "bubble";
pub const VIPER: &str = "viper";
pub const LEECH: &str = "leech";
pub const RAPTOR: &str = "raptor";

/// 2/3 for 1.
pub fn squire() -> CardDefinition {
    CardDefinition::minion(SQUIRE, "Squire", 1, 2, 3)
}

pub fn catalog() -> CardDatabase {
    CardDatabase::from_definitions([
        CardDefinition::minion(WISP, "Wisp", 0, 1, 1),
        squire(),
        CardDefinition::minion(YETI, "Yeti", 4, 4, 5),
        CardDefinition::minion(CHAMPION, "Champion", 7, 6, 6),
        CardDefinition::minion(SNIPER, "Sniper", 2, 2, 2),
        CardDefinition::minion(HARVEST, "Harvest Golem", 3, 2, 3),
        CardDefinition::minion(GUARD, "Guard", 2, 0, 4).with_keyword(Keyword::Taunt),
        CardDefinition::minion(ASSASSIN, "Assassin", 1, 1, 1).with_keyword(Keyword::Stealth),
        CardDefinition::minion(FAERIE, "Faerie", 2, 3, 2).with_keyword(Keyword::Elusive),
        CardDefinition::spell(FIREBALL, "Fireball", 4),
        CardDefinition::spell(FLAMESTRIKE, "Flamestrike", 7),
        CardDefinition::spell(MISFIRE, "Misfire", 1),
        CardDefinition::spell(COIN, "The Coin", 0),
        CardDefinition::minion(BUBBLE, "Bubble Knight", 2, 2, 2).with_keyword(Keyword::DivineShield),
        CardDefinition::minion(VIPER, "Viper", 1, 1, 1).with_keyword(Keyword::Poisonous),
        CardDefinition::minion(LEECH, "Leech", 2, 2, 2).with_keyword(Keyword::Lifesteal),
        CardDefinition::minion(RAPTOR, "Raptor", 3, 2, 3).with_keyword(Keyword::Windfury),
    ])
}

/// "Your other minions have +1/+1."
fn champion_setup(game: &mut Game, source: EntityId) -> KernelResult<()> {
    game.register_aura::<CalculateAttack, _>(source, Lifetime::InPlay, |view, ctx, q, value| {
        let buffed = view
            .entity(q.entity)
            .is_some_and(|e| e.is_minion() && e.zone == Zone::Board);
        if buffed && q.entity != ctx.source && view.same_side(q.entity, ctx.source) {
            *value += 1;
        }
    });
    game.register_aura::<CalculateHealth, _>(source, Lifetime::InPlay, |view, ctx, q, value| {
        let buffed = view
            .entity(q.entity)
            .is_some_and(|e| e.is_minion() && e.zone == Zone::Board);
        if buffed && q.entity != ctx.source && view.same_side(q.entity, ctx.source) {
            *value += 1;
        }
    });
    Ok(())
}

/// "Battlecry: Deal 2 damage."
fn sniper_battlecry(game: &mut Game, source: EntityId, target: Option<EntityId>) -> KernelResult<()> {
    if let Some(target) = target {
        game.deal_damage(Some(source), target, 2)?;
    }
    Ok(())
}

/// "Deathrattle: Summon a Wisp."
fn harvest_deathrattle(game: &mut Game, source: EntityId) -> KernelResult<()> {
    let player = game.require_entity(source)?.controller;
    game.summon_token(player, WISP, None)?;
    Ok(())
}

/// "Deal 6 damage."
fn fireball(game: &mut Game, source: EntityId, target: Option<EntityId>) -> KernelResult<()> {
    if let Some(target) = target {
        game.deal_damage(Some(source), target, 6)?;
    }
    Ok(())
}

/// "Deal 4 damage to all enemy minions."
fn flamestrike(game: &mut Game, source: EntityId, _: Option<EntityId>) -> KernelResult<()> {
    let enemy = game.require_entity(source)?.controller.opponent();
    for minion in game.board(enemy) {
        game.deal_damage(Some(source), minion, 4)?;
    }
    Ok(())
}

/// Hits the enemy hero, then fails.
fn misfire(game: &mut Game, source: EntityId, _: Option<EntityId>) -> KernelResult<()> {
    let enemy = game.require_entity(source)?.controller.opponent();
    let hero = game.player(enemy).hero;
    game.deal_damage(Some(source), hero, 3)?;
    Err(KernelError::effect("misfire"))
}

/// "Gain 1 Mana Crystal this turn only."
fn coin(game: &mut Game, source: EntityId, _: Option<EntityId>) -> KernelResult<()> {
    let player = game.require_entity(source)?.controller;
    game.player_mut(player).mana.gain_temp(1);
    Ok(())
}

pub fn registry() -> EffectRegistry {
    let mut effects = EffectRegistry::new();
    let entries = [
        (CHAMPION, CardEffects::new().with_setup(champion_setup)),
        (
            SNIPER,
            CardEffects::new()
                .with_battlecry(sniper_battlecry)
                .requires_target(TargetScope::any()),
        ),
        (HARVEST, CardEffects::new().with_deathrattle(harvest_deathrattle)),
        (
            FIREBALL,
            CardEffects::new().with_on_play(fireball).requires_target(TargetScope::any()),
        ),
        (FLAMESTRIKE, CardEffects::new().with_on_play(flamestrike)),
        (MISFIRE, CardEffects::new().with_on_play(misfire)),
        (COIN, CardEffects::new().with_on_play(coin)),
    ];
    for (card, hooks) in entries {
        effects.register(card, hooks).expect("unique card");
    }
    effects
}

pub fn context() -> Arc<KernelContext> {
    context_with(KernelConfig::default())
}

pub fn context_with(config: KernelConfig) -> Arc<KernelContext> {
    KernelContext::new(catalog(), registry(), config).expect("catalog and hooks agree")
}

/// Turn 0, empty hands and decks, first player to act with ten mana.
pub fn empty_game() -> Game {
    let mut game = GameBuilder::new(context())
        .seed(7)
        .no_shuffle()
        .no_opening()
        .build()
        .expect("empty game");
    give_mana(&mut game, PlayerId::FIRST, 10);
    game
}

/// A started game with 20-card decks.
pub fn full_game(seed: u64) -> Game {
    let deck: Vec<CardId> = [WISP, SQUIRE, YETI, SNIPER, HARVEST, GUARD, FIREBALL, CHAMPION, FAERIE, FLAMESTRIKE]
        .iter()
        .flat_map(|card| [CardId::from(*card), CardId::from(*card)])
        .collect();
    GameBuilder::new(context_with(KernelConfig::default().with_coin(COIN)))
        .seed(seed)
        .deck(PlayerId::FIRST, deck.clone())
        .deck(PlayerId::SECOND, deck)
        .build()
        .expect("full game")
}

pub fn give_mana(game: &mut Game, player: PlayerId, amount: u8) {
    let mana = &mut game.player_mut(player).mana;
    mana.max = amount;
    mana.current = amount;
}

pub fn in_hand(game: &mut Game, player: PlayerId, card: &str) -> EntityId {
    game.create_entity(player, &CardId::from(card), Zone::Hand, None)
        .expect("card in catalog")
}

/// Summon straight onto the board, running the card's setup.
pub fn summon(game: &mut Game, player: PlayerId, card: &str) -> EntityId {
    game.summon_token(player, card, None)
        .expect("summon")
        .expect("board has room")
}

/// Summon and clear summoning sickness.
pub fn summon_ready(game: &mut Game, player: PlayerId, card: &str) -> EntityId {
    let id = summon(game, player, card);
    game.require_entity_mut(id).expect("summoned").exhausted = false;
    id
}

pub fn play(game: &mut Game, card: EntityId, target: Option<EntityId>) -> KernelResult<()> {
    game.apply(Action::PlayCard { card, target, position: None })
}

pub fn stats(game: &Game, id: EntityId) -> (i32, i32) {
    (game.attack(id), game.health(id))
}
