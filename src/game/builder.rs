//! Game construction.

use std::sync::Arc;

use im::HashMap as ImHashMap;
use tracing::{debug, warn};

use super::Game;
use crate::cards::{CardDefinition, CardId, CardInstance};
use crate::core::{EntityId, KernelContext, KernelResult, Player, PlayerId, PlayerMap};
use crate::resources::{validate_deck, DeckRunes};
use crate::zones::{EntityStore, Zone};

const DEFAULT_HERO: &str = "HERO_DEFAULT";
const DEFAULT_HERO_POWER: &str = "HERO_POWER_DEFAULT";

#[derive(Clone, Debug, Default)]
struct Seat {
    deck: Vec<CardId>,
    hero: Option<CardId>,
    hero_power: Option<CardId>,
    runes: Option<DeckRunes>,
    sideboard: ImHashMap<CardId, Vec<CardId>>,
}

/// Builder for a [`Game`].
///
/// ```
/// use ccg_kernel::cards::{CardDatabase, CardDefinition};
/// use ccg_kernel::core::{KernelConfig, KernelContext, PlayerId};
/// use ccg_kernel::effects::EffectRegistry;
/// use ccg_kernel::game::GameBuilder;
///
/// let cards = CardDatabase::from_definitions([CardDefinition::minion("wisp", "Wisp", 0, 1, 1)]);
/// let ctx = KernelContext::new(cards, EffectRegistry::new(), KernelConfig::default()).unwrap();
///
/// let game = GameBuilder::new(ctx)
///     .seed(7)
///     .deck(PlayerId::FIRST, vec!["wisp".into(); 10])
///     .deck(PlayerId::SECOND, vec!["wisp".into(); 10])
///     .build()
///     .unwrap();
///
/// assert_eq!(game.active_player(), PlayerId::FIRST);
/// assert_eq!(game.hand(PlayerId::FIRST).len(), 4);
/// assert_eq!(game.hand(PlayerId::SECOND).len(), 4);
/// ```
#[derive(Clone, Debug)]
pub struct GameBuilder {
    ctx: Arc<KernelContext>,
    seed: u64,
    seats: PlayerMap<Seat>,
    shuffle: bool,
    opening: bool,
}

impl GameBuilder {
    #[must_use]
    pub fn new(ctx: Arc<KernelContext>) -> Self {
        Self {
            ctx,
            seed: 0,
            seats: PlayerMap::default(),
            shuffle: true,
            opening: true,
        }
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Deck list; the last card is on top when not shuffled.
    #[must_use]
    pub fn deck(mut self, player: PlayerId, cards: Vec<CardId>) -> Self {
        self.seats[player].deck = cards;
        self
    }

    /// Hero and hero power from the catalog.
    #[must_use]
    pub fn hero(mut self, player: PlayerId, hero: impl Into<CardId>, hero_power: impl Into<CardId>) -> Self {
        self.seats[player].hero = Some(hero.into());
        self.seats[player].hero_power = Some(hero_power.into());
        self
    }

    /// Rune slots the deck declares.
    #[must_use]
    pub fn runes(mut self, player: PlayerId, runes: DeckRunes) -> Self {
        self.seats[player].runes = Some(runes);
        self
    }

    /// Modules chosen for a modular card.
    #[must_use]
    pub fn sideboard(mut self, player: PlayerId, card: impl Into<CardId>, modules: Vec<CardId>) -> Self {
        self.seats[player].sideboard.insert(card.into(), modules);
        self
    }

    /// Keep decks in list order.
    #[must_use]
    pub fn no_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    /// Skip opening hands and the first turn start: the game begins on
    /// turn 0 with empty hands and no mana.
    #[must_use]
    pub fn no_opening(mut self) -> Self {
        self.opening = false;
        self
    }

    /// Validate decks and set up the game.
    ///
    /// Decks declaring runes are checked against them. With rune
    /// enforcement on, any violation rejects the game.
    pub fn build(self) -> KernelResult<Game> {
        self.check_runes()?;

        let config = self.ctx.config().clone();
        let mut store = EntityStore::new();
        let mut slots = PlayerMap::with_value((EntityId(0), EntityId(0)));
        for player in PlayerId::both() {
            let seat = &self.seats[player];
            let hero = self.hero_slot(&mut store, player, seat.hero.as_ref(), true, config.starting_health)?;
            let power = self.hero_slot(&mut store, player, seat.hero_power.as_ref(), false, 0)?;
            slots[player] = (hero, power);
        }
        let players = PlayerMap::new(|player| {
            let (hero, power) = slots[player];
            let seat = &self.seats[player];
            let mut state = Player::new(player, hero, power);
            state.runes = seat.runes;
            state.sideboard = seat.sideboard.clone();
            state
        });

        let mut game = Game::empty(Arc::clone(&self.ctx), self.seed, players, store);
        for player in PlayerId::both() {
            for card in &self.seats[player].deck {
                game.create_entity(player, card, Zone::Deck, None)?;
            }
        }

        if self.shuffle {
            for player in PlayerId::both() {
                game.entities.shuffle(player, Zone::Deck, &mut game.rng);
            }
        }

        if self.opening {
            for player in PlayerId::both() {
                for _ in 0..config.starting_hand[player.index()] {
                    game.draw(player)?;
                }
            }
            if let Some(coin) = &config.coin_card {
                game.add_to_hand(PlayerId::SECOND, coin.clone())?;
            }
            game.start_turn(PlayerId::FIRST)?;
        }

        debug!(seed = self.seed, entities = game.entities().len(), "game built");
        if config.verify_invariants {
            game.verify_invariants()?;
        }
        Ok(game)
    }

    fn check_runes(&self) -> KernelResult<()> {
        let enforce = self.ctx.config().enforce_rune_constraints;
        for player in PlayerId::both() {
            let seat = &self.seats[player];
            let Some(runes) = &seat.runes else { continue };
            let report = validate_deck(self.ctx.cards(), &seat.deck, runes);
            if report.is_valid() {
                continue;
            }
            if enforce {
                return report.into_result();
            }
            for violation in &report.violations {
                warn!(%player, %violation, "deck rune violation");
            }
        }
        Ok(())
    }

    fn hero_slot(
        &self,
        store: &mut EntityStore,
        player: PlayerId,
        card: Option<&CardId>,
        is_hero: bool,
        health: i32,
    ) -> KernelResult<EntityId> {
        let id = store.alloc_id();
        let instance = match card {
            Some(card) => {
                let def = self.ctx.cards().require(card)?;
                CardInstance::from_definition(id, def, player, Zone::Hero)
            }
            None if is_hero => {
                let def = CardDefinition::hero(DEFAULT_HERO, "Hero", health);
                CardInstance::from_definition(id, &def, player, Zone::Hero)
            }
            None => {
                let def = CardDefinition::hero_power(DEFAULT_HERO_POWER, "Hero Power", 2);
                CardInstance::from_definition(id, &def, player, Zone::Hero)
            }
        };
        store.insert(instance, None)?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::CardDatabase;
    use crate::core::{KernelConfig, KernelError};
    use crate::effects::EffectRegistry;

    fn ctx(config: KernelConfig) -> Arc<KernelContext> {
        let cards = CardDatabase::from_definitions([
            CardDefinition::minion("wisp", "Wisp", 0, 1, 1),
            CardDefinition::minion("blood", "Blood Card", 1, 1, 1).with_runes("BB"),
            CardDefinition::minion("frost", "Frost Card", 1, 1, 1).with_runes("BF"),
            CardDefinition::spell("coin", "The Coin", 0),
        ]);
        KernelContext::new(cards, EffectRegistry::new(), config).unwrap()
    }

    #[test]
    fn test_opening_hands_and_coin() {
        let game = GameBuilder::new(ctx(KernelConfig::default().with_coin("coin")))
            .deck(PlayerId::FIRST, vec!["wisp".into(); 10])
            .deck(PlayerId::SECOND, vec!["wisp".into(); 10])
            .build()
            .unwrap();

        // 3 + the first turn's draw.
        assert_eq!(game.hand(PlayerId::FIRST).len(), 4);
        // 4 + the coin.
        assert_eq!(game.hand(PlayerId::SECOND).len(), 5);
        assert_eq!(game.turn(), 1);
        assert_eq!(game.player(PlayerId::FIRST).mana.max, 1);
        assert_eq!(game.health(game.player(PlayerId::FIRST).hero), 30);
    }

    #[test]
    fn test_rune_violation_rejects_deck() {
        let result = GameBuilder::new(ctx(KernelConfig::default()))
            .deck(PlayerId::FIRST, vec!["blood".into(), "frost".into()])
            .runes(PlayerId::FIRST, DeckRunes::new(2, 0, 1).unwrap())
            .no_opening()
            .build();

        let Err(KernelError::DeckRejected(violations)) = result else {
            panic!("expected a rejected deck");
        };
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("Frost Card"));
    }

    #[test]
    fn test_rune_violation_warns_when_not_enforced() {
        let game = GameBuilder::new(ctx(KernelConfig::default().with_rune_enforcement(false)))
            .deck(PlayerId::FIRST, vec!["frost".into()])
            .runes(PlayerId::FIRST, DeckRunes::new(0, 0, 3).unwrap())
            .no_opening()
            .build()
            .unwrap();
        assert_eq!(game.deck(PlayerId::FIRST).len(), 1);
    }

    #[test]
    fn test_same_seed_same_deck_order() {
        let build = |seed| {
            let deck: Vec<CardId> = vec!["wisp".into(), "blood".into(), "frost".into(), "coin".into()];
            let game = GameBuilder::new(ctx(KernelConfig::default()))
                .seed(seed)
                .deck(PlayerId::FIRST, deck)
                .no_opening()
                .build()
                .unwrap();
            game.zone_entities(PlayerId::FIRST, Zone::Deck)
                .map(|e| e.card_id.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(build(11), build(11));
    }
}
