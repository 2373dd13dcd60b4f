//! Fixtures for unit tests.

use crate::cards::{CardDefinition, CardId};
use crate::core::{EntityId, KernelConfig, KernelContext, PlayerId};
use crate::cards::CardDatabase;
use crate::effects::EffectRegistry;
use crate::game::{Game, GameBuilder};
use crate::zones::Zone;

/// A vanilla minion costing its attack.
pub(crate) fn minion(id: &str, attack: i32, health: i32) -> CardDefinition {
    CardDefinition::minion(id, id, attack, attack, health)
}

/// An empty game on turn 0: default heroes, no decks, and ten mana for the
/// first player.
pub(crate) struct GameFixture {
    pub game: Game,
}

impl GameFixture {
    pub fn new() -> Self {
        let ctx = KernelContext::new(CardDatabase::new(), EffectRegistry::new(), KernelConfig::default())
            .expect("empty context is valid");
        let mut game = GameBuilder::new(ctx)
            .no_shuffle()
            .no_opening()
            .build()
            .expect("empty game builds");
        let mana = &mut game.player_mut(PlayerId::FIRST).mana;
        mana.max = 10;
        mana.current = 10;
        Self { game }
    }

    /// Add a definition to the catalog.
    pub fn add_card(&mut self, def: CardDefinition) -> CardId {
        let id = def.id.clone();
        self.game.context_mut().cards_mut().insert(def);
        id
    }

    fn create(&mut self, player: PlayerId, def: CardDefinition, zone: Zone) -> EntityId {
        let card = self.add_card(def);
        self.game
            .create_entity(player, &card, zone, None)
            .expect("fixture entity")
    }

    /// A minion already on the board, still exhausted.
    pub fn put_on_board(&mut self, player: PlayerId, def: CardDefinition) -> EntityId {
        let id = self.create(player, def, Zone::Board);
        self.game.run_setup(id).expect("setup hook");
        id
    }

    pub fn put_in_hand(&mut self, player: PlayerId, def: CardDefinition) -> EntityId {
        self.create(player, def, Zone::Hand)
    }

    /// Put a card on top of the deck.
    pub fn put_in_deck(&mut self, player: PlayerId, def: CardDefinition) -> EntityId {
        self.create(player, def, Zone::Deck)
    }

    pub fn equip(&mut self, player: PlayerId, def: CardDefinition) -> EntityId {
        let id = self.create(player, def, Zone::SetAside);
        self.game.equip_weapon(player, id).expect("equip");
        id
    }

    /// Clear summoning sickness.
    pub fn ready(&mut self, id: EntityId) {
        self.game.require_entity_mut(id).expect("entity").exhausted = false;
    }
}
