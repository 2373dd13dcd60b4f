//! Game-level snapshots for search collaborators.
//!
//! A [`GameSnapshot`] captures the public numbers of a game (per-player
//! stats, boards and a few globals) as layered maps. Search code forks it
//! per branch, writes its hypotheses and reads them back, then
//! materializes a flat [`MaterializedState`] for feature encoding.

use serde::{Deserialize, Serialize};

use super::layer::Snapshot;
use crate::cards::CardId;
use crate::core::{EntityId, KernelError, KernelResult, PlayerId};
use crate::game::Game;
use crate::zones::Zone;

/// Per-player values. All values are `i64`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlayerStat {
    Health,
    MaxHealth,
    Armor,
    Mana,
    MaxMana,
    OverloadLocked,
    OverloadOwed,
    Corpses,
    Fatigue,
    HandSize,
    DeckSize,
    BoardSize,
    SecretCount,
    WeaponAttack,
    WeaponDurability,
    HeroPowerUsed,
    Defeated,
}

impl PlayerStat {
    pub const ALL: [PlayerStat; 17] = [
        PlayerStat::Health,
        PlayerStat::MaxHealth,
        PlayerStat::Armor,
        PlayerStat::Mana,
        PlayerStat::MaxMana,
        PlayerStat::OverloadLocked,
        PlayerStat::OverloadOwed,
        PlayerStat::Corpses,
        PlayerStat::Fatigue,
        PlayerStat::HandSize,
        PlayerStat::DeckSize,
        PlayerStat::BoardSize,
        PlayerStat::SecretCount,
        PlayerStat::WeaponAttack,
        PlayerStat::WeaponDurability,
        PlayerStat::HeroPowerUsed,
        PlayerStat::Defeated,
    ];
}

/// Game-wide values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GlobalStat {
    Turn,
    ActivePlayer,
    ActionCount,
}

/// A board minion as seen through auras.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinionState {
    pub entity: EntityId,
    pub card_id: CardId,
    pub attack: i32,
    pub health: i32,
    pub max_health: i32,
    pub can_attack: bool,
}

/// Layered per-player stats, boards and globals.
#[derive(Clone, Debug)]
pub struct GameSnapshot {
    players: Snapshot<(PlayerId, PlayerStat), i64>,
    boards: Snapshot<PlayerId, Vec<MinionState>>,
    globals: Snapshot<GlobalStat, i64>,
}

impl GameSnapshot {
    /// An empty snapshot; every stat reads 0 and every board is empty.
    #[must_use]
    pub fn new(flatten_threshold: usize) -> Self {
        Self {
            players: Snapshot::new(flatten_threshold),
            boards: Snapshot::new(flatten_threshold),
            globals: Snapshot::new(flatten_threshold),
        }
    }

    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            players: self.players.fork(),
            boards: self.boards.fork(),
            globals: self.globals.fork(),
        }
    }

    #[must_use]
    pub fn player_stat(&self, player: PlayerId, stat: PlayerStat) -> i64 {
        self.players.get(&(player, stat)).copied().unwrap_or(0)
    }

    pub fn set_player_stat(&mut self, player: PlayerId, stat: PlayerStat, value: i64) {
        self.players.set((player, stat), value);
    }

    #[must_use]
    pub fn global(&self, stat: GlobalStat) -> i64 {
        self.globals.get(&stat).copied().unwrap_or(0)
    }

    pub fn set_global(&mut self, stat: GlobalStat, value: i64) {
        self.globals.set(stat, value);
    }

    #[must_use]
    pub fn board(&self, player: PlayerId) -> &[MinionState] {
        self.boards.get(&player).map_or(&[], Vec::as_slice)
    }

    pub fn set_board(&mut self, player: PlayerId, board: Vec<MinionState>) {
        self.boards.set(player, board);
    }

    /// Deepest layer chain among the three maps.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.players.depth().max(self.boards.depth()).max(self.globals.depth())
    }

    /// Flatten into plain, serializable data.
    #[must_use]
    pub fn materialize(&self) -> MaterializedState {
        let players = PlayerId::both()
            .map(|player| PlayerState {
                player,
                stats: PlayerStat::ALL
                    .iter()
                    .map(|&stat| (stat, self.player_stat(player, stat)))
                    .collect(),
                board: self.board(player).to_vec(),
            })
            .collect();
        let mut globals: Vec<(GlobalStat, i64)> = self.globals.materialize().into_iter().collect();
        globals.sort_unstable();
        MaterializedState { players, globals }
    }
}

/// One player's flattened stats and board.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerState {
    pub player: PlayerId,
    /// Every [`PlayerStat`], in declaration order.
    pub stats: Vec<(PlayerStat, i64)>,
    pub board: Vec<MinionState>,
}

impl PlayerState {
    #[must_use]
    pub fn stat(&self, stat: PlayerStat) -> i64 {
        self.stats
            .iter()
            .find_map(|&(s, v)| (s == stat).then_some(v))
            .unwrap_or(0)
    }
}

/// A fully flattened snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedState {
    pub players: Vec<PlayerState>,
    /// Globals that were set, sorted by key.
    pub globals: Vec<(GlobalStat, i64)>,
}

impl MaterializedState {
    #[must_use]
    pub fn player(&self, player: PlayerId) -> Option<&PlayerState> {
        self.players.iter().find(|p| p.player == player)
    }

    /// Encode with bincode.
    pub fn to_bytes(&self) -> KernelResult<Vec<u8>> {
        bincode::serialize(self).map_err(|e| KernelError::Encoding(e.to_string()))
    }

    /// Decode bytes produced by [`MaterializedState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> KernelResult<Self> {
        bincode::deserialize(bytes).map_err(|e| KernelError::Encoding(e.to_string()))
    }
}

impl Game {
    /// Capture the public numbers of this game.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::new(self.config().snapshot_flatten_threshold);
        let view = self.view();

        for player in PlayerId::both() {
            let state = self.player(player);
            let (weapon_attack, weapon_durability) = state
                .weapon
                .map_or((0, 0), |w| (view.attack(w), view.health(w)));
            let count = |zone| self.entities().count(player, zone) as i64;

            let stats = [
                (PlayerStat::Health, i64::from(view.health(state.hero))),
                (PlayerStat::MaxHealth, i64::from(view.max_health(state.hero))),
                (PlayerStat::Armor, i64::from(state.armor)),
                (PlayerStat::Mana, i64::from(state.mana.available())),
                (PlayerStat::MaxMana, i64::from(state.mana.max)),
                (PlayerStat::OverloadLocked, i64::from(state.mana.overload_locked)),
                (PlayerStat::OverloadOwed, i64::from(state.mana.overload_owed)),
                (PlayerStat::Corpses, i64::from(state.corpses.count())),
                (PlayerStat::Fatigue, i64::from(state.fatigue)),
                (PlayerStat::HandSize, count(Zone::Hand)),
                (PlayerStat::DeckSize, count(Zone::Deck)),
                (PlayerStat::BoardSize, count(Zone::Board)),
                (PlayerStat::SecretCount, count(Zone::Secret)),
                (PlayerStat::WeaponAttack, i64::from(weapon_attack)),
                (PlayerStat::WeaponDurability, i64::from(weapon_durability)),
                (PlayerStat::HeroPowerUsed, i64::from(state.hero_power_used)),
                (PlayerStat::Defeated, i64::from(state.defeated)),
            ];
            for (stat, value) in stats {
                snap.set_player_stat(player, stat, value);
            }

            let board = self
                .zone_entities(player, Zone::Board)
                .map(|e| MinionState {
                    entity: e.entity_id,
                    card_id: e.card_id.clone(),
                    attack: view.attack(e.entity_id),
                    health: view.health(e.entity_id),
                    max_health: view.max_health(e.entity_id),
                    can_attack: self.can_attack(e.entity_id),
                })
                .collect();
            snap.set_board(player, board);
        }

        snap.set_global(GlobalStat::Turn, i64::from(self.turn()));
        snap.set_global(GlobalStat::ActivePlayer, i64::from(self.active_player().0));
        snap.set_global(GlobalStat::ActionCount, self.history().len() as i64);
        snap
    }
}
