//! Player actions.
//!
//! An `Action` is what a caller asks the kernel to do. The sequence manager
//! turns each one into a Sequence of Phases. Legality is checked before the
//! first step runs, so a rejected action leaves the game untouched.

use serde::{Deserialize, Serialize};

use super::entity::EntityId;
use super::player::PlayerId;

/// A request from the active player.
///
/// ```
/// use ccg_kernel::core::{Action, EntityId};
///
/// let play = Action::PlayCard { card: EntityId(12), target: None, position: Some(0) };
/// assert_eq!(play.source(), Some(EntityId(12)));
/// assert_eq!(Action::EndTurn.source(), None);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Play a card from hand. `position` is the board slot for minions
    /// (appended when `None`).
    PlayCard {
        card: EntityId,
        target: Option<EntityId>,
        position: Option<usize>,
    },

    /// Attack with a minion or hero.
    Attack {
        attacker: EntityId,
        defender: EntityId,
    },

    /// Use the hero power.
    HeroPower { target: Option<EntityId> },

    /// Resolve a pending discover by picking one of the offered options.
    ChooseDiscover(usize),

    /// Pass the turn.
    EndTurn,
}

impl Action {
    /// Entity that initiates the action, if any.
    #[must_use]
    pub fn source(&self) -> Option<EntityId> {
        match self {
            Action::PlayCard { card, .. } => Some(*card),
            Action::Attack { attacker, .. } => Some(*attacker),
            Action::HeroPower { .. } | Action::ChooseDiscover(_) | Action::EndTurn => None,
        }
    }

    /// Entity the action is aimed at, if any.
    #[must_use]
    pub fn target(&self) -> Option<EntityId> {
        match self {
            Action::PlayCard { target, .. } | Action::HeroPower { target } => *target,
            Action::Attack { defender, .. } => Some(*defender),
            Action::ChooseDiscover(_) | Action::EndTurn => None,
        }
    }
}

/// A recorded action with metadata for history tracking.
///
/// Used for replay and debugging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The player who took this action.
    pub player: PlayerId,

    /// The action taken.
    pub action: Action,

    /// Turn number when action was taken.
    pub turn: u32,

    /// Sequence number within the turn (for ordering).
    pub sequence: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(player: PlayerId, action: Action, turn: u32, sequence: u32) -> Self {
        Self {
            player,
            action,
            turn,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_and_target() {
        let attack = Action::Attack {
            attacker: EntityId(3),
            defender: EntityId(9),
        };
        assert_eq!(attack.source(), Some(EntityId(3)));
        assert_eq!(attack.target(), Some(EntityId(9)));

        let power = Action::HeroPower {
            target: Some(EntityId(4)),
        };
        assert_eq!(power.source(), None);
        assert_eq!(power.target(), Some(EntityId(4)));
    }

    #[test]
    fn test_action_hash() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash = |a: &Action| {
            let mut h = DefaultHasher::new();
            a.hash(&mut h);
            h.finish()
        };

        let a1 = Action::ChooseDiscover(1);
        let a2 = Action::ChooseDiscover(1);
        let a3 = Action::ChooseDiscover(2);

        assert_eq!(hash(&a1), hash(&a2));
        assert_ne!(hash(&a1), hash(&a3));
    }

    #[test]
    fn test_action_record_serialization() {
        let action = Action::PlayCard {
            card: EntityId(5),
            target: Some(EntityId(2)),
            position: None,
        };
        let record = ActionRecord::new(PlayerId::new(1), action, 2, 3);

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: ActionRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(record, deserialized);
    }
}
