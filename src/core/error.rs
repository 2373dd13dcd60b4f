//! Kernel errors.
//!
//! Everything fallible in the kernel returns [`KernelResult`]. Illegal actions
//! are rejected before any step runs. Invariant violations are fatal: the
//! running sequence is abandoned and the game should be discarded.

use thiserror::Error;

use crate::cards::CardId;
use crate::core::EntityId;

/// Result alias used across the kernel and by card hooks.
pub type KernelResult<T> = Result<T, KernelError>;

/// Why an action was refused.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalAction {
    #[error("it is not this player's turn")]
    NotYourTurn,

    #[error("not enough mana: need {need}, have {have}")]
    NotEnoughMana { need: u8, have: u8 },

    #[error("board is full")]
    BoardFull,

    #[error("invalid target {0}")]
    InvalidTarget(EntityId),

    #[error("a target is required")]
    TargetRequired,

    #[error("{0} is not in hand")]
    NotInHand(EntityId),

    #[error("{0} cannot attack")]
    CannotAttack(EntityId),

    #[error("{0} cannot be played")]
    Unplayable(EntityId),

    #[error("hero power already used this turn")]
    HeroPowerUsed,

    #[error("a discover choice is pending")]
    PendingChoice,

    #[error("no discover choice is pending")]
    NoPendingChoice,

    #[error("no discover option {0}")]
    InvalidChoice(usize),

    #[error("the game is over")]
    GameOver,
}

/// Errors raised by the kernel.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("illegal action: {0}")]
    Illegal(#[from] IllegalAction),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("unknown card id {0}")]
    UnknownCard(CardId),

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("{0} is not on the board")]
    NotOnBoard(EntityId),

    #[error("effects already registered for {0}")]
    DuplicateEffect(CardId),

    #[error("unknown hook name {0:?}")]
    UnknownHook(String),

    #[error("hook {hook} has the wrong signature for {card}")]
    HookSignature { card: CardId, hook: String },

    #[error("rune counts must sum to 3, got {0}")]
    InvalidRuneCount(u8),

    #[error("deck rejected: {}", .0.join("; "))]
    DeckRejected(Vec<String>),

    #[error("encoding failed: {0}")]
    Encoding(String),

    #[error("effect failed: {0}")]
    Effect(String),
}

impl KernelError {
    /// Fatal errors mean the game state can no longer be trusted.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, KernelError::InvariantViolation(_))
    }

    /// Shorthand used by effect code.
    pub fn effect(message: impl Into<String>) -> Self {
        KernelError::Effect(message.into())
    }
}
