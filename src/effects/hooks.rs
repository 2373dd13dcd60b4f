//! Card hook signatures.
//!
//! A card's rules text is implemented by up to four hooks. They are plain
//! function pointers so a [`CardEffects`] value is `Copy` and the registry
//! can be shared by every game without locking.

use std::fmt;
use std::str::FromStr;

use crate::core::{EntityId, KernelError, KernelResult};
use crate::effects::targeting::TargetScope;
use crate::game::Game;

/// `setup(game, source)` and `deathrattle(game, source)`.
pub type SetupFn = fn(&mut Game, EntityId) -> KernelResult<()>;

/// `battlecry(game, source, target)` and `on_play(game, source, target)`.
pub type TargetedFn = fn(&mut Game, EntityId, Option<EntityId>) -> KernelResult<()>;

/// Fixed hook names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookName {
    /// Called once when the card enters play; registers triggers and auras.
    Setup,
    Battlecry,
    /// Spells, hero powers and other non-battlecry play effects.
    OnPlay,
    Deathrattle,
}

impl HookName {
    pub const ALL: [HookName; 4] = [
        HookName::Setup,
        HookName::Battlecry,
        HookName::OnPlay,
        HookName::Deathrattle,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            HookName::Setup => "setup",
            HookName::Battlecry => "battlecry",
            HookName::OnPlay => "on_play",
            HookName::Deathrattle => "deathrattle",
        }
    }

    /// Whether the hook receives a target.
    #[must_use]
    pub const fn is_targeted(self) -> bool {
        matches!(self, HookName::Battlecry | HookName::OnPlay)
    }
}

impl fmt::Display for HookName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HookName {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookName::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| KernelError::UnknownHook(s.to_string()))
    }
}

/// A hook implementation of either shape, for registration by name.
#[derive(Clone, Copy)]
pub enum Hook {
    Untargeted(SetupFn),
    Targeted(TargetedFn),
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hook::Untargeted(_) => f.write_str("Hook::Untargeted"),
            Hook::Targeted(_) => f.write_str("Hook::Targeted"),
        }
    }
}

/// Hooks and targeting requirements for one card.
#[derive(Clone, Copy, Default)]
pub struct CardEffects {
    pub setup: Option<SetupFn>,
    pub battlecry: Option<TargetedFn>,
    pub on_play: Option<TargetedFn>,
    pub deathrattle: Option<SetupFn>,
    /// Where the played card's target may be chosen from. `None` means the
    /// card takes no target.
    pub target: Option<TargetScope>,
    /// Playing the card without a target is illegal when candidates exist.
    pub target_required: bool,
}

impl CardEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_setup(mut self, hook: SetupFn) -> Self {
        self.setup = Some(hook);
        self
    }

    #[must_use]
    pub fn with_battlecry(mut self, hook: TargetedFn) -> Self {
        self.battlecry = Some(hook);
        self
    }

    #[must_use]
    pub fn with_on_play(mut self, hook: TargetedFn) -> Self {
        self.on_play = Some(hook);
        self
    }

    #[must_use]
    pub fn with_deathrattle(mut self, hook: SetupFn) -> Self {
        self.deathrattle = Some(hook);
        self
    }

    /// Accept an optional target from `scope`.
    #[must_use]
    pub fn with_target(mut self, scope: TargetScope) -> Self {
        self.target = Some(scope);
        self
    }

    /// Require a target from `scope`.
    #[must_use]
    pub fn requires_target(mut self, scope: TargetScope) -> Self {
        self.target = Some(scope);
        self.target_required = true;
        self
    }

    /// Install `hook` under `name`. The hook's shape must match the name.
    pub fn set(&mut self, name: HookName, hook: Hook) -> Result<(), HookName> {
        match (name, hook) {
            (HookName::Setup, Hook::Untargeted(f)) => self.setup = Some(f),
            (HookName::Deathrattle, Hook::Untargeted(f)) => self.deathrattle = Some(f),
            (HookName::Battlecry, Hook::Targeted(f)) => self.battlecry = Some(f),
            (HookName::OnPlay, Hook::Targeted(f)) => self.on_play = Some(f),
            (name, _) => return Err(name),
        }
        Ok(())
    }

    /// Whether a hook is installed under `name`.
    #[must_use]
    pub fn has(&self, name: HookName) -> bool {
        match name {
            HookName::Setup => self.setup.is_some(),
            HookName::Battlecry => self.battlecry.is_some(),
            HookName::OnPlay => self.on_play.is_some(),
            HookName::Deathrattle => self.deathrattle.is_some(),
        }
    }
}

impl fmt::Debug for CardEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hooks: Vec<&str> = HookName::ALL
            .into_iter()
            .filter(|h| self.has(*h))
            .map(HookName::as_str)
            .collect();
        f.debug_struct("CardEffects")
            .field("hooks", &hooks)
            .field("target", &self.target)
            .field("target_required", &self.target_required)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut Game, _: EntityId) -> KernelResult<()> {
        Ok(())
    }

    fn noop_targeted(_: &mut Game, _: EntityId, _: Option<EntityId>) -> KernelResult<()> {
        Ok(())
    }

    #[test]
    fn test_hook_names_parse() {
        for name in HookName::ALL {
            assert_eq!(name.as_str().parse::<HookName>().unwrap(), name);
        }
        assert_eq!(
            "on_death".parse::<HookName>(),
            Err(KernelError::UnknownHook("on_death".into()))
        );
    }

    #[test]
    fn test_set_checks_shape() {
        let mut effects = CardEffects::new();
        assert!(effects.set(HookName::Setup, Hook::Untargeted(noop)).is_ok());
        assert!(effects.set(HookName::OnPlay, Hook::Targeted(noop_targeted)).is_ok());
        assert_eq!(
            effects.set(HookName::Battlecry, Hook::Untargeted(noop)),
            Err(HookName::Battlecry)
        );
        assert!(effects.has(HookName::Setup));
        assert!(effects.has(HookName::OnPlay));
        assert!(!effects.has(HookName::Battlecry));
    }

    #[test]
    fn test_debug_lists_hooks() {
        let effects = CardEffects::new().with_deathrattle(noop);
        let text = format!("{effects:?}");
        assert!(text.contains("deathrattle"));
        assert!(!text.contains("battlecry"));
    }
}
