//! Phases and steps.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::KernelResult;
use crate::game::Game;

/// Named stages of the standard sequences.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseKind {
    OnPlay,
    EnterPlay,
    Battlecry,
    SecretActivation,
    AfterPlay,
    AfterSummon,
    AttackDeclaration,
    AttackTargeting,
    CombatDamage,
    AfterAttack,
    Cast,
    TurnStart,
    Draw,
    TurnEnd,
    DeathCheck,
    /// Phases built by effect code.
    Custom,
}

/// Whether a phase or sequence has run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Pending,
    Running,
    Completed,
    /// A step failed; the rest was skipped.
    Abandoned,
}

type StepFn = Box<dyn FnOnce(&mut Game) -> KernelResult<()>>;

/// One unit of work. A step runs at most once.
pub struct Step {
    label: &'static str,
    run: Option<StepFn>,
}

impl Step {
    pub fn new<F>(label: &'static str, f: F) -> Self
    where
        F: FnOnce(&mut Game) -> KernelResult<()> + 'static,
    {
        Self {
            label,
            run: Some(Box::new(f)),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Whether the step has already run.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.run.is_none()
    }

    /// Run the step. Later calls do nothing.
    pub fn execute(&mut self, game: &mut Game) -> KernelResult<()> {
        match self.run.take() {
            Some(f) => {
                trace!(step = self.label, "step");
                f(game)
            }
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Step")
            .field("label", &self.label)
            .field("done", &self.is_done())
            .finish()
    }
}

/// An ordered list of steps followed by a death check.
#[derive(Debug)]
pub struct Phase {
    kind: PhaseKind,
    steps: Vec<Step>,
    state: RunState,
}

impl Phase {
    #[must_use]
    pub fn new(kind: PhaseKind) -> Self {
        Self {
            kind,
            steps: Vec::new(),
            state: RunState::Pending,
        }
    }

    /// Builder form of [`Phase::push`].
    #[must_use]
    pub fn step<F>(mut self, label: &'static str, f: F) -> Self
    where
        F: FnOnce(&mut Game) -> KernelResult<()> + 'static,
    {
        self.push(Step::new(label, f));
        self
    }

    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    #[must_use]
    pub fn kind(&self) -> PhaseKind {
        self.kind
    }

    #[must_use]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every step in order, then resolve deaths. Stops at the first
    /// failing step.
    pub fn execute(&mut self, game: &mut Game) -> KernelResult<()> {
        self.state = RunState::Running;
        trace!(phase = ?self.kind, steps = self.steps.len(), "phase start");

        let result = self.run_steps(game).and_then(|()| game.process_deaths());

        self.state = if result.is_ok() {
            RunState::Completed
        } else {
            RunState::Abandoned
        };
        trace!(phase = ?self.kind, state = ?self.state, "phase end");
        result
    }

    fn run_steps(&mut self, game: &mut Game) -> KernelResult<()> {
        for step in &mut self.steps {
            step.execute(game)?;
        }
        Ok(())
    }
}
