//! Sequences and the frame stack.

use std::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use super::phase::{Phase, PhaseKind, RunState};
use crate::core::KernelResult;
use crate::game::Game;

/// What produced a sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SequenceKind {
    PlayMinion,
    PlaySpell,
    PlayWeapon,
    HeroPower,
    Attack,
    EndTurn,
    StartTurn,
    /// Started by card effect code.
    Effect,
}

/// Unique identifier for a started sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SequenceId(pub u32);

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sequence({})", self.0)
    }
}

/// An ordered list of phases.
#[derive(Debug)]
pub struct Sequence {
    kind: SequenceKind,
    phases: Vec<Phase>,
}

impl Sequence {
    #[must_use]
    pub fn new(kind: SequenceKind) -> Self {
        Self {
            kind,
            phases: Vec::new(),
        }
    }

    /// Append a phase.
    #[must_use]
    pub fn then(mut self, phase: Phase) -> Self {
        self.phases.push(phase);
        self
    }

    pub fn push(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    #[must_use]
    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    #[must_use]
    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Phase kinds in run order.
    #[must_use]
    pub fn phase_kinds(&self) -> Vec<PhaseKind> {
        self.phases.iter().map(Phase::kind).collect()
    }
}

/// Bookkeeping for a running sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    pub id: SequenceId,
    pub kind: SequenceKind,
    /// Phase currently running, if any.
    pub phase: Option<PhaseKind>,
    pub state: RunState,
}

/// Stack of running sequences.
///
/// Starting a sequence while another runs pushes a frame. When the nested
/// sequence ends its frame is popped and the interrupted one resumes.
#[derive(Clone, Debug, Default)]
pub struct SequenceManager {
    frames: SmallVec<[Frame; 4]>,
    started: u32,
    completed: u32,
}

impl SequenceManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Running sequences, outermost first.
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// The innermost running sequence.
    #[must_use]
    pub fn current(&self) -> Option<&Frame> {
        self.frames.last()
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sequences started so far.
    #[must_use]
    pub fn started(&self) -> u32 {
        self.started
    }

    /// Sequences that ran to completion.
    #[must_use]
    pub fn completed(&self) -> u32 {
        self.completed
    }

    fn begin(&mut self, kind: SequenceKind) -> SequenceId {
        self.started += 1;
        let id = SequenceId(self.started);
        self.frames.push(Frame {
            id,
            kind,
            phase: None,
            state: RunState::Running,
        });
        id
    }

    fn enter_phase(&mut self, phase: PhaseKind) {
        if let Some(frame) = self.frames.last_mut() {
            frame.phase = Some(phase);
        }
    }

    fn end(&mut self, ok: bool) -> Option<Frame> {
        let mut frame = self.frames.pop()?;
        frame.phase = None;
        frame.state = if ok {
            self.completed += 1;
            RunState::Completed
        } else {
            RunState::Abandoned
        };
        Some(frame)
    }
}

impl Game {
    /// Run a sequence to completion.
    ///
    /// Phases run in order and each ends with a death check. If a step
    /// fails the rest of the sequence is skipped, its frame is popped and
    /// the error returned; changes already made stay in place.
    pub fn run_sequence(&mut self, mut sequence: Sequence) -> KernelResult<()> {
        let id = self.sequences_mut().begin(sequence.kind);
        debug!(%id, kind = ?sequence.kind, depth = self.sequences().depth(), "sequence start");

        let mut result = Ok(());
        for phase in &mut sequence.phases {
            self.sequences_mut().enter_phase(phase.kind());
            result = phase.execute(self);
            if result.is_err() {
                break;
            }
        }

        let frame = self.sequences_mut().end(result.is_ok());
        debug!(%id, state = ?frame.map(|f| f.state), "sequence end");
        result
    }
}
