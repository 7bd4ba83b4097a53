use statig::blocking::IntoStateMachineExt as _;

use super::events::PhaseCommand;
use super::machine::{DispatchContext, PhaseMachine};
use super::types::{GamePhase, PhaseSnapshot, TutorialPhase};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PhaseApplyStatus {
    Applied,
    /// The command was valid but the phase already reflected it.
    Unchanged,
    /// The command means nothing in the current phase.
    Ignored,
}

#[derive(Clone, Copy, Debug)]
pub struct PhaseApplyResult {
    pub before: PhaseSnapshot,
    pub after: PhaseSnapshot,
    pub status: PhaseApplyStatus,
}

impl PhaseApplyResult {
    pub fn changed(self) -> bool {
        matches!(self.status, PhaseApplyStatus::Applied)
    }

    pub fn game_changed(self) -> bool {
        self.before.game != self.after.game
    }

    /// Tutorial step newly shown, when the command moved within the tutorial.
    pub fn tutorial_advanced(self) -> Option<TutorialPhase> {
        if self.changed()
            && !self.game_changed()
            && matches!(self.after.game, GamePhase::Tutorial)
            && self.before.tutorial != self.after.tutorial
        {
            Some(self.after.tutorial)
        } else {
            None
        }
    }

    /// Playing entered from a phase that does not continue a running match.
    pub fn starts_new_game(self) -> bool {
        matches!(self.after.game, GamePhase::Playing)
            && matches!(
                self.before.game,
                GamePhase::Tutorial | GamePhase::EndedPending
            )
    }
}

pub struct PhaseEngine {
    machine: statig::blocking::StateMachine<PhaseMachine>,
}

impl PhaseEngine {
    pub fn new() -> Self {
        Self {
            machine: PhaseMachine::new().state_machine(),
        }
    }

    pub fn snapshot(&self) -> PhaseSnapshot {
        self.machine.inner().snapshot
    }

    pub fn game(&self) -> GamePhase {
        self.snapshot().game
    }

    pub fn tutorial(&self) -> TutorialPhase {
        self.snapshot().tutorial
    }

    pub fn apply(&mut self, command: PhaseCommand) -> PhaseApplyResult {
        let before = self.snapshot();
        let mut context = DispatchContext::default();
        self.machine.handle_with_context(&command, &mut context);
        let after = self.snapshot();
        if before.game != after.game {
            log::debug!(
                "phase {} -> {} on {:?}",
                before.game.as_str(),
                after.game.as_str(),
                command
            );
        }
        PhaseApplyResult {
            before,
            after,
            status: context.status,
        }
    }
}

impl Default for PhaseEngine {
    fn default() -> Self {
        Self::new()
    }
}
