use statig::prelude::*;

use super::engine::PhaseApplyStatus;
use super::events::PhaseCommand;
use super::types::{GamePhase, PhaseSnapshot, TutorialPhase};

#[derive(Clone, Copy, Debug)]
pub(super) struct PhaseMachine {
    pub(super) snapshot: PhaseSnapshot,
}

#[derive(Clone, Copy, Debug)]
pub(super) struct DispatchContext {
    pub(super) status: PhaseApplyStatus,
}

impl Default for DispatchContext {
    fn default() -> Self {
        Self {
            status: PhaseApplyStatus::Ignored,
        }
    }
}

impl PhaseMachine {
    pub(super) fn new() -> Self {
        Self {
            snapshot: PhaseSnapshot::initial(),
        }
    }

    fn enter(&mut self, context: &mut DispatchContext, phase: GamePhase) -> Outcome<State> {
        self.snapshot.game = phase;
        context.status = PhaseApplyStatus::Applied;
        match phase {
            GamePhase::Initialized => Transition(State::initialized()),
            GamePhase::CalibratingNear => Transition(State::calibrating_near()),
            GamePhase::CalibratingNearPending => Transition(State::calibrating_near_pending()),
            GamePhase::CalibratingFar => Transition(State::calibrating_far()),
            GamePhase::CalibratingFarPending => Transition(State::calibrating_far_pending()),
            GamePhase::Tutorial => {
                self.snapshot.tutorial = TutorialPhase::Start;
                Transition(State::tutorial())
            }
            GamePhase::Playing => Transition(State::playing()),
            GamePhase::Paused => Transition(State::paused()),
            GamePhase::PausedPending => Transition(State::paused_pending()),
            GamePhase::Ending => Transition(State::ending()),
            GamePhase::Ended => Transition(State::ended()),
            GamePhase::EndedPending => Transition(State::ended_pending()),
        }
    }

    fn on(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseCommand,
        trigger: PhaseCommand,
        target: GamePhase,
    ) -> Outcome<State> {
        if *event == trigger {
            self.enter(context, target)
        } else {
            Super
        }
    }
}

#[state_machine(initial = "State::initialized()")]
impl PhaseMachine {
    #[state(superstate = "session")]
    fn initialized(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseCommand,
    ) -> Outcome<State> {
        self.on(context, event, PhaseCommand::Confirm, GamePhase::CalibratingNear)
    }

    #[state(superstate = "session")]
    fn calibrating_near(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseCommand,
    ) -> Outcome<State> {
        self.on(
            context,
            event,
            PhaseCommand::StepComplete,
            GamePhase::CalibratingNearPending,
        )
    }

    #[state(superstate = "session")]
    fn calibrating_near_pending(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseCommand,
    ) -> Outcome<State> {
        self.on(context, event, PhaseCommand::Confirm, GamePhase::CalibratingFar)
    }

    #[state(superstate = "session")]
    fn calibrating_far(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseCommand,
    ) -> Outcome<State> {
        self.on(
            context,
            event,
            PhaseCommand::StepComplete,
            GamePhase::CalibratingFarPending,
        )
    }

    #[state(superstate = "session")]
    fn calibrating_far_pending(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseCommand,
    ) -> Outcome<State> {
        self.on(context, event, PhaseCommand::Confirm, GamePhase::Tutorial)
    }

    #[state(superstate = "session")]
    fn tutorial(&mut self, context: &mut DispatchContext, event: &PhaseCommand) -> Outcome<State> {
        match event {
            PhaseCommand::Confirm => match self.snapshot.tutorial.next() {
                Some(next) => {
                    self.snapshot.tutorial = next;
                    context.status = PhaseApplyStatus::Applied;
                    Handled
                }
                None => self.enter(context, GamePhase::Playing),
            },
            _ => Super,
        }
    }

    #[state(superstate = "session")]
    fn playing(&mut self, context: &mut DispatchContext, event: &PhaseCommand) -> Outcome<State> {
        match event {
            PhaseCommand::Confirm => self.enter(context, GamePhase::Paused),
            PhaseCommand::AnswerIncorrect => self.enter(context, GamePhase::Ending),
            _ => Super,
        }
    }

    #[state(superstate = "session")]
    fn paused(&mut self, context: &mut DispatchContext, event: &PhaseCommand) -> Outcome<State> {
        self.on(
            context,
            event,
            PhaseCommand::StepComplete,
            GamePhase::PausedPending,
        )
    }

    #[state(superstate = "session")]
    fn paused_pending(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseCommand,
    ) -> Outcome<State> {
        self.on(context, event, PhaseCommand::Confirm, GamePhase::Playing)
    }

    #[state(superstate = "session")]
    fn ending(&mut self, context: &mut DispatchContext, event: &PhaseCommand) -> Outcome<State> {
        self.on(context, event, PhaseCommand::StepComplete, GamePhase::Ended)
    }

    #[state(superstate = "finished")]
    fn ended(&mut self, context: &mut DispatchContext, event: &PhaseCommand) -> Outcome<State> {
        self.on(
            context,
            event,
            PhaseCommand::StepComplete,
            GamePhase::EndedPending,
        )
    }

    #[state(superstate = "finished")]
    fn ended_pending(
        &mut self,
        context: &mut DispatchContext,
        event: &PhaseCommand,
    ) -> Outcome<State> {
        // Restart keeps the calibration.
        self.on(context, event, PhaseCommand::Confirm, GamePhase::Playing)
    }

    #[superstate]
    fn session(&mut self, context: &mut DispatchContext, event: &PhaseCommand) -> Outcome<State> {
        match event {
            PhaseCommand::ConnectivityLost => self.enter(context, GamePhase::Ended),
            _ => {
                context.status = PhaseApplyStatus::Ignored;
                Handled
            }
        }
    }

    #[superstate]
    fn finished(&mut self, context: &mut DispatchContext, event: &PhaseCommand) -> Outcome<State> {
        match event {
            PhaseCommand::Restart => self.enter(context, GamePhase::Initialized),
            PhaseCommand::ConnectivityLost => {
                context.status = PhaseApplyStatus::Unchanged;
                Handled
            }
            _ => {
                context.status = PhaseApplyStatus::Ignored;
                Handled
            }
        }
    }
}
