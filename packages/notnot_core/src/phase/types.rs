#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GamePhase {
    Initialized,
    CalibratingNear,
    CalibratingNearPending,
    CalibratingFar,
    CalibratingFarPending,
    Tutorial,
    Playing,
    Paused,
    PausedPending,
    Ending,
    Ended,
    EndedPending,
}

impl GamePhase {
    /// Phases that only wait for the confirm button.
    pub const fn awaits_confirm(self) -> bool {
        matches!(
            self,
            Self::Initialized
                | Self::CalibratingNearPending
                | Self::CalibratingFarPending
                | Self::PausedPending
                | Self::EndedPending
        )
    }

    pub const fn is_ended(self) -> bool {
        matches!(self, Self::Ended | Self::EndedPending)
    }

    /// A match is running, paused, or finishing its end sequence.
    pub const fn in_match(self) -> bool {
        matches!(
            self,
            Self::Playing | Self::Paused | Self::PausedPending | Self::Ending
        )
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initialized => "initialized",
            Self::CalibratingNear => "calibrating_near",
            Self::CalibratingNearPending => "calibrating_near_pending",
            Self::CalibratingFar => "calibrating_far",
            Self::CalibratingFarPending => "calibrating_far_pending",
            Self::Tutorial => "tutorial",
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::PausedPending => "paused_pending",
            Self::Ending => "ending",
            Self::Ended => "ended",
            Self::EndedPending => "ended_pending",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TutorialPhase {
    Start,
    Near,
    Far,
    Alternate,
    Negation,
    Pause,
    GameEnd,
}

impl TutorialPhase {
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Start => Some(Self::Near),
            Self::Near => Some(Self::Far),
            Self::Far => Some(Self::Alternate),
            Self::Alternate => Some(Self::Negation),
            Self::Negation => Some(Self::Pause),
            Self::Pause => Some(Self::GameEnd),
            Self::GameEnd => None,
        }
    }

    /// Steady levels shown as `(negation, cue)`; `None` for the cue means blinking.
    pub const fn demo_levels(self) -> (bool, Option<bool>) {
        match self {
            Self::Start | Self::Pause => (false, Some(false)),
            Self::Near => (false, Some(true)),
            Self::Far => (false, Some(false)),
            Self::Alternate => (false, None),
            Self::Negation | Self::GameEnd => (true, Some(true)),
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Near => "near",
            Self::Far => "far",
            Self::Alternate => "alternate",
            Self::Negation => "negation",
            Self::Pause => "pause",
            Self::GameEnd => "game_end",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PhaseSnapshot {
    pub game: GamePhase,
    pub tutorial: TutorialPhase,
}

impl PhaseSnapshot {
    pub const fn initial() -> Self {
        Self {
            game: GamePhase::Initialized,
            tutorial: TutorialPhase::Start,
        }
    }
}

impl Default for PhaseSnapshot {
    fn default() -> Self {
        Self::initial()
    }
}
