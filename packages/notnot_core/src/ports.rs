//! Collaborators the controller drives. Implementations live with the hardware.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::{error::SensorError, Distance};

pub const PLAYER_NAME_MAX: usize = 32;

pub type PlayerName = heapless::String<PLAYER_NAME_MAX>;

/// One blocking, time-bounded read of the proximity sensor.
pub trait DistanceSampler {
    fn read(&mut self) -> Result<Distance, SensorError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indicator {
    /// Lit when the instruction is negated.
    Negation,
    /// Near (on), far (off) or alternate (blinking).
    Cue,
}

pub trait IndicatorOutput {
    fn set(&mut self, indicator: Indicator, on: bool);
}

/// Each call asks the reporter to publish the current score state.
pub trait ScoreReporter {
    fn increment(&mut self);
    fn update_high_score(&mut self);
    fn reset(&mut self);
}

pub trait PlayerIdentity {
    fn player_name(&mut self) -> Option<PlayerName>;
}

impl PlayerIdentity for Option<PlayerName> {
    fn player_name(&mut self) -> Option<PlayerName> {
        self.take()
    }
}

/// Interrupt to tick hand-off for the confirm button.
///
/// The interrupt side only calls [`signal`](ConfirmLatch::signal); the tick
/// side drains it with [`take`](ConfirmLatch::take) before calling
/// `GameController::confirm`. Presses arriving between two ticks collapse into one.
pub struct ConfirmLatch {
    pending: AtomicBool,
}

impl ConfirmLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicBool::new(false),
        }
    }

    pub fn signal(&self) {
        self.pending.store(true, Ordering::Release);
    }

    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

impl Default for ConfirmLatch {
    fn default() -> Self {
        Self::new()
    }
}
