//! Game state machine and input classification for the "not not" reaction game.
//!
//! The crate owns every decision the game makes: calibration of the near/far
//! thresholds, instruction generation, classification of a window of distance
//! samples, the shrinking response window, and the phase graph tying them
//! together. Hardware is reached only through the traits in [`ports`].

#![cfg_attr(not(test), no_std)]

pub mod alarm;
pub mod calibration;
pub mod classifier;
pub mod config;
pub mod controller;
pub mod difficulty;
pub mod error;
pub mod instruction;
pub mod phase;
pub mod ports;
pub mod score;

pub use alarm::Alarm;
pub use calibration::{CalibrationEngine, CalibrationReport, CalibrationTarget, Thresholds};
pub use classifier::{classify, SampleWindow, Verdict, WindowStats};
pub use config::GameConfig;
pub use controller::{
    ControllerEvent, ControllerOutput, GameController, InstructionPhase, SamplingPhase,
};
pub use difficulty::WindowSchedule;
pub use error::{GameError, SensorError};
pub use instruction::{Expectation, Instruction, InstructionGenerator, InstructionKind, XorShift32};
pub use phase::{
    GamePhase, PhaseApplyResult, PhaseApplyStatus, PhaseCommand, PhaseEngine, PhaseSnapshot,
    TutorialPhase,
};
pub use ports::{
    ConfirmLatch, DistanceSampler, Indicator, IndicatorOutput, PlayerIdentity, PlayerName,
    ScoreReporter, PLAYER_NAME_MAX,
};
pub use score::{PersistedHighScore, ScoreBoard, HIGH_SCORE_RECORD_LEN};

/// Distance reported by the sensor, in millimetres.
pub type Distance = u16;
