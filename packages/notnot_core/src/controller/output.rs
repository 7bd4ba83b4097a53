use core::fmt;

use crate::{
    calibration::{CalibrationReport, Thresholds},
    classifier::Verdict,
    instruction::Instruction,
    phase::{GamePhase, TutorialPhase},
};

const OUTPUT_SLOTS: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControllerEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    TutorialShown(TutorialPhase),
    CalibrationMeasured(CalibrationReport),
    CalibrationAccepted(Thresholds),
    /// Carries the default thresholds that were restored.
    CalibrationInvalid(Thresholds),
    InstructionShown(Instruction),
    Verdict {
        instruction: Instruction,
        verdict: Verdict,
    },
    WindowShortened { window_ms: u32 },
    GameOver { score: u8 },
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PhaseChanged { from, to } => {
                write!(f, "phase {} -> {}", from.as_str(), to.as_str())
            }
            Self::TutorialShown(step) => write!(f, "tutorial {}", step.as_str()),
            Self::CalibrationMeasured(report) => {
                write!(
                    f,
                    "calibrated {} valid={} failed={} threshold={}",
                    report.target.as_str(),
                    report.valid_samples,
                    report.failed_reads,
                    report.threshold
                )?;
                if let Some(mean) = report.mean {
                    write!(f, " mean={mean}")?;
                }
                Ok(())
            }
            Self::CalibrationAccepted(thresholds) => {
                write!(
                    f,
                    "calibration ok near={} far={}",
                    thresholds.near, thresholds.far
                )
            }
            Self::CalibrationInvalid(defaults) => {
                write!(
                    f,
                    "calibration invalid, defaults near={} far={}",
                    defaults.near, defaults.far
                )
            }
            Self::InstructionShown(instruction) => write!(f, "instruction {instruction}"),
            Self::Verdict {
                instruction,
                verdict,
            } => write!(f, "verdict {} {}", instruction, verdict.as_str()),
            Self::WindowShortened { window_ms } => write!(f, "window {window_ms}ms"),
            Self::GameOver { score } => write!(f, "game over score={score}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ControllerOutput {
    pub events: [Option<ControllerEvent>; OUTPUT_SLOTS],
}

impl ControllerOutput {
    pub fn iter(&self) -> impl Iterator<Item = &ControllerEvent> + '_ {
        self.events.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.events.iter().all(Option::is_none)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub(super) struct EventSink {
    events: [Option<ControllerEvent>; OUTPUT_SLOTS],
}

impl EventSink {
    pub(super) fn emit(&mut self, event: ControllerEvent) {
        for slot in &mut self.events {
            if slot.is_none() {
                *slot = Some(event);
                return;
            }
        }
        log::warn!("controller output full, dropped {:?}", event);
    }

    pub(super) fn finish(self) -> ControllerOutput {
        ControllerOutput {
            events: self.events,
        }
    }
}
