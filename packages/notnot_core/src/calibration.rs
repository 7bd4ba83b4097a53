use crate::{error::GameError, ports::DistanceSampler, Distance};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub near: Distance,
    pub far: Distance,
}

impl Thresholds {
    pub const fn is_separated(self) -> bool {
        self.far > self.near
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalibrationTarget {
    Near,
    Far,
}

impl CalibrationTarget {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Near => "near",
            Self::Far => "far",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalibrationReport {
    pub target: CalibrationTarget,
    pub valid_samples: u8,
    pub failed_reads: u8,
    /// Mean of the valid samples, `None` when every read failed.
    pub mean: Option<Distance>,
    /// Threshold in force after the run.
    pub threshold: Distance,
}

pub struct CalibrationEngine {
    thresholds: Thresholds,
    defaults: Thresholds,
    margin_mm: Distance,
    sample_count: u8,
}

impl CalibrationEngine {
    pub const fn new(defaults: Thresholds, margin_mm: Distance, sample_count: u8) -> Self {
        Self {
            thresholds: defaults,
            defaults,
            margin_mm,
            sample_count,
        }
    }

    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    pub fn margin_mm(&self) -> Distance {
        self.margin_mm
    }

    /// Collects one batch of samples and derives the threshold for `target`.
    pub fn run_calibration_phase<S: DistanceSampler>(
        &mut self,
        target: CalibrationTarget,
        sampler: &mut S,
    ) -> CalibrationReport {
        let mut sum = 0u32;
        let mut valid_samples = 0u8;
        let mut failed_reads = 0u8;

        for _ in 0..self.sample_count {
            match sampler.read() {
                Ok(distance) => {
                    sum += distance as u32;
                    valid_samples += 1;
                }
                Err(err) => {
                    log::debug!("calibration read failed: {}", err);
                    failed_reads += 1;
                }
            }
        }

        let mean = if valid_samples == 0 {
            None
        } else {
            Some((sum / valid_samples as u32) as Distance)
        };

        if let Some(mean) = mean {
            match target {
                CalibrationTarget::Near => {
                    self.thresholds.near = mean.saturating_add(self.margin_mm);
                }
                CalibrationTarget::Far => {
                    self.thresholds.far = mean.saturating_sub(self.margin_mm);
                }
            }
        }

        let threshold = match target {
            CalibrationTarget::Near => self.thresholds.near,
            CalibrationTarget::Far => self.thresholds.far,
        };
        log::info!(
            "calibration {:?}: valid={} failed={} threshold={}",
            target,
            valid_samples,
            failed_reads,
            threshold
        );

        CalibrationReport {
            target,
            valid_samples,
            failed_reads,
            mean,
            threshold,
        }
    }

    /// Keeps derived thresholds only when far lies strictly beyond near.
    pub fn validate(&mut self) -> Result<Thresholds, GameError> {
        if self.thresholds.is_separated() {
            Ok(self.thresholds)
        } else {
            log::warn!(
                "calibration invalid near={} far={}, restoring defaults",
                self.thresholds.near,
                self.thresholds.far
            );
            self.thresholds = self.defaults;
            Err(GameError::CalibrationInvalid)
        }
    }
}
