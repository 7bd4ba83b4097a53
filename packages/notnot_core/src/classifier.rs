use crate::{
    calibration::Thresholds,
    config::GameConfig,
    instruction::{Expectation, Instruction},
    Distance,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,
    Incorrect,
    /// Every read in the window failed; nothing to judge.
    Inconclusive,
}

impl Verdict {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
            Self::Inconclusive => "inconclusive",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowStats {
    pub last_distance: Distance,
    pub min_distance: Distance,
    pub max_distance: Distance,
    pub alternation_count: u8,
    pub valid_samples: u16,
    pub failed_reads: u16,
}

impl WindowStats {
    pub const fn spread(&self) -> Distance {
        self.max_distance.saturating_sub(self.min_distance)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Zone {
    Near,
    Far,
}

/// Running statistics of one instruction's response window.
///
/// A crossing counts when a sample lands in the zone opposite to the previous
/// valid sample. With mid-band bridging, samples between the thresholds are
/// skipped and the comparison is against the last zoned sample instead.
#[derive(Clone, Copy, Debug, Default)]
pub struct SampleWindow {
    stats: WindowStats,
    last_zone: Option<Zone>,
    bridge_mid_band: bool,
}

impl SampleWindow {
    pub const fn new() -> Self {
        Self::with_mid_band_bridging(false)
    }

    pub const fn with_mid_band_bridging(bridge_mid_band: bool) -> Self {
        Self {
            stats: WindowStats {
                last_distance: 0,
                min_distance: 0,
                max_distance: 0,
                alternation_count: 0,
                valid_samples: 0,
                failed_reads: 0,
            },
            last_zone: None,
            bridge_mid_band,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::with_mid_band_bridging(self.bridge_mid_band);
    }

    pub fn stats(&self) -> WindowStats {
        self.stats
    }

    pub fn ingest_sample(&mut self, distance: Distance, thresholds: Thresholds) {
        let zone = if distance <= thresholds.near {
            Some(Zone::Near)
        } else if distance >= thresholds.far {
            Some(Zone::Far)
        } else {
            None
        };

        if self.stats.valid_samples == 0 {
            self.stats.min_distance = distance;
            self.stats.max_distance = distance;
        } else {
            self.stats.min_distance = self.stats.min_distance.min(distance);
            self.stats.max_distance = self.stats.max_distance.max(distance);
            if let (Some(previous), Some(current)) = (self.last_zone, zone) {
                if previous != current {
                    self.stats.alternation_count = self.stats.alternation_count.saturating_add(1);
                }
            }
        }

        if zone.is_some() || !self.bridge_mid_band {
            self.last_zone = zone;
        }
        self.stats.last_distance = distance;
        self.stats.valid_samples = self.stats.valid_samples.saturating_add(1);
    }

    pub fn record_failed_read(&mut self) {
        self.stats.failed_reads = self.stats.failed_reads.saturating_add(1);
    }
}

pub fn classify(
    instruction: Instruction,
    stats: &WindowStats,
    thresholds: Thresholds,
    config: &GameConfig,
) -> Verdict {
    if stats.valid_samples == 0 {
        return Verdict::Inconclusive;
    }

    let correct = match instruction.expectation() {
        Expectation::Near => stats.last_distance <= thresholds.near,
        Expectation::Far => stats.last_distance >= thresholds.far,
        Expectation::Alternate => stats.alternation_count >= config.alternation_min_count,
        Expectation::HoldStill => stats.spread() as u32 <= config.hold_still_max_spread(),
    };

    if correct {
        Verdict::Correct
    } else {
        Verdict::Incorrect
    }
}
