use crate::{calibration::Thresholds, Distance};

pub const CALIBRATION_SAMPLE_COUNT: u8 = 10;
pub const CALIBRATION_MARGIN_MM: Distance = 50;
pub const DEFAULT_NEAR_MM: Distance = 150;
pub const DEFAULT_FAR_MM: Distance = 250;
pub const ALTERNATION_MIN_COUNT: u8 = 3;
// Spread allowed for a hold-still window, as a percentage of the calibration margin.
pub const HOLD_STILL_SPREAD_X100: u16 = 80;
pub const WINDOW_START_MS: u32 = 3_000;
pub const WINDOW_STEP_MS: u32 = 100;
pub const WINDOW_FLOOR_MS: u32 = 1_000;
pub const BLINK_PERIOD_MS: u32 = 250;
pub const END_SEQUENCE_MS: u32 = 2_000;
pub const INSTRUCTION_MAX_DRAWS: u8 = 32;

/// Tunables of one game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameConfig {
    pub calibration_samples: u8,
    pub calibration_margin_mm: Distance,
    pub default_thresholds: Thresholds,
    pub alternation_min_count: u8,
    /// Let samples between the thresholds carry the previous zone through a crossing.
    pub alternation_bridges_mid_band: bool,
    pub hold_still_spread_x100: u16,
    pub window_start_ms: u32,
    pub window_step_ms: u32,
    pub window_floor_ms: u32,
    pub blink_period_ms: u32,
    pub end_sequence_ms: u32,
}

impl GameConfig {
    pub const fn default_const() -> Self {
        Self {
            calibration_samples: CALIBRATION_SAMPLE_COUNT,
            calibration_margin_mm: CALIBRATION_MARGIN_MM,
            default_thresholds: Thresholds {
                near: DEFAULT_NEAR_MM,
                far: DEFAULT_FAR_MM,
            },
            alternation_min_count: ALTERNATION_MIN_COUNT,
            alternation_bridges_mid_band: false,
            hold_still_spread_x100: HOLD_STILL_SPREAD_X100,
            window_start_ms: WINDOW_START_MS,
            window_step_ms: WINDOW_STEP_MS,
            window_floor_ms: WINDOW_FLOOR_MS,
            blink_period_ms: BLINK_PERIOD_MS,
            end_sequence_ms: END_SEQUENCE_MS,
        }
    }

    /// Largest `max - min` spread a hold-still window may show.
    pub const fn hold_still_max_spread(&self) -> u32 {
        (self.calibration_margin_mm as u32 * self.hold_still_spread_x100 as u32) / 100
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::default_const()
    }
}
