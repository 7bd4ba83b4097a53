use core::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SensorError {
    Timeout,
    Bus,
    /// The sensor answered but flagged the measurement as unusable.
    InvalidRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => f.write_str("sensor read timed out"),
            Self::Bus => f.write_str("sensor bus error"),
            Self::InvalidRange => f.write_str("sensor range invalid"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameError {
    /// No sample this tick; absorbed by the classifier and calibration.
    SensorReadFailure(SensorError),
    /// Derived thresholds were not separated; defaults were restored.
    CalibrationInvalid,
    /// Fatal to the current match, forces the game to end.
    ConnectivityLost,
    /// Rejection sampling ran out of draws. Indicates a broken random source.
    InstructionGenerationExhausted,
}

impl From<SensorError> for GameError {
    fn from(value: SensorError) -> Self {
        Self::SensorReadFailure(value)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SensorReadFailure(err) => write!(f, "sensor read failure: {err}"),
            Self::CalibrationInvalid => f.write_str("calibration invalid, defaults restored"),
            Self::ConnectivityLost => f.write_str("connectivity lost"),
            Self::InstructionGenerationExhausted => {
                f.write_str("instruction generation exhausted its draws")
            }
        }
    }
}
