use esp_hal::gpio::Output;
use notnot_core::{Indicator, IndicatorOutput};

/// The two instruction lights, active high.
pub(crate) struct LedIndicators {
    negation: Output<'static>,
    cue: Output<'static>,
}

impl LedIndicators {
    pub(crate) fn new(negation: Output<'static>, cue: Output<'static>) -> Self {
        Self { negation, cue }
    }
}

impl IndicatorOutput for LedIndicators {
    fn set(&mut self, indicator: Indicator, on: bool) {
        let pin = match indicator {
            Indicator::Negation => &mut self.negation,
            Indicator::Cue => &mut self.cue,
        };
        if on {
            pin.set_high();
        } else {
            pin.set_low();
        }
    }
}
