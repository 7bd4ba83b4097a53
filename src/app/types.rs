use esp_hal::{gpio::Input, uart::Uart, Async};
use notnot::{
    drivers::vl53l0x::Vl53l0x,
    platform::{SensorBus, SpinPause},
};
use notnot_core::GameController;

use super::{indicators::LedIndicators, score::FlashScoreReporter};

pub(crate) type RangeSensor = Vl53l0x<SensorBus<'static>, SpinPause>;
pub(crate) type SerialUart = Uart<'static, Async>;
pub(crate) type ConfirmButton = Input<'static>;
pub(crate) type Controller = GameController<RangeSensor, LedIndicators, FlashScoreReporter>;

/// Link state changes reported by the host over the serial console.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum LinkCommand {
    Lost,
    Restored,
}
