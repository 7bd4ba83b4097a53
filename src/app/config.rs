use embassy_sync::{blocking_mutex::raw::CriticalSectionRawMutex, channel::Channel};
use notnot_core::ConfirmLatch;

use super::types::LinkCommand;

pub(crate) const UART_BAUD: u32 = 115_200;
pub(crate) const GAME_TICK_MS: u64 = 10;
pub(crate) const BUTTON_DEBOUNCE_MS: u64 = 20;
pub(crate) const I2C_FREQ_KHZ: u32 = 100;
pub(crate) const I2C_TRANSACTION_TIMEOUT_MS: u64 = 40;
// One back-to-back measurement takes about 33 ms.
pub(crate) const SENSOR_READ_TIMEOUT_MS: u32 = 50;
pub(crate) const SENSOR_BOOT_SETTLE_MS: u32 = 2;
// Longest accepted console command.
pub(crate) const SERIAL_CMD_BUF_LEN: usize = 32;

/// Name greeted at boot; `None` plays anonymously.
pub(crate) const PLAYER_NAME: Option<&str> = None;

pub(crate) static CONFIRM_LATCH: ConfirmLatch = ConfirmLatch::new();
pub(crate) static LINK_COMMANDS: Channel<CriticalSectionRawMutex, LinkCommand, 4> =
    Channel::new();
