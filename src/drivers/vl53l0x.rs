//! Minimal VL53L0X time-of-flight ranging driver.
//!
//! The sensor runs in back-to-back continuous mode with its factory timing
//! budget. Each read waits for the next "sample ready" interrupt flag, takes
//! the range and clears the flag.

use notnot_core::{Distance, DistanceSampler, SensorError};

use crate::platform::{Pause, RegisterBus};

pub const VL53L0X_DEFAULT_ADDR: u8 = 0x29;

const REG_SYSRANGE_START: u8 = 0x00;
const REG_SYSTEM_INTERRUPT_CONFIG_GPIO: u8 = 0x0A;
const REG_SYSTEM_INTERRUPT_CLEAR: u8 = 0x0B;
const REG_RESULT_INTERRUPT_STATUS: u8 = 0x13;
// RESULT_RANGE_STATUS + 10
const REG_RESULT_RANGE_MM: u8 = 0x1E;
const REG_GPIO_HV_MUX_ACTIVE_HIGH: u8 = 0x84;
const REG_I2C_STANDARD_MODE: u8 = 0x88;
const REG_MODEL_ID: u8 = 0xC0;

const MODEL_ID: u8 = 0xEE;
const SYSRANGE_BACK_TO_BACK: u8 = 0x02;
const INTERRUPT_NEW_SAMPLE_READY: u8 = 0x04;
const INTERRUPT_STATUS_MASK: u8 = 0x07;
const GPIO_ACTIVE_HIGH_BIT: u8 = 0x10;
// The sensor reports 8190/8191 when no target is in range.
const RANGE_NO_TARGET_MM: u16 = 8_190;
const POLL_INTERVAL_US: u32 = 500;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vl53l0xError<E> {
    Bus(E),
    NotPresent,
    UnexpectedModel(u8),
    Timeout,
    NoTarget,
}

pub struct Vl53l0x<B, P> {
    bus: B,
    pause: P,
    timeout_ms: u32,
    bus_errors: u32,
}

impl<B, P> Vl53l0x<B, P>
where
    B: RegisterBus,
    P: Pause,
{
    pub fn new(bus: B, pause: P, timeout_ms: u32) -> Result<Self, Vl53l0xError<B::Error>> {
        let mut sensor = Self {
            bus,
            pause,
            timeout_ms,
            bus_errors: 0,
        };

        if !sensor
            .bus
            .is_present(REG_MODEL_ID)
            .map_err(Vl53l0xError::Bus)?
        {
            return Err(Vl53l0xError::NotPresent);
        }
        let model = sensor.read_u8(REG_MODEL_ID)?;
        if model != MODEL_ID {
            return Err(Vl53l0xError::UnexpectedModel(model));
        }

        sensor.write_u8(REG_I2C_STANDARD_MODE, 0x00)?;
        sensor.write_u8(REG_SYSTEM_INTERRUPT_CONFIG_GPIO, INTERRUPT_NEW_SAMPLE_READY)?;
        let mux = sensor.read_u8(REG_GPIO_HV_MUX_ACTIVE_HIGH)?;
        sensor.write_u8(REG_GPIO_HV_MUX_ACTIVE_HIGH, mux & !GPIO_ACTIVE_HIGH_BIT)?;
        sensor.write_u8(REG_SYSTEM_INTERRUPT_CLEAR, 0x01)?;
        sensor.write_u8(REG_SYSRANGE_START, SYSRANGE_BACK_TO_BACK)?;
        Ok(sensor)
    }

    pub fn bus_errors(&self) -> u32 {
        self.bus_errors
    }

    /// Waits at most `timeout_ms` for the next measurement.
    pub fn read_range_mm(&mut self) -> Result<u16, Vl53l0xError<B::Error>> {
        let polls = self.timeout_ms.saturating_mul(1_000) / POLL_INTERVAL_US;
        let mut ready = false;
        for _ in 0..=polls {
            if self.read_u8(REG_RESULT_INTERRUPT_STATUS)? & INTERRUPT_STATUS_MASK != 0 {
                ready = true;
                break;
            }
            self.pause.pause_us(POLL_INTERVAL_US);
        }
        if !ready {
            return Err(Vl53l0xError::Timeout);
        }

        let mut raw = [0u8; 2];
        self.bus
            .read_regs(REG_RESULT_RANGE_MM, &mut raw)
            .map_err(Vl53l0xError::Bus)?;
        self.write_u8(REG_SYSTEM_INTERRUPT_CLEAR, 0x01)?;

        let range = u16::from_be_bytes(raw);
        if range >= RANGE_NO_TARGET_MM {
            Err(Vl53l0xError::NoTarget)
        } else {
            Ok(range)
        }
    }

    fn read_u8(&mut self, reg: u8) -> Result<u8, Vl53l0xError<B::Error>> {
        self.bus.read_reg(reg).map_err(Vl53l0xError::Bus)
    }

    fn write_u8(&mut self, reg: u8, value: u8) -> Result<(), Vl53l0xError<B::Error>> {
        self.bus.write_reg(reg, value).map_err(Vl53l0xError::Bus)
    }
}

impl<B, P> DistanceSampler for Vl53l0x<B, P>
where
    B: RegisterBus,
    P: Pause,
{
    fn read(&mut self) -> Result<Distance, SensorError> {
        match self.read_range_mm() {
            Ok(range) => Ok(range),
            Err(Vl53l0xError::Timeout) => Err(SensorError::Timeout),
            Err(Vl53l0xError::NoTarget) => Err(SensorError::InvalidRange),
            Err(_) => {
                self.bus_errors = self.bus_errors.saturating_add(1);
                Err(SensorError::Bus)
            }
        }
    }
}
