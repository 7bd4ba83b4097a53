use esp_hal::{
    i2c::master::{Error as I2cError, I2c},
    time::{Duration, Instant},
    Blocking,
};

/// Blocking pause used while polling the sensor.
pub trait Pause {
    fn pause_us(&self, micros: u32);

    fn pause_ms(&self, millis: u32) {
        self.pause_us(millis.saturating_mul(1_000));
    }
}

/// Byte registers of one device on a shared bus.
pub trait RegisterBus {
    type Error;

    fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Self::Error>;
    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Self::Error>;

    /// `Ok(false)` when nothing acknowledges the device address.
    fn is_present(&mut self, id_reg: u8) -> Result<bool, Self::Error>;

    fn read_reg(&mut self, reg: u8) -> Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_regs(reg, &mut value)?;
        Ok(value[0])
    }
}

/// The ranging sensor's address on the esp-hal I2C master.
pub struct SensorBus<'d> {
    bus: I2c<'d, Blocking>,
    addr: u8,
}

impl<'d> SensorBus<'d> {
    pub fn new(bus: I2c<'d, Blocking>, addr: u8) -> Self {
        Self { bus, addr }
    }
}

impl RegisterBus for SensorBus<'_> {
    type Error = I2cError;

    fn read_regs(&mut self, reg: u8, buffer: &mut [u8]) -> Result<(), Self::Error> {
        self.bus.write_read(self.addr, &[reg], buffer)
    }

    fn write_reg(&mut self, reg: u8, value: u8) -> Result<(), Self::Error> {
        self.bus.write(self.addr, &[reg, value])
    }

    fn is_present(&mut self, id_reg: u8) -> Result<bool, Self::Error> {
        let mut scratch = [0u8; 1];
        match self.bus.write_read(self.addr, &[id_reg], &mut scratch) {
            Ok(()) => Ok(true),
            Err(I2cError::AcknowledgeCheckFailed(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[derive(Clone, Copy, Default)]
pub struct SpinPause;

impl Pause for SpinPause {
    fn pause_us(&self, micros: u32) {
        let start = Instant::now();
        let span = Duration::from_micros(micros as u64);
        while start.elapsed() < span {}
    }
}
