pub(crate) mod config;
mod game;
mod indicators;
mod score;
mod serial;
mod store;
pub(crate) mod types;

use esp_hal::{
    gpio::{Input, InputConfig, Level, Output, OutputConfig, Pull},
    i2c::master::{Config as I2cConfig, I2c, SoftwareTimeout},
    rng::Rng,
    time::{Duration as HalDuration, Rate},
    timer::timg::TimerGroup,
    uart::{Config as UartConfig, Uart},
};
use esp_println::println;
use notnot::{
    drivers::vl53l0x::{Vl53l0x, VL53L0X_DEFAULT_ADDR},
    platform::{Pause, SensorBus, SpinPause},
};
use notnot_core::{GameConfig, GameController, PlayerName};
use static_cell::StaticCell;

use self::{
    config::{
        I2C_FREQ_KHZ, I2C_TRANSACTION_TIMEOUT_MS, PLAYER_NAME, SENSOR_BOOT_SETTLE_MS,
        SENSOR_READ_TIMEOUT_MS, UART_BAUD,
    },
    indicators::LedIndicators,
    score::FlashScoreReporter,
    store::HighScoreStore,
};

static EXECUTOR: StaticCell<esp_rtos::embassy::Executor> = StaticCell::new();

pub(crate) fn run() -> ! {
    let peripherals = esp_hal::init(esp_hal::Config::default());
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_rtos::start(timg0.timer0);
    esp_println::logger::init_logger(log::LevelFilter::Info);

    let uart_cfg = UartConfig::default().with_baudrate(UART_BAUD);
    let uart = match Uart::new(peripherals.UART0, uart_cfg) {
        Ok(uart) => uart
            .with_rx(peripherals.GPIO3)
            .with_tx(peripherals.GPIO1)
            .into_async(),
        Err(_) => halt_forever(),
    };

    let i2c_cfg = I2cConfig::default()
        .with_frequency(Rate::from_khz(I2C_FREQ_KHZ))
        .with_software_timeout(SoftwareTimeout::Transaction(HalDuration::from_millis(
            I2C_TRANSACTION_TIMEOUT_MS,
        )));
    let i2c = match I2c::new(peripherals.I2C0, i2c_cfg) {
        Ok(bus) => bus
            .with_sda(peripherals.GPIO21)
            .with_scl(peripherals.GPIO22),
        Err(_) => halt_forever(),
    };

    let pause = SpinPause;
    pause.pause_ms(SENSOR_BOOT_SETTLE_MS);
    let bus = SensorBus::new(i2c, VL53L0X_DEFAULT_ADDR);
    let sensor = match Vl53l0x::new(bus, pause, SENSOR_READ_TIMEOUT_MS) {
        Ok(sensor) => sensor,
        Err(err) => {
            println!("sensor: init failed {:?}", err);
            halt_forever();
        }
    };

    let indicators = LedIndicators::new(
        Output::new(peripherals.GPIO2, Level::Low, OutputConfig::default()),
        Output::new(peripherals.GPIO4, Level::Low, OutputConfig::default()),
    );
    let button = Input::new(
        peripherals.GPIO0,
        InputConfig::default().with_pull(Pull::Up),
    );
    let score = FlashScoreReporter::new(HighScoreStore::new(peripherals.FLASH));

    let seed = Rng::new().random();
    let mut identity: Option<PlayerName> =
        PLAYER_NAME.and_then(|name| PlayerName::try_from(name).ok());
    let controller = GameController::new(
        GameConfig::default_const(),
        seed,
        sensor,
        indicators,
        score,
        &mut identity,
    );

    let executor = EXECUTOR.init(esp_rtos::embassy::Executor::new());
    executor.run(move |spawner| {
        spawner.must_spawn(game::game_task(controller));
        spawner.must_spawn(game::button_task(button));
        spawner.must_spawn(serial::serial_task(uart));
    });
}

fn halt_forever() -> ! {
    loop {
        core::hint::spin_loop();
    }
}
