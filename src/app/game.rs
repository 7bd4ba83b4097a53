use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Ticker, Timer};
use notnot_core::ControllerOutput;

use super::{
    config::{BUTTON_DEBOUNCE_MS, CONFIRM_LATCH, GAME_TICK_MS, LINK_COMMANDS},
    types::{ConfirmButton, Controller, LinkCommand},
};

/// Owns the controller; everything else reaches it through the latch or the link channel.
#[embassy_executor::task]
pub(crate) async fn game_task(mut controller: Controller) {
    let boot_instant = Instant::now();
    let mut ticker = Ticker::every(Duration::from_millis(GAME_TICK_MS));

    loop {
        match select(ticker.next(), LINK_COMMANDS.receive()).await {
            Either::First(()) => {
                if CONFIRM_LATCH.take() {
                    log_output(&controller.confirm());
                }
                let now_ms = Instant::now()
                    .saturating_duration_since(boot_instant)
                    .as_millis();
                log_output(&controller.tick(now_ms));
            }
            Either::Second(command) => {
                let output = match command {
                    LinkCommand::Lost => controller.connectivity_lost(),
                    LinkCommand::Restored => controller.restart(),
                };
                log_output(&output);
            }
        }
    }
}

#[embassy_executor::task]
pub(crate) async fn button_task(mut button: ConfirmButton) {
    loop {
        button.wait_for_falling_edge().await;
        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        if button.is_low() {
            CONFIRM_LATCH.signal();
            button.wait_for_rising_edge().await;
        }
    }
}

fn log_output(output: &ControllerOutput) {
    for event in output.iter() {
        log::info!("game: {}", event);
    }
}
