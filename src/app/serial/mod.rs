mod console;

use embassy_time::{with_timeout, Duration};

use self::console::{ConsoleCommand, ConsoleInput, ConsoleReader};
use super::{
    config::{CONFIRM_LATCH, LINK_COMMANDS},
    types::SerialUart,
};

const SERIAL_POLL_MS: u64 = 10;

/// Console commands standing in for the wireless link and the button.
#[embassy_executor::task]
pub(crate) async fn serial_task(mut uart: SerialUart) {
    let mut reader = ConsoleReader::new();
    let mut rx = [0u8; 1];

    let _ = uart_write_all(&mut uart, b"notnot: CONFIRM | LOST | RESTORED\r\n").await;

    loop {
        let read = with_timeout(
            Duration::from_millis(SERIAL_POLL_MS),
            uart.read_async(&mut rx),
        )
        .await;
        let Ok(Ok(1)) = read else {
            continue;
        };

        let input = reader.push_byte(rx[0]);
        let reply: &[u8] = match input {
            ConsoleInput::Command(ConsoleCommand::Confirm) => {
                CONFIRM_LATCH.signal();
                b"CMD OK\r\n"
            }
            ConsoleInput::Command(ConsoleCommand::Link(command)) => {
                if LINK_COMMANDS.try_send(command).is_ok() {
                    b"CMD OK\r\n"
                } else {
                    b"CMD BUSY\r\n"
                }
            }
            other => match other.reply() {
                Some(reply) => reply,
                None => continue,
            },
        };
        let _ = uart_write_all(&mut uart, reply).await;
    }
}

async fn uart_write_all(uart: &mut SerialUart, mut bytes: &[u8]) -> bool {
    while !bytes.is_empty() {
        match uart.write_async(bytes).await {
            Ok(0) => return false,
            Ok(written) => bytes = &bytes[written..],
            Err(_) => return false,
        }
    }
    true
}
