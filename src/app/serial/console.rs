use crate::app::{config::SERIAL_CMD_BUF_LEN, types::LinkCommand};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ConsoleCommand {
    Confirm,
    Link(LinkCommand),
}

const COMMAND_WORDS: [(&[u8], ConsoleCommand); 6] = [
    (b"CONFIRM", ConsoleCommand::Confirm),
    (b"OK", ConsoleCommand::Confirm),
    (b"LOST", ConsoleCommand::Link(LinkCommand::Lost)),
    (b"DISCONNECT", ConsoleCommand::Link(LinkCommand::Lost)),
    (b"RESTORED", ConsoleCommand::Link(LinkCommand::Restored)),
    (b"RECONNECT", ConsoleCommand::Link(LinkCommand::Restored)),
];

impl ConsoleCommand {
    fn from_word(word: &[u8]) -> Option<Self> {
        COMMAND_WORDS
            .iter()
            .find(|(name, _)| word.eq_ignore_ascii_case(name))
            .map(|&(_, command)| command)
    }
}

/// Outcome of one console byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum ConsoleInput {
    Pending,
    Command(ConsoleCommand),
    Unknown,
    /// The line outgrew the buffer; the rest of it is discarded.
    TooLong,
}

impl ConsoleInput {
    pub(super) fn reply(self) -> Option<&'static [u8]> {
        match self {
            Self::Pending | Self::Command(_) => None,
            Self::Unknown => Some(b"CMD ERR\r\n"),
            Self::TooLong => Some(b"CMD TOO LONG\r\n"),
        }
    }
}

/// Turns console bytes into game commands, one word per line.
pub(super) struct ConsoleReader {
    line: [u8; SERIAL_CMD_BUF_LEN],
    len: usize,
    discarding: bool,
}

impl ConsoleReader {
    pub(super) const fn new() -> Self {
        Self {
            line: [0; SERIAL_CMD_BUF_LEN],
            len: 0,
            discarding: false,
        }
    }

    pub(super) fn push_byte(&mut self, byte: u8) -> ConsoleInput {
        match byte {
            b'\r' | b'\n' => {
                let len = core::mem::take(&mut self.len);
                if core::mem::take(&mut self.discarding) {
                    return ConsoleInput::Pending;
                }
                let word = self.line[..len].trim_ascii();
                if word.is_empty() {
                    return ConsoleInput::Pending;
                }
                ConsoleCommand::from_word(word).map_or(ConsoleInput::Unknown, ConsoleInput::Command)
            }
            _ if self.discarding => ConsoleInput::Pending,
            _ if self.len == self.line.len() => {
                self.len = 0;
                self.discarding = true;
                ConsoleInput::TooLong
            }
            _ => {
                self.line[self.len] = byte;
                self.len += 1;
                ConsoleInput::Pending
            }
        }
    }
}
