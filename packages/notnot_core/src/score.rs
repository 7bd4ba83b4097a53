//! Score bookkeeping and the persisted high-score record.

use crate::ports::ScoreReporter;

pub const HIGH_SCORE_RECORD_LEN: usize = 16;
pub const HIGH_SCORE_RECORD_MAGIC: u32 = 0x4E54_4E54;
pub const HIGH_SCORE_RECORD_VERSION: u8 = 1;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreBoard {
    score: u8,
    high_score: u8,
}

impl ScoreBoard {
    pub const fn new() -> Self {
        Self {
            score: 0,
            high_score: 0,
        }
    }

    pub const fn with_high_score(high_score: u8) -> Self {
        Self {
            score: 0,
            high_score,
        }
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn high_score(&self) -> u8 {
        self.high_score
    }

    /// Returns true when the high score moved.
    pub fn record_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

impl ScoreReporter for ScoreBoard {
    fn increment(&mut self) {
        self.score = self.score.saturating_add(1);
    }

    fn update_high_score(&mut self) {
        self.record_high_score();
    }

    fn reset(&mut self) {
        self.score = 0;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PersistedHighScore {
    pub high_score: u8,
    /// Number of games that reached the end sequence.
    pub games_played: u16,
}

impl PersistedHighScore {
    pub fn record_bytes(self) -> [u8; HIGH_SCORE_RECORD_LEN] {
        let mut record = [0xFFu8; HIGH_SCORE_RECORD_LEN];
        record[0..4].copy_from_slice(&HIGH_SCORE_RECORD_MAGIC.to_le_bytes());
        record[4] = HIGH_SCORE_RECORD_VERSION;
        record[5] = self.high_score;
        record[6..8].copy_from_slice(&self.games_played.to_le_bytes());
        record[HIGH_SCORE_RECORD_LEN - 1] = checksum8(&record[..HIGH_SCORE_RECORD_LEN - 1]);
        record
    }

    pub fn from_record(record: &[u8; HIGH_SCORE_RECORD_LEN]) -> Option<Self> {
        if record.iter().all(|&byte| byte == 0xFF) {
            return None;
        }
        if u32::from_le_bytes([record[0], record[1], record[2], record[3]])
            != HIGH_SCORE_RECORD_MAGIC
        {
            return None;
        }
        if record[4] != HIGH_SCORE_RECORD_VERSION {
            return None;
        }
        if checksum8(&record[..HIGH_SCORE_RECORD_LEN - 1]) != record[HIGH_SCORE_RECORD_LEN - 1] {
            return None;
        }
        Some(Self {
            high_score: record[5],
            games_played: u16::from_le_bytes([record[6], record[7]]),
        })
    }
}

fn checksum8(bytes: &[u8]) -> u8 {
    let mut acc = 0x5Au8;
    for &byte in bytes {
        acc ^= byte.rotate_left(1);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn high_score_keeps_the_maximum() {
        let mut board = ScoreBoard::with_high_score(3);
        board.increment();
        board.increment();
        board.update_high_score();
        assert_eq!(board.high_score(), 3);

        board.increment();
        board.increment();
        assert!(board.record_high_score());
        assert_eq!(board.high_score(), 4);

        board.reset();
        assert_eq!(board.score(), 0);
        assert_eq!(board.high_score(), 4);
    }

    #[test]
    fn score_saturates() {
        let mut board = ScoreBoard::new();
        for _ in 0..300 {
            board.increment();
        }
        assert_eq!(board.score(), u8::MAX);
    }

    #[test]
    fn erased_flash_has_no_record() {
        assert!(PersistedHighScore::from_record(&[0xFF; HIGH_SCORE_RECORD_LEN]).is_none());
    }

    #[test]
    fn record_decodes_what_it_encodes() {
        let persisted = PersistedHighScore {
            high_score: 17,
            games_played: 513,
        };
        let record = persisted.record_bytes();
        assert_eq!(PersistedHighScore::from_record(&record), Some(persisted));
    }

    #[test]
    fn corrupted_record_is_rejected() {
        let mut record = PersistedHighScore {
            high_score: 9,
            games_played: 2,
        }
        .record_bytes();
        record[5] = 200;
        assert!(PersistedHighScore::from_record(&record).is_none());
    }

    #[test]
    fn rejects_other_version() {
        let mut record = PersistedHighScore {
            high_score: 9,
            games_played: 2,
        }
        .record_bytes();
        record[4] = HIGH_SCORE_RECORD_VERSION + 1;
        record[HIGH_SCORE_RECORD_LEN - 1] = checksum8(&record[..HIGH_SCORE_RECORD_LEN - 1]);
        assert!(PersistedHighScore::from_record(&record).is_none());
    }
}
