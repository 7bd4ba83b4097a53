use esp_println::println;
use notnot_core::{PersistedHighScore, ScoreBoard, ScoreReporter};

use super::store::HighScoreStore;

/// Prints score changes on the console and keeps the high score in flash.
pub(crate) struct FlashScoreReporter {
    board: ScoreBoard,
    games_played: u16,
    store: HighScoreStore<'static>,
}

impl FlashScoreReporter {
    pub(crate) fn new(mut store: HighScoreStore<'static>) -> Self {
        let persisted = store.load();
        let (high_score, games_played) = match persisted {
            Some(record) => (record.high_score, record.games_played),
            None => (0, 0),
        };
        println!(
            "score: restored high={} games={}",
            high_score, games_played
        );
        Self {
            board: ScoreBoard::with_high_score(high_score),
            games_played,
            store,
        }
    }
}

impl ScoreReporter for FlashScoreReporter {
    fn increment(&mut self) {
        self.board.increment();
        println!("score: {}", self.board.score());
    }

    fn update_high_score(&mut self) {
        let improved = self.board.record_high_score();
        self.games_played = self.games_played.saturating_add(1);
        let saved = self.store.save(PersistedHighScore {
            high_score: self.board.high_score(),
            games_played: self.games_played,
        });
        println!(
            "score: final={} high={} new_high={} saved={}",
            self.board.score(),
            self.board.high_score(),
            improved,
            saved
        );
    }

    fn reset(&mut self) {
        self.board.reset();
        println!("score: reset");
    }
}
