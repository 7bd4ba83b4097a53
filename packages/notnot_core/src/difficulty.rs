use crate::config::GameConfig;

/// Response-window length for the running game.
///
/// Every timeout shortens the window by one step until it reaches the floor.
/// The window never grows again before [`reset`](WindowSchedule::reset).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowSchedule {
    start_ms: u32,
    step_ms: u32,
    floor_ms: u32,
    current_ms: u32,
}

impl WindowSchedule {
    pub const fn new(start_ms: u32, step_ms: u32, floor_ms: u32) -> Self {
        let floor_ms = if floor_ms > start_ms { start_ms } else { floor_ms };
        Self {
            start_ms,
            step_ms,
            floor_ms,
            current_ms: start_ms,
        }
    }

    pub const fn from_config(config: &GameConfig) -> Self {
        Self::new(
            config.window_start_ms,
            config.window_step_ms,
            config.window_floor_ms,
        )
    }

    pub fn window_ms(&self) -> u32 {
        self.current_ms
    }

    /// Shortens the window after a timeout and returns the new length.
    pub fn on_timeout(&mut self) -> u32 {
        self.current_ms = self
            .current_ms
            .saturating_sub(self.step_ms)
            .max(self.floor_ms);
        self.current_ms
    }

    pub fn reset(&mut self) {
        self.current_ms = self.start_ms;
    }
}

impl Default for WindowSchedule {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}
