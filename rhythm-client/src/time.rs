//! Time manager for wall-clock to song-time synchronization.

/// Maps the wall clock (`performance.now()`) to elapsed song time in
/// milliseconds, supporting pause and resume.
pub struct TimeManager {
    /// Wall-clock time (ms) corresponding to song time 0.
    start_time: f64,
    /// If paused, stores the wall-clock time at which the pause began.
    pause_time: Option<f64>,
}

impl TimeManager {
    pub fn new() -> Self {
        Self {
            start_time: Self::real_time_ms(),
            pause_time: None,
        }
    }

    /// Current wall-clock time in milliseconds. Zero outside a browser.
    pub fn real_time_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.)
    }

    /// Current song time in milliseconds.
    pub fn now(&self) -> f64 {
        let wall = self.pause_time.unwrap_or_else(Self::real_time_ms);
        wall - self.start_time
    }

    pub fn paused(&self) -> bool {
        self.pause_time.is_some()
    }

    pub fn pause(&mut self) {
        if self.pause_time.is_none() {
            self.pause_time = Some(Self::real_time_ms());
        }
    }

    pub fn resume(&mut self) {
        if let Some(pt) = self.pause_time.take() {
            self.start_time += Self::real_time_ms() - pt;
        }
    }

    /// Reset to song time 0, keeping the paused flag.
    pub fn reset(&mut self) {
        let wall = Self::real_time_ms();
        self.start_time = wall;
        if self.pause_time.is_some() {
            self.pause_time = Some(wall);
        }
    }
}
