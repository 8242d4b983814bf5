//! Slide-and-fade entrance animations

use std::time::{Duration, Instant};

pub const ENTRANCE_DURATION: Duration = Duration::from_secs(1);
/// Rows a card starts below its resting position.
pub const ENTRANCE_OFFSET_ROWS: u16 = 3;
/// Below this opacity a card is drawn dimmed.
const DIM_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entrance {
    started: Instant,
    duration: Duration,
}

impl Entrance {
    pub fn new(started: Instant) -> Self {
        Entrance {
            started,
            duration: ENTRANCE_DURATION,
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    /// Linear progress in `0.0..=1.0`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    /// Quadratic ease-out.
    pub fn eased(&self, now: Instant) -> f64 {
        let t = self.progress(now);
        1.0 - (1.0 - t) * (1.0 - t)
    }

    pub fn offset(&self, now: Instant) -> u16 {
        (ENTRANCE_OFFSET_ROWS as f64 * (1.0 - self.eased(now))).round() as u16
    }

    pub fn opacity(&self, now: Instant) -> f64 {
        self.eased(now)
    }

    pub fn is_dimmed(&self, now: Instant) -> bool {
        self.opacity(now) < DIM_THRESHOLD
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// One entrance per animated region of the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct Animations {
    pub container: Entrance,
    pub stock: Option<Entrance>,
    pub history: Option<Entrance>,
    pub news: Option<Entrance>,
}

impl Animations {
    pub fn new(now: Instant) -> Self {
        Animations {
            container: Entrance::new(now),
            stock: None,
            history: None,
            news: None,
        }
    }

    pub fn is_running(&self, now: Instant) -> bool {
        [Some(self.container), self.stock, self.history, self.news]
            .into_iter()
            .flatten()
            .any(|e| !e.is_finished(now))
    }
}
