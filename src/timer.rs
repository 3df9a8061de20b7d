//! The game clock.
//!
//! A [`TickTimer`] only exists while a game is being played: the session creates one when the first cell gets opened
//! and drops it as soon as the game ends or gets reset, so a finished game can't receive ticks.

use std::time::{Duration, Instant};

/// One tick is one second of elapsed game time.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy)]
pub struct TickTimer {
    interval: Duration,
    /// The moment the last counted tick was due. Ticks are counted from here, so the fractions of an interval
    /// carry over between polls.
    last_tick: Instant,
}

impl TickTimer {
    /// Starts a timer ticking every `interval` from now.
    pub fn start(interval: Duration) -> Self {
        Self::start_at(interval, Instant::now())
    }

    /// Starts a timer ticking every `interval` from `now`. A zero interval is bumped to a millisecond.
    pub fn start_at(interval: Duration, now: Instant) -> Self {
        TickTimer {
            interval: interval.max(Duration::from_millis(1)),
            last_tick: now,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the number of whole ticks that have become due since the previous poll (or the start).
    ///
    /// A `now` in the past yields zero ticks.
    pub fn poll(&mut self, now: Instant) -> u64 {
        let Some(since_last_tick) = now.checked_duration_since(self.last_tick) else {
            return 0;
        };

        let ticks = since_last_tick.as_nanos() / self.interval.as_nanos();
        let counted = Duration::from_nanos(
            u64::try_from(ticks * self.interval.as_nanos()).unwrap_or(u64::MAX),
        );
        self.last_tick += counted;

        u64::try_from(ticks).unwrap_or(u64::MAX)
    }
}
