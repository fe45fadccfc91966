//! The animation clock.
//!
//! One scalar of animation time in seconds, seeded once and then advanced by
//! host timestamps. Negative time means the sequence has not started yet.
//!
//! # Example
//!
//! ```ignore
//! use yearfall::time::AnimationClock;
//!
//! let mut clock = AnimationClock::from_local_time(18.0 * 3600.0);
//!
//! // In the host loop, with a monotonically increasing timestamp in seconds:
//! clock.advance(timestamp);
//!
//! if clock.is_running() {
//!     println!("t = {:.1}s", clock.time());
//! }
//! ```

use chrono::{Datelike, Local, NaiveTime, Timelike};

/// Seconds in a day.
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Animation time driven by host timestamps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    /// Current animation time in seconds.
    time: f64,
    /// Timestamp of the previous tick.
    last: Option<f64>,
    /// Time added by the previous tick.
    delta: f64,
    /// Ticks seen so far.
    frame_count: u64,
}

impl AnimationClock {
    /// Clock starting at an explicit animation time.
    pub fn starting_at(time: f64) -> Self {
        Self {
            time,
            last: None,
            delta: 0.0,
            frame_count: 0,
        }
    }

    /// Clock synchronized to the local time of day.
    ///
    /// Animation time 0 falls `start_offset` seconds after local midnight, so
    /// with an offset of 18h the sequence starts at 18:00.
    pub fn from_local_time(start_offset: f64) -> Self {
        let now = Local::now().time();
        let time = seconds_since_midnight(now) - start_offset;
        log::info!(
            "Clock seeded at {} local, animation time {:.1}s",
            now.format("%H:%M:%S"),
            time
        );
        Self::starting_at(time)
    }

    /// Advance by the gap between `timestamp` and the previous one.
    ///
    /// The first call only records the timestamp. Returns the new time.
    pub fn advance(&mut self, timestamp: f64) -> f64 {
        self.delta = match self.last {
            Some(last) => timestamp - last,
            None => {
                log::debug!("First tick at timestamp {:.3}", timestamp);
                0.0
            }
        };
        self.last = Some(timestamp);
        self.time += self.delta;
        self.frame_count += 1;
        self.time
    }

    /// Current animation time in seconds.
    #[inline]
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Time added by the most recent tick.
    #[inline]
    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Number of ticks seen.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Whether the sequence has started (time is not negative).
    #[inline]
    pub fn is_running(&self) -> bool {
        self.time >= 0.0
    }
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self::starting_at(0.0)
    }
}

/// Seconds elapsed since midnight, including the fractional part.
pub fn seconds_since_midnight(time: NaiveTime) -> f64 {
    time.num_seconds_from_midnight() as f64 + time.nanosecond() as f64 / 1e9
}

/// The current local calendar year.
pub fn local_year() -> i32 {
    Local::now().year()
}
