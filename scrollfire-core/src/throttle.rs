//! Rate limiting for high-frequency notifications
//!
//! [`Throttle`] is a clock-driven state machine: callers pass the current
//! [`Instant`] on every call, so the same type drives both the synchronous
//! scroll handler and the async run loop (which sleeps until
//! [`Throttle::deadline`]).
//!
//! Two modes:
//! - **Leading edge**: the first call in a quiet window passes through
//!   immediately. Every call, passed or suppressed, restarts the quiet
//!   timer, so a steady stream of calls spaced under `wait` apart passes
//!   only the very first one.
//! - **Trailing edge**: calls are held back. Each call replaces the pending
//!   payload and restarts the timer; the latest payload is released by
//!   [`Throttle::poll`] once `wait` passes without another call.
//!
//! # Example
//!
//! ```
//! use scrollfire_core::Throttle;
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let mut throttle = Throttle::leading(Duration::from_millis(10));
//! let t0 = Instant::now();
//!
//! assert_eq!(throttle.call(t0, "first"), Some("first"));
//! assert_eq!(throttle.call(t0 + Duration::from_millis(3), "second"), None);
//! assert_eq!(throttle.call(t0 + Duration::from_millis(20), "third"), Some("third"));
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// Throttle settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    /// Quiet window in milliseconds
    pub wait_ms: u64,
    /// Fire on the leading edge instead of the trailing edge
    pub leading: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            wait_ms: 10,
            leading: true,
        }
    }
}

impl ThrottleConfig {
    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

/// Leading- or trailing-edge rate limiter carrying a payload `T`
///
/// The payload is whatever the caller needs to survive the delay (call
/// arguments, a context value, or `()`).
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    wait: Duration,
    leading: bool,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    pub fn new(wait: Duration, leading: bool) -> Self {
        Self {
            wait,
            leading,
            deadline: None,
            pending: None,
        }
    }

    /// Leading-edge throttle
    pub fn leading(wait: Duration) -> Self {
        Self::new(wait, true)
    }

    /// Trailing-edge throttle
    pub fn trailing(wait: Duration) -> Self {
        Self::new(wait, false)
    }

    pub fn from_config(config: &ThrottleConfig) -> Self {
        Self::new(config.wait(), config.leading)
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    pub fn is_leading(&self) -> bool {
        self.leading
    }

    /// Register a call at `now`
    ///
    /// Returns the payload when it should run immediately (leading edge
    /// with no live timer). In trailing mode the payload is stored and
    /// `None` is returned.
    ///
    /// A trailing payload whose timer lapsed before `now` is replaced, so
    /// call [`Throttle::poll`] first to release it.
    pub fn call(&mut self, now: Instant, payload: T) -> Option<T> {
        let call_now = self.leading && !self.is_waiting(now);
        self.deadline = Some(now + self.wait);

        if call_now {
            Some(payload)
        } else {
            if !self.leading {
                self.pending = Some(payload);
            }
            None
        }
    }

    /// Advance the timer to `now`
    ///
    /// Returns the held payload when a trailing-edge timer has lapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.is_expired(now) {
            self.expire()
        } else {
            None
        }
    }

    /// When the current quiet window ends, if a timer is live
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a trailing payload is waiting for the timer to lapse
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drop the timer and any held payload
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    fn is_waiting(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now < deadline)
    }

    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }

    fn expire(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_leading_burst_fires_once() {
        let mut throttle = Throttle::leading(ms(10));
        let t0 = Instant::now();

        let fired: Vec<u64> = [0, 3, 6, 9]
            .into_iter()
            .filter_map(|t| throttle.call(t0 + ms(t), t))
            .collect();

        assert_eq!(fired, vec![0]);
    }

    #[test]
    fn test_leading_gap_fires_twice() {
        let mut throttle = Throttle::leading(ms(10));
        let t0 = Instant::now();

        let fired: Vec<u64> = [0, 15]
            .into_iter()
            .filter_map(|t| throttle.call(t0 + ms(t), t))
            .collect();

        assert_eq!(fired, vec![0, 15]);
    }

    #[test]
    fn test_leading_sustained_stream_is_suppressed() {
        let mut throttle = Throttle::leading(ms(10));
        let t0 = Instant::now();

        // Every call refreshes the timer, so 9ms spacing never reopens the window
        let fired = (0..20)
            .filter_map(|i| throttle.call(t0 + ms(i * 9), i))
            .count();
        assert_eq!(fired, 1);

        // A full quiet window re-arms it
        assert_eq!(throttle.call(t0 + ms(19 * 9 + 10), 99), Some(99));
    }

    #[test]
    fn test_leading_exact_wait_reopens() {
        let mut throttle = Throttle::leading(ms(10));
        let t0 = Instant::now();

        assert!(throttle.call(t0, ()).is_some());
        assert!(throttle.call(t0 + ms(10), ()).is_some());
    }

    #[test]
    fn test_leading_poll_never_releases() {
        let mut throttle = Throttle::leading(ms(10));
        let t0 = Instant::now();

        throttle.call(t0, 1);
        throttle.call(t0 + ms(2), 2);
        assert_eq!(throttle.poll(t0 + ms(50)), None);
        assert!(throttle.deadline().is_none());
    }

    #[test]
    fn test_trailing_releases_latest_payload() {
        let mut throttle = Throttle::trailing(ms(10));
        let t0 = Instant::now();

        assert_eq!(throttle.call(t0, "a"), None);
        assert_eq!(throttle.call(t0 + ms(3), "b"), None);
        assert_eq!(throttle.call(t0 + ms(6), "c"), None);
        assert!(throttle.has_pending());

        // Timer was reset at t=6, so nothing before t=16
        assert_eq!(throttle.poll(t0 + ms(15)), None);
        assert_eq!(throttle.poll(t0 + ms(16)), Some("c"));
        assert!(!throttle.has_pending());
        assert_eq!(throttle.poll(t0 + ms(40)), None);
    }

    #[test]
    fn test_trailing_deadline_tracks_last_call() {
        let mut throttle = Throttle::trailing(ms(10));
        let t0 = Instant::now();

        throttle.call(t0, ());
        assert_eq!(throttle.deadline(), Some(t0 + ms(10)));
        throttle.call(t0 + ms(4), ());
        assert_eq!(throttle.deadline(), Some(t0 + ms(14)));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut throttle = Throttle::trailing(ms(10));
        let t0 = Instant::now();

        throttle.call(t0, 1);
        throttle.cancel();
        assert_eq!(throttle.poll(t0 + ms(20)), None);
        assert!(throttle.deadline().is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config = ThrottleConfig::default();
        assert_eq!(config.wait(), ms(10));
        assert!(config.leading);

        let throttle: Throttle<()> = Throttle::from_config(&config);
        assert!(throttle.is_leading());
        assert_eq!(throttle.wait(), ms(10));
    }
}
