//! Test utilities for scrollfire
//!
//! - [`MovableElement`]: element whose top offset tests can move
//! - [`FixedViewport`]: viewport with a settable height
//! - [`CallCounter`]: callback that counts invocations
//! - [`ScrollHarness`]: runtime + viewport + manual clock
//! - Assertion macros for scan reports
//!
//! # Example
//!
//! ```
//! use scrollfire_core::testing::{MovableElement, ScrollHarness};
//! use scrollfire_core::ScrollfireConfig;
//!
//! let mut harness = ScrollHarness::new(500.0);
//! harness.init(ScrollfireConfig::new().with_viewport_top(0.1).with_viewport_bottom(1.0));
//!
//! let element = MovableElement::at(50.0);
//! let counter = harness.add("a", element.clone(), false);
//!
//! harness.scroll();
//! harness.scroll();
//! assert_eq!(counter.count(), 1);
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use crate::action::ActionConfig;
use crate::config::ScrollfireConfig;
use crate::element::{Element, ElementRef, Viewport};
use crate::runtime::Scrollfire;
use crate::scanner::ScanReport;

/// Element with a settable top offset
#[derive(Debug, Default)]
pub struct MovableElement {
    top: Mutex<Option<f64>>,
}

impl MovableElement {
    /// Element at `top` pixels from the viewport top
    pub fn at(top: f64) -> Arc<Self> {
        Arc::new(Self {
            top: Mutex::new(Some(top)),
        })
    }

    /// Element that cannot be measured
    pub fn detached() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_top(&self, top: f64) {
        *self.lock() = Some(top);
    }

    /// Move by `delta` pixels (negative moves up, as when scrolling down)
    pub fn shift(&self, delta: f64) {
        let mut top = self.lock();
        if let Some(top) = top.as_mut() {
            *top += delta;
        }
    }

    pub fn detach(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<f64>> {
        self.top.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Element for MovableElement {
    fn top(&self) -> Option<f64> {
        *self.lock()
    }
}

/// Viewport with a fixed, settable height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedViewport {
    pub height: f64,
}

impl FixedViewport {
    pub fn new(height: f64) -> Self {
        Self { height }
    }
}

impl Viewport for FixedViewport {
    fn height(&self) -> f64 {
        self.height
    }
}

/// Counts how many times its callback ran
#[derive(Debug, Clone, Default)]
pub struct CallCounter(Arc<AtomicUsize>);

impl CallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback that increments this counter
    pub fn callback(&self) -> impl Fn() + Send + Sync + 'static {
        let count = self.0.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }

    /// Action config named `name` whose method increments this counter
    pub fn config(&self, name: &str) -> ActionConfig {
        ActionConfig::new(name, self.callback())
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Runtime harness with a manual clock
///
/// Each [`ScrollHarness::scroll`] advances the clock past the throttle
/// window, so every call scans. Use [`ScrollHarness::scroll_after`] to
/// exercise throttling.
pub struct ScrollHarness {
    /// The runtime under test
    pub scrollfire: Scrollfire,
    /// Viewport passed to every scan
    pub viewport: FixedViewport,
    now: Instant,
}

impl ScrollHarness {
    /// Unstarted runtime over a viewport of the given height
    pub fn new(viewport_height: f64) -> Self {
        Self {
            scrollfire: Scrollfire::new(),
            viewport: FixedViewport::new(viewport_height),
            now: Instant::now(),
        }
    }

    /// Start the runtime with `config`
    pub fn init(&mut self, config: ScrollfireConfig) -> bool {
        self.scrollfire.init(Some(config))
    }

    /// Register a counting action and apply it immediately
    ///
    /// # Panics
    ///
    /// Panics if the runtime is not started.
    pub fn add(&mut self, name: &str, element: ElementRef, persist: bool) -> CallCounter {
        let counter = CallCounter::new();
        self.scrollfire
            .add_action(Some(element), counter.config(name).persist(persist))
            .unwrap_or_else(|e| panic!("add_action({name:?}) failed: {e}"));
        self.scrollfire.process_signals();
        counter
    }

    /// Scroll notification one full throttle window after the previous one
    pub fn scroll(&mut self) -> Option<ScanReport> {
        let wait = self.scrollfire.config().throttle.wait();
        self.scroll_after(wait)
    }

    /// Scroll notification `elapsed` after the previous one
    pub fn scroll_after(&mut self, elapsed: Duration) -> Option<ScanReport> {
        self.now += elapsed;
        self.scrollfire.on_scroll(&self.viewport, self.now)
    }

    /// Advance the clock and release any due trailing scan
    pub fn advance(&mut self, elapsed: Duration) -> Option<ScanReport> {
        self.now += elapsed;
        self.scrollfire.poll_throttle(&self.viewport, self.now)
    }

    /// Current harness time
    pub fn now(&self) -> Instant {
        self.now
    }
}

/// Pause tokio time for deterministic async throttle tests
#[cfg(feature = "testing-time")]
pub fn pause_time() {
    tokio::time::pause();
}

/// Resume tokio time after [`pause_time`]
#[cfg(feature = "testing-time")]
pub fn resume_time() {
    tokio::time::resume();
}

/// Advance paused tokio time
#[cfg(feature = "testing-time")]
pub async fn advance_time(duration: Duration) {
    tokio::time::advance(duration).await;
}

/// Assert that a scan fired the named action.
///
/// # Example
///
/// ```ignore
/// let report = harness.scroll().unwrap();
/// assert_fired!(report, "hero");
/// ```
#[macro_export]
macro_rules! assert_fired {
    ($report:expr, $name:expr) => {
        assert!(
            $report.has_fired($name),
            "Expected action `{}` to fire, but fired: {:?}",
            $name,
            $report.fired
        );
    };
}

/// Assert that a scan did NOT fire the named action.
#[macro_export]
macro_rules! assert_not_fired {
    ($report:expr, $name:expr) => {
        assert!(
            !$report.has_fired($name),
            "Expected action `{}` NOT to fire, but it did: {:?}",
            $name,
            $report.fired
        );
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movable_element() {
        let element = MovableElement::at(100.0);
        element.shift(-40.0);
        assert_eq!(element.top(), Some(60.0));

        element.detach();
        assert_eq!(element.top(), None);
        element.shift(10.0);
        assert_eq!(element.top(), None);

        element.set_top(5.0);
        assert_eq!(element.top(), Some(5.0));
    }

    #[test]
    fn test_call_counter() {
        let counter = CallCounter::new();
        let callback = counter.callback();
        callback();
        callback();
        assert_eq!(counter.count(), 2);
    }

    #[test]
    fn test_harness_scroll_scans_every_time() {
        let mut harness = ScrollHarness::new(1000.0);
        harness.init(ScrollfireConfig::default());
        let counter = harness.add("p", MovableElement::at(450.0), true);

        for _ in 0..3 {
            let report = harness.scroll().unwrap();
            assert_fired!(report, "p");
        }
        assert_eq!(counter.count(), 3);
    }

    #[test]
    fn test_harness_scroll_after_throttles() {
        let mut harness = ScrollHarness::new(1000.0);
        harness.init(ScrollfireConfig::default());
        harness.add("p", MovableElement::at(450.0), true);

        assert!(harness.scroll_after(Duration::ZERO).is_some());
        assert!(harness.scroll_after(Duration::from_millis(3)).is_none());
    }

    #[test]
    fn test_report_macros() {
        let mut harness = ScrollHarness::new(1000.0);
        harness.init(ScrollfireConfig::default());
        harness.add("in", MovableElement::at(450.0), false);
        harness.add("out", MovableElement::at(10.0), false);

        let report = harness.scroll().unwrap();
        assert_fired!(report, "in");
        assert_not_fired!(report, "out");
    }
}
