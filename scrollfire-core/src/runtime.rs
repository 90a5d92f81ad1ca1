//! The scrollfire runtime: registry, signal queue, throttle and scanner
//!
//! Public calls never mutate the action collection directly. `add_action`
//! and `remove_action` enqueue a [`RegistrySignal`]; the runtime applies
//! queued signals at defined flush points:
//!
//! - [`Scrollfire::process_signals`]
//! - the start of every scroll notification and scan
//! - the signal branch of [`Scrollfire::run`]
//!
//! Callers must not expect the collection to change before one of those
//! runs. Callbacks fired during a scan may call back into a
//! [`ScrollfireHandle`]; their signals apply at the next flush.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::action::{ActionConfig, ScrollAction};
use crate::config::ScrollfireConfig;
use crate::element::{ElementRef, Viewport};
use crate::error::{Result, ScrollfireError};
use crate::host::HostEvent;
use crate::registry::{ActionRegistry, ComposedMiddleware, Middleware};
use crate::scanner::{ScanReport, ViewportScanner};
use crate::signal::{RegistrySignal, Signal};
use crate::throttle::Throttle;

/// Cloneable handle for registering and removing actions
///
/// Handles only enqueue signals, so they can be used from other tasks and
/// from inside action callbacks.
#[derive(Debug, Clone)]
pub struct ScrollfireHandle {
    signal_tx: mpsc::UnboundedSender<RegistrySignal>,
    started: Arc<AtomicBool>,
}

impl ScrollfireHandle {
    /// Whether the owning runtime has been initialized
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Queue a new action for `element`
    ///
    /// Fails with [`ScrollfireError::Uninitialized`] before `init`, and with
    /// [`ScrollfireError::Configuration`] when `name` or `method` is missing.
    pub fn add_action(&self, element: Option<ElementRef>, config: ActionConfig) -> Result<()> {
        if !self.is_started() {
            return Err(ScrollfireError::Uninitialized);
        }
        let action = ScrollAction::new(element, config)?;
        debug!(action = %action.name(), persist = action.persist(), "Queueing action add");
        self.send(RegistrySignal::Add(action))
    }

    /// Queue removal of every action named `name`
    pub fn remove_action(&self, name: impl Into<String>) -> Result<()> {
        if !self.is_started() {
            return Err(ScrollfireError::Uninitialized);
        }
        let name = name.into();
        debug!(action = %name, "Queueing action remove");
        self.send(RegistrySignal::Remove(name))
    }

    fn send(&self, signal: RegistrySignal) -> Result<()> {
        self.signal_tx.send(signal).map_err(|_| {
            debug!("Signal queue closed, runtime dropped");
            ScrollfireError::Uninitialized
        })
    }
}

/// Scroll-triggered action runtime
///
/// # Example
///
/// ```ignore
/// use scrollfire_core::{ActionConfig, Scrollfire, ScrollfireConfig};
///
/// let mut scrollfire = Scrollfire::new();
/// scrollfire.init(Some(ScrollfireConfig::new().with_viewport_top(0.1)));
///
/// scrollfire.add_action(Some(element), ActionConfig::new("hero", || reveal()))?;
///
/// // On every host scroll notification:
/// scrollfire.on_scroll(&viewport, Instant::now());
/// ```
pub struct Scrollfire {
    config: ScrollfireConfig,
    scanner: ViewportScanner,
    registry: ActionRegistry,
    throttle: Throttle<()>,
    handle: ScrollfireHandle,
    signal_rx: mpsc::UnboundedReceiver<RegistrySignal>,
    middleware: ComposedMiddleware<RegistrySignal>,
}

impl std::fmt::Debug for Scrollfire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scrollfire")
            .field("started", &self.is_started())
            .field("config", &self.config)
            .field("actions", &self.registry.len())
            .field("middleware", &self.middleware)
            .finish()
    }
}

impl Default for Scrollfire {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrollfire {
    /// Create an unstarted runtime with the default config
    pub fn new() -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let config = ScrollfireConfig::default();
        Self {
            scanner: ViewportScanner::new(&config),
            throttle: Throttle::from_config(&config.throttle),
            config,
            registry: ActionRegistry::new(),
            handle: ScrollfireHandle {
                signal_tx,
                started: Arc::new(AtomicBool::new(false)),
            },
            signal_rx,
            middleware: ComposedMiddleware::new(),
        }
    }

    /// Observe every applied signal
    pub fn with_middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<RegistrySignal> + Send + 'static,
    {
        self.middleware.add(middleware);
        self
    }

    /// Start the runtime
    ///
    /// Fields missing from `config` keep their defaults. A non-finite band
    /// fraction falls back to its default with a warning; any finite band is
    /// kept as given, even an empty one. Only the first call has any effect;
    /// later calls log a warning and return `false`.
    pub fn init(&mut self, config: Option<ScrollfireConfig>) -> bool {
        if self.is_started() {
            warn!("Scrollfire has already been initialized");
            return false;
        }

        let mut config = config.unwrap_or_default();
        for (field, value) in config.restore_non_finite() {
            warn!(field, value, "Non-finite viewport fraction, using the default");
        }

        info!(
            viewport_top = config.viewport_top,
            viewport_bottom = config.viewport_bottom,
            wait_ms = config.throttle.wait_ms,
            leading = config.throttle.leading,
            "Scrollfire initialized"
        );

        self.scanner = ViewportScanner::new(&config);
        self.throttle = Throttle::from_config(&config.throttle);
        self.config = config;
        self.handle.started.store(true, Ordering::Release);
        true
    }

    /// Return to the unstarted state
    ///
    /// Drops all actions, queued signals and throttle state and restores the
    /// default config. Existing handles stay connected and start failing
    /// with [`ScrollfireError::Uninitialized`] until the next `init`.
    pub fn reset(&mut self) {
        self.handle.started.store(false, Ordering::Release);
        while self.signal_rx.try_recv().is_ok() {}
        self.registry.clear();
        self.config = ScrollfireConfig::default();
        self.scanner = ViewportScanner::new(&self.config);
        self.throttle = Throttle::from_config(&self.config.throttle);
        info!("Scrollfire reset");
    }

    pub fn is_started(&self) -> bool {
        self.handle.is_started()
    }

    pub fn config(&self) -> &ScrollfireConfig {
        &self.config
    }

    /// Handle for adding and removing actions from elsewhere
    pub fn handle(&self) -> ScrollfireHandle {
        self.handle.clone()
    }

    /// Queue a new action; see [`ScrollfireHandle::add_action`]
    pub fn add_action(&self, element: Option<ElementRef>, config: ActionConfig) -> Result<()> {
        self.handle.add_action(element, config)
    }

    /// Queue removal of every action named `name`
    pub fn remove_action(&self, name: impl Into<String>) -> Result<()> {
        self.handle.remove_action(name)
    }

    /// Live view of the action collection
    ///
    /// Reflects only signals applied so far.
    pub fn actions(&self) -> &[ScrollAction] {
        self.registry.actions()
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    /// Apply every queued signal, returning how many were applied
    pub fn process_signals(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(signal) = self.signal_rx.try_recv() {
            self.apply_signal(signal);
            applied += 1;
        }
        applied
    }

    fn apply_signal(&mut self, signal: RegistrySignal) {
        self.middleware.before(&signal);
        let changed = self.registry.dispatch(signal.clone());
        self.middleware.after(&signal, changed);
        debug!(
            signal = %signal.name(),
            action = %signal.action_name(),
            changed,
            actions = self.registry.len(),
            "Registry signal handled"
        );
    }

    /// Flush queued signals and scan immediately, bypassing the throttle
    pub fn scan<V: Viewport + ?Sized>(&mut self, viewport: &V) -> ScanReport {
        self.process_signals();
        self.scanner.scan(&mut self.registry, viewport)
    }

    /// Handle a host scroll notification at `now`
    ///
    /// Returns the scan report when the throttle let the notification
    /// through (or a trailing scan was due). Before `init` nothing is
    /// listening and `None` is returned.
    pub fn on_scroll<V: Viewport + ?Sized>(
        &mut self,
        viewport: &V,
        now: Instant,
    ) -> Option<ScanReport> {
        if !self.is_started() {
            return None;
        }
        self.process_signals();

        let lapsed = self.throttle.poll(now).is_some();
        let call_now = self.throttle.call(now, ()).is_some();
        (lapsed || call_now).then(|| self.scanner.scan(&mut self.registry, viewport))
    }

    /// Release a trailing-edge scan whose quiet window has passed
    pub fn poll_throttle<V: Viewport + ?Sized>(
        &mut self,
        viewport: &V,
        now: Instant,
    ) -> Option<ScanReport> {
        self.throttle.poll(now)?;
        self.process_signals();
        Some(self.scanner.scan(&mut self.registry, viewport))
    }

    /// When a held trailing scan becomes due
    pub fn next_deadline(&self) -> Option<Instant> {
        if self.throttle.has_pending() {
            self.throttle.deadline()
        } else {
            None
        }
    }

    /// Drive the runtime from a stream of host events until cancelled
    ///
    /// Applies signals as they arrive, throttles scroll and resize
    /// notifications, and wakes for trailing-edge scans. Returns when
    /// `cancel` fires or the event channel closes.
    pub async fn run<V: Viewport + ?Sized>(
        &mut self,
        viewport: &V,
        mut events: mpsc::UnboundedReceiver<HostEvent>,
        cancel: CancellationToken,
    ) -> Result<()> {
        if !self.is_started() {
            return Err(ScrollfireError::Uninitialized);
        }

        loop {
            let deadline = self.next_deadline();

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Scrollfire run loop cancelled");
                    break;
                }

                Some(signal) = self.signal_rx.recv() => {
                    self.apply_signal(signal);
                }

                event = events.recv() => match event {
                    Some(event) if event.triggers_scan() => {
                        self.on_scroll(viewport, Instant::now());
                    }
                    Some(_) => {}
                    None => {
                        debug!("Host event channel closed");
                        break;
                    }
                },

                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.poll_throttle(viewport, Instant::now());
                }
            }
        }

        Ok(())
    }
}
