//! Core types for scrollfire
//!
//! Register callbacks ("actions") that fire when an element's top edge
//! scrolls into a band of the viewport.
//!
//! # Core Concepts
//!
//! - **ScrollAction**: an element, a named callback and its fired state
//! - **ActionRegistry**: ordered collection, mutated only by registry signals
//! - **ViewportScanner**: evaluates every action against the current band
//! - **Throttle**: leading/trailing rate limiter for scroll notifications
//! - **Scrollfire**: the runtime tying them together
//!
//! # Basic Example
//!
//! ```ignore
//! use scrollfire_core::prelude::*;
//!
//! let mut scrollfire = Scrollfire::new();
//! scrollfire.init(Some(ScrollfireConfig::new().with_viewport_top(0.1).with_viewport_bottom(1.0)));
//!
//! scrollfire.add_action(Some(hero), ActionConfig::new("hero", || reveal_hero()))?;
//! scrollfire.add_action(Some(ticker), ActionConfig::new("ticker", || tick()).persist(true))?;
//!
//! // Host scroll handler
//! scrollfire.on_scroll(&viewport, Instant::now());
//! ```
//!
//! # Signal Flow
//!
//! `add_action` and `remove_action` queue a [`RegistrySignal`]; the runtime
//! applies queued signals before each scan, so a callback may add or remove
//! actions (including itself) while a scan is running.

pub mod action;
pub mod config;
pub mod element;
pub mod error;
pub mod host;
pub mod registry;
pub mod runtime;
pub mod scanner;
pub mod signal;
pub mod testing;
pub mod throttle;

pub use action::{ActionConfig, Callback, ScrollAction};
pub use config::{ScrollfireConfig, DEFAULT_VIEWPORT_BOTTOM, DEFAULT_VIEWPORT_TOP};
pub use element::{Element, ElementRef, Viewport, ViewportBand};
pub use error::{Result, ScrollfireError};

// Host exports
pub use host::{process_terminal_event, spawn_host_poller, HostEvent, TerminalViewport};

// Registry exports
pub use registry::{ActionRegistry, ComposedMiddleware, LoggingMiddleware, Middleware};
pub use signal::{RegistrySignal, Signal};

// Runtime exports
pub use runtime::{Scrollfire, ScrollfireHandle};
pub use scanner::{ScanReport, ViewportScanner};
pub use throttle::{Throttle, ThrottleConfig};

// Testing exports
pub use testing::{CallCounter, FixedViewport, MovableElement, ScrollHarness};

#[cfg(feature = "testing-time")]
pub use testing::{advance_time, pause_time, resume_time};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::action::{ActionConfig, ScrollAction};
    pub use crate::config::ScrollfireConfig;
    pub use crate::element::{Element, ElementRef, Viewport, ViewportBand};
    pub use crate::error::{Result, ScrollfireError};
    pub use crate::host::{spawn_host_poller, HostEvent, TerminalViewport};
    pub use crate::registry::{ActionRegistry, LoggingMiddleware, Middleware};
    pub use crate::runtime::{Scrollfire, ScrollfireHandle};
    pub use crate::scanner::ScanReport;
    pub use crate::signal::RegistrySignal;
    pub use crate::throttle::{Throttle, ThrottleConfig};
}
