//! scrollfire: fire callbacks when elements scroll into view
//!
//! Register named actions against elements; when an element's top edge
//! enters a band of the viewport (30%–60% of its height by default), the
//! action's callback fires once, or on every scroll for persistent actions.
//!
//! # Example
//! ```ignore
//! use scrollfire::prelude::*;
//!
//! let mut scrollfire = Scrollfire::new();
//! scrollfire.init(None);
//!
//! scrollfire.add_action(Some(section), ActionConfig::new("intro", || fade_in()))?;
//!
//! // From the host's scroll listener
//! scrollfire.on_scroll(&viewport, Instant::now());
//! ```

// Re-export everything from core
pub use scrollfire_core::*;

// Re-export the assertion macros
pub use scrollfire_core::{assert_fired, assert_not_fired};

/// Prelude for convenient imports
pub mod prelude {
    pub use scrollfire_core::prelude::*;
}
