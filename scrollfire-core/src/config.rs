//! Runtime configuration
//!
//! Every field has a default, and partial configs (from code or JSON) are
//! merged over the defaults field by field.

use serde::{Deserialize, Serialize};

use crate::element::ViewportBand;
use crate::error::{Result, ScrollfireError};
use crate::throttle::ThrottleConfig;

/// Default top edge of the band, as a fraction of viewport height
pub const DEFAULT_VIEWPORT_TOP: f64 = 0.3;
/// Default bottom edge of the band, as a fraction of viewport height
pub const DEFAULT_VIEWPORT_BOTTOM: f64 = 0.6;

/// Configuration for a [`Scrollfire`](crate::Scrollfire) runtime
///
/// # Example
/// ```
/// use scrollfire_core::ScrollfireConfig;
///
/// let config = ScrollfireConfig::from_json(r#"{ "viewport_top": 0.1 }"#).unwrap();
/// assert_eq!(config.viewport_top, 0.1);
/// assert_eq!(config.viewport_bottom, 0.6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollfireConfig {
    /// Top of the band as a fraction of viewport height
    #[serde(alias = "viewportTop")]
    pub viewport_top: f64,
    /// Bottom of the band as a fraction of viewport height
    #[serde(alias = "viewportBottom")]
    pub viewport_bottom: f64,
    /// Scroll notification throttling
    pub throttle: ThrottleConfig,
}

impl Default for ScrollfireConfig {
    fn default() -> Self {
        Self {
            viewport_top: DEFAULT_VIEWPORT_TOP,
            viewport_bottom: DEFAULT_VIEWPORT_BOTTOM,
            throttle: ThrottleConfig::default(),
        }
    }
}

impl ScrollfireConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a (possibly partial) JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ScrollfireError::configuration(e.to_string()))
    }

    pub fn with_viewport_top(mut self, top: f64) -> Self {
        self.viewport_top = top;
        self
    }

    pub fn with_viewport_bottom(mut self, bottom: f64) -> Self {
        self.viewport_bottom = bottom;
        self
    }

    pub fn with_throttle(mut self, throttle: ThrottleConfig) -> Self {
        self.throttle = throttle;
        self
    }

    /// Check the band fractions
    ///
    /// Fractions must be finite. Negative values, values above 1.0 and
    /// `top > bottom` are accepted: the band then starts above the
    /// viewport, extends below the fold, or is empty.
    pub fn validate(&self) -> Result<()> {
        match self.non_finite_fields().first() {
            Some((field, value)) => Err(ScrollfireError::configuration(format!(
                "{field} must be a finite fraction (got {value})"
            ))),
            None => Ok(()),
        }
    }

    /// Replace non-finite fractions with their defaults
    ///
    /// Returns the replaced fields with their rejected values.
    pub(crate) fn restore_non_finite(&mut self) -> Vec<(&'static str, f64)> {
        let replaced = self.non_finite_fields();
        if !self.viewport_top.is_finite() {
            self.viewport_top = DEFAULT_VIEWPORT_TOP;
        }
        if !self.viewport_bottom.is_finite() {
            self.viewport_bottom = DEFAULT_VIEWPORT_BOTTOM;
        }
        replaced
    }

    fn non_finite_fields(&self) -> Vec<(&'static str, f64)> {
        [
            ("viewport_top", self.viewport_top),
            ("viewport_bottom", self.viewport_bottom),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_finite())
        .collect()
    }

    /// Pixel band for a viewport of the given height
    pub fn band(&self, viewport_height: f64) -> ViewportBand {
        ViewportBand::from_fractions(viewport_height, self.viewport_top, self.viewport_bottom)
    }
}
