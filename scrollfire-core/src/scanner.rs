//! Viewport scanner: fires actions whose element sits inside the band

use tracing::{debug, trace};

use crate::config::ScrollfireConfig;
use crate::element::{Viewport, ViewportBand};
use crate::registry::ActionRegistry;

/// Result of one scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanReport {
    /// Band the scan evaluated against, in pixels
    pub band: ViewportBand,
    /// Actions that had a measurable element
    pub evaluated: usize,
    /// Names of the actions fired, in registry order
    pub fired: Vec<String>,
}

impl ScanReport {
    pub fn fired_count(&self) -> usize {
        self.fired.len()
    }

    pub fn has_fired(&self, name: &str) -> bool {
        self.fired.iter().any(|fired| fired == name)
    }
}

/// Evaluates every registered action against the viewport band
#[derive(Debug, Clone, Copy)]
pub struct ViewportScanner {
    viewport_top: f64,
    viewport_bottom: f64,
}

impl Default for ViewportScanner {
    fn default() -> Self {
        Self::new(&ScrollfireConfig::default())
    }
}

impl ViewportScanner {
    pub fn new(config: &ScrollfireConfig) -> Self {
        Self {
            viewport_top: config.viewport_top,
            viewport_bottom: config.viewport_bottom,
        }
    }

    /// Band for the viewport's current height
    pub fn band<V: Viewport + ?Sized>(&self, viewport: &V) -> ViewportBand {
        ViewportBand::from_fractions(viewport.height(), self.viewport_top, self.viewport_bottom)
    }

    /// Scan the registry once
    ///
    /// Every action is evaluated in insertion order. An action fires when its
    /// element's top offset is inside the band and it is still armed.
    /// Actions without a measurable element are skipped.
    pub fn scan<V: Viewport + ?Sized>(
        &self,
        registry: &mut ActionRegistry,
        viewport: &V,
    ) -> ScanReport {
        let band = self.band(viewport);
        let mut evaluated = 0;
        let mut fired = Vec::new();

        for action in registry.iter_mut() {
            let Some(top) = action.element().and_then(|element| element.top()) else {
                continue;
            };
            evaluated += 1;

            if band.contains(top) && action.is_armed() {
                trace!(action = %action.name(), top, "Firing scroll action");
                action.fire();
                fired.push(action.name().to_string());
            }
        }

        debug!(
            band_top = band.top,
            band_bottom = band.bottom,
            evaluated,
            fired = fired.len(),
            "Viewport scan"
        );

        ScanReport {
            band,
            evaluated,
            fired,
        }
    }
}
