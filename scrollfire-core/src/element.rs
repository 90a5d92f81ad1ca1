//! Host capabilities: element measurement and viewport height

use std::fmt::Debug;
use std::sync::Arc;

/// Something whose vertical position in the viewport can be measured
///
/// This is the bounding-rectangle query of the host. Implementations must be
/// cheap to call; a scan measures every registered element.
pub trait Element: Debug + Send + Sync {
    /// Current top offset relative to the viewport, in pixels
    ///
    /// Returns `None` when the element cannot be measured (detached,
    /// not laid out yet). Such elements never match a scan.
    fn top(&self) -> Option<f64>;
}

/// Shared handle to an element
///
/// The registry observes elements, it never owns their lifecycle.
pub type ElementRef = Arc<dyn Element>;

/// Source of the current viewport height
pub trait Viewport {
    /// Viewport height in pixels (rows for terminal hosts)
    fn height(&self) -> f64;
}

impl<V: Viewport + ?Sized> Viewport for &V {
    fn height(&self) -> f64 {
        (**self).height()
    }
}

impl<V: Viewport + ?Sized> Viewport for Arc<V> {
    fn height(&self) -> f64 {
        (**self).height()
    }
}

/// Vertical pixel range an element's top edge must fall in to qualify
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportBand {
    pub top: f64,
    pub bottom: f64,
}

impl ViewportBand {
    /// Compute the band for a viewport height and top/bottom fractions
    pub fn from_fractions(height: f64, top: f64, bottom: f64) -> Self {
        Self {
            top: height * top,
            bottom: height * bottom,
        }
    }

    /// Inclusive on both edges
    pub fn contains(&self, offset: f64) -> bool {
        offset >= self.top && offset <= self.bottom
    }
}
