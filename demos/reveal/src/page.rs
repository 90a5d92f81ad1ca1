//! Page model: sections laid out on rows, scrolled by a shared offset

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use scrollfire::{ActionConfig, Element, Result, ScrollfireHandle};

/// A section's position on the page, measured against the shared scroll offset
#[derive(Debug)]
pub struct SectionElement {
    row: i64,
    scroll: Arc<AtomicI64>,
}

impl Element for SectionElement {
    fn top(&self) -> Option<f64> {
        Some((self.row - self.scroll.load(Ordering::Relaxed)) as f64)
    }
}

/// Document of evenly spaced sections
pub struct Page {
    pub spacing: u16,
    scroll: Arc<AtomicI64>,
    revealed: Arc<Mutex<Vec<bool>>>,
    footer_passes: Arc<AtomicUsize>,
}

impl Page {
    pub fn new(sections: usize, spacing: u16) -> Self {
        Self {
            spacing: spacing.max(1),
            scroll: Arc::new(AtomicI64::new(0)),
            revealed: Arc::new(Mutex::new(vec![false; sections])),
            footer_passes: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn sections(&self) -> usize {
        self.lock_revealed().len()
    }

    /// Total rows, including a trailing viewport-worth of blank space
    pub fn height(&self) -> i64 {
        (self.sections() as i64 + 1) * i64::from(self.spacing)
    }

    pub fn scroll_offset(&self) -> i64 {
        self.scroll.load(Ordering::Relaxed)
    }

    /// Scroll offset for the paragraph widget, saturating at `u16::MAX`
    pub fn render_offset(&self) -> u16 {
        u16::try_from(self.scroll_offset().max(0)).unwrap_or(u16::MAX)
    }

    /// Scroll by `delta` rows, clamped to the page
    pub fn scroll_by(&self, delta: i64) {
        let max = self.height().max(0);
        let next = (self.scroll_offset() + delta).clamp(0, max);
        self.scroll.store(next, Ordering::Relaxed);
    }

    pub fn section_row(&self, index: usize) -> i64 {
        index as i64 * i64::from(self.spacing)
    }

    pub fn element(&self, index: usize) -> Arc<SectionElement> {
        Arc::new(SectionElement {
            row: self.section_row(index),
            scroll: self.scroll.clone(),
        })
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.lock_revealed().get(index).copied().unwrap_or(false)
    }

    pub fn revealed_count(&self) -> usize {
        self.lock_revealed().iter().filter(|r| **r).count()
    }

    /// Scans that saw the footer in the band
    pub fn footer_passes(&self) -> usize {
        self.footer_passes.load(Ordering::Relaxed)
    }

    /// Register a one-shot reveal per section and a persistent footer counter
    pub fn register(&self, handle: &ScrollfireHandle) -> Result<()> {
        for index in 0..self.sections() {
            let revealed = self.revealed.clone();
            let config = ActionConfig::new(format!("section-{index}"), move || {
                let mut revealed = revealed.lock().unwrap_or_else(|p| p.into_inner());
                revealed[index] = true;
                tracing::info!(section = index, "Section revealed");
            });
            handle.add_action(Some(self.element(index)), config)?;
        }

        let passes = self.footer_passes.clone();
        let footer = ActionConfig::new("footer", move || {
            passes.fetch_add(1, Ordering::Relaxed);
        })
        .persist(true);
        handle.add_action(Some(self.element(self.sections())), footer)
    }

    fn lock_revealed(&self) -> std::sync::MutexGuard<'_, Vec<bool>> {
        self.revealed.lock().unwrap_or_else(|p| p.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scrollfire::{FixedViewport, Scrollfire, ScrollfireConfig};

    fn started() -> Scrollfire {
        let mut scrollfire = Scrollfire::new();
        scrollfire.init(Some(
            ScrollfireConfig::new()
                .with_viewport_top(0.0)
                .with_viewport_bottom(0.5),
        ));
        scrollfire
    }

    #[test]
    fn test_section_tops_follow_scroll() {
        let page = Page::new(3, 10);
        let element = page.element(2);
        assert_eq!(element.top(), Some(20.0));

        page.scroll_by(15);
        assert_eq!(element.top(), Some(5.0));

        page.scroll_by(-100);
        assert_eq!(page.scroll_offset(), 0);
    }

    #[test]
    fn test_render_offset_saturates() {
        let page = Page::new(10_000, 10);
        page.scroll_by(500);
        assert_eq!(page.render_offset(), 500);

        page.scroll_by(90_000);
        assert_eq!(page.scroll_offset(), 90_500);
        assert_eq!(page.render_offset(), u16::MAX);
    }

    #[test]
    fn test_sections_reveal_in_order() {
        let page = Page::new(4, 10);
        let mut scrollfire = started();
        page.register(&scrollfire.handle()).unwrap();
        // band = [0, 10] rows
        let viewport = FixedViewport::new(20.0);

        scrollfire.scan(&viewport);
        assert!(page.is_revealed(0));
        assert!(page.is_revealed(1));
        assert!(!page.is_revealed(2));

        page.scroll_by(20);
        scrollfire.scan(&viewport);
        assert_eq!(page.revealed_count(), 4);
        assert_eq!(page.footer_passes(), 0);

        page.scroll_by(10);
        scrollfire.scan(&viewport);
        scrollfire.scan(&viewport);
        assert_eq!(page.footer_passes(), 2);
    }
}
