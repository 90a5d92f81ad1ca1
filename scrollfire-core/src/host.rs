//! Terminal host: viewport height and scroll/resize notifications

use crossterm::event::{self, KeyEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::io;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::element::Viewport;

/// Notification from the host environment
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// The page scrolled; positive delta scrolls down
    Scroll { delta: isize },
    /// The viewport changed size
    Resize { width: u16, height: u16 },
    /// Key press, forwarded for the application; the scroll runtime ignores it
    Key(KeyEvent),
}

impl HostEvent {
    /// Whether this event can move elements relative to the band
    pub fn triggers_scan(&self) -> bool {
        matches!(self, HostEvent::Scroll { .. } | HostEvent::Resize { .. })
    }
}

/// Viewport backed by the terminal
///
/// Height is one pixel per row. With an area set, the viewport is that
/// region of the screen; otherwise the full terminal height is queried on
/// every call. When the query fails the last known height is used, and
/// before any successful query the height is NaN so nothing is in band.
#[derive(Debug, Default)]
pub struct TerminalViewport {
    area: Option<Rect>,
    last_rows: AtomicU16,
}

impl TerminalViewport {
    /// Viewport spanning the whole terminal
    pub fn new() -> Self {
        Self::default()
    }

    /// Viewport limited to a screen region
    pub fn from_area(area: Rect) -> Self {
        Self {
            area: Some(area),
            ..Self::default()
        }
    }

    /// Update the region (call after each layout pass)
    pub fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    fn rows_from(&self, size: io::Result<(u16, u16)>) -> f64 {
        match size {
            Ok((_, rows)) => {
                self.last_rows.store(rows, Ordering::Relaxed);
                f64::from(rows)
            }
            Err(error) => {
                let rows = self.last_rows.load(Ordering::Relaxed);
                warn!(%error, last_rows = rows, "Terminal size unavailable");
                if rows == 0 {
                    f64::NAN
                } else {
                    f64::from(rows)
                }
            }
        }
    }
}

impl Viewport for TerminalViewport {
    fn height(&self) -> f64 {
        match self.area {
            Some(area) => f64::from(area.height),
            None => self.rows_from(crossterm::terminal::size()),
        }
    }
}

/// Map a crossterm event to a host event
pub fn process_terminal_event(evt: event::Event) -> Option<HostEvent> {
    match evt {
        event::Event::Key(key) => Some(HostEvent::Key(key)),
        event::Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollDown => Some(HostEvent::Scroll { delta: 1 }),
            MouseEventKind::ScrollUp => Some(HostEvent::Scroll { delta: -1 }),
            _ => None,
        },
        event::Event::Resize(width, height) => Some(HostEvent::Resize { width, height }),
        _ => None,
    }
}

/// Spawn the terminal polling task with cancellation support
///
/// Polls crossterm for input and forwards scroll, resize and key events.
///
/// # Arguments
/// * `tx` - Channel to send host events
/// * `poll_timeout` - Timeout for each poll operation
/// * `loop_sleep` - Sleep duration between poll cycles
/// * `cancel_token` - Token to cancel the polling task
pub fn spawn_host_poller(
    tx: mpsc::UnboundedSender<HostEvent>,
    poll_timeout: Duration,
    loop_sleep: Duration,
    cancel_token: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        const MAX_EVENTS_PER_BATCH: usize = 20;

        loop {
            tokio::select! {
                _ = cancel_token.cancelled() => {
                    info!("Host poller cancelled, draining buffer");
                    while event::poll(Duration::ZERO).unwrap_or(false) {
                        let _ = event::read();
                    }
                    break;
                }
                _ = tokio::time::sleep(loop_sleep) => {
                    let mut events_processed = 0;
                    while events_processed < MAX_EVENTS_PER_BATCH
                        && event::poll(poll_timeout).unwrap_or(false)
                    {
                        events_processed += 1;
                        if let Some(host_event) = event::read().ok().and_then(process_terminal_event) {
                            if tx.send(host_event).is_err() {
                                debug!("Host event channel closed, stopping poller");
                                return;
                            }
                        }
                    }
                }
            }
        }
    })
}
