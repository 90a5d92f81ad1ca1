//! Reveal - scrollfire on a terminal page
//!
//! Sections light up the first time their heading scrolls into the band.
//! The footer carries a persistent action that counts every scan it is
//! in the band for.
//!
//! Keys: j/Down = scroll down, k/Up = scroll up, PageDown/PageUp, q = quit.
//! The mouse wheel scrolls too.

mod page;

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture, KeyCode};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Terminal,
};
use scrollfire::{spawn_host_poller, HostEvent, Scrollfire, ScrollfireConfig, TerminalViewport};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::page::Page;

#[derive(Parser, Debug)]
#[command(name = "reveal")]
#[command(about = "Reveal page sections as they scroll into view")]
struct Args {
    /// Top of the band, as a fraction of the viewport height
    #[arg(long, default_value_t = 0.3)]
    top: f64,

    /// Bottom of the band, as a fraction of the viewport height
    #[arg(long, default_value_t = 0.6)]
    bottom: f64,

    /// Number of sections on the page
    #[arg(long, default_value_t = 12)]
    sections: usize,

    /// Rows between section headings
    #[arg(long, default_value_t = 8)]
    spacing: u16,

    /// Scroll notification throttle window in milliseconds
    #[arg(long, default_value_t = 10)]
    wait_ms: u64,

    /// Write tracing output to this file (RUST_LOG controls the filter)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .init();
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, args).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    args: Args,
) -> io::Result<()> {
    let mut config = ScrollfireConfig::new()
        .with_viewport_top(args.top)
        .with_viewport_bottom(args.bottom);
    config.throttle.wait_ms = args.wait_ms;

    let mut scrollfire = Scrollfire::new().with_middleware(scrollfire::LoggingMiddleware::new());
    scrollfire.init(Some(config));

    let page = Page::new(args.sections, args.spacing);
    page.register(&scrollfire.handle())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<HostEvent>();
    let cancel_token = CancellationToken::new();
    let _handle = spawn_host_poller(
        event_tx,
        Duration::from_millis(10),
        Duration::from_millis(16),
        cancel_token.clone(),
    );

    // Catches the resting position after a throttled burst
    let mut settle = tokio::time::interval(Duration::from_millis(100));
    let mut viewport = TerminalViewport::new();
    let mut should_render = true;

    loop {
        if should_render {
            terminal.draw(|frame| {
                let [body, status] =
                    Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
                        .areas(frame.area());
                viewport.set_area(body);

                let band = scrollfire.config().band(f64::from(body.height));
                let block = Block::default()
                    .title(" Scrollfire ")
                    .borders(Borders::LEFT)
                    .border_style(Style::default().fg(Color::Cyan));
                let paragraph = Paragraph::new(page_lines(&page))
                    .block(block)
                    .scroll((page.render_offset(), 0));
                frame.render_widget(paragraph, body);

                let status_line = format!(
                    " band rows {:.0}-{:.0}  revealed {}/{}  footer passes {}  j/k scroll  q quit",
                    band.top,
                    band.bottom,
                    page.revealed_count(),
                    page.sections(),
                    page.footer_passes(),
                );
                frame.render_widget(
                    Paragraph::new(status_line).style(Style::default().fg(Color::DarkGray)),
                    status,
                );
            })?;
            should_render = false;
        }

        tokio::select! {
            Some(event) = event_rx.recv() => {
                let delta = match &event {
                    HostEvent::Key(key) => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => break,
                        KeyCode::Char('j') | KeyCode::Down => 1,
                        KeyCode::Char('k') | KeyCode::Up => -1,
                        KeyCode::PageDown => i64::from(args.spacing),
                        KeyCode::PageUp => -i64::from(args.spacing),
                        _ => 0,
                    },
                    HostEvent::Scroll { delta } => *delta as i64 * 3,
                    HostEvent::Resize { .. } => 0,
                };
                if delta != 0 {
                    page.scroll_by(delta);
                }
                if delta != 0 || event.triggers_scan() {
                    scrollfire.on_scroll(&viewport, Instant::now());
                    should_render = true;
                }
            }

            _ = settle.tick() => {
                if scrollfire.on_scroll(&viewport, Instant::now()).is_some_and(|r| r.fired_count() > 0) {
                    should_render = true;
                }
            }
        }
    }

    cancel_token.cancel();
    Ok(())
}

fn page_lines(page: &Page) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for index in 0..page.sections() {
        let (marker, style) = if page.is_revealed(index) {
            (
                "●",
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            ("○", Style::default().fg(Color::DarkGray))
        };
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("Section {}", index + 1), style),
        ]));
        for _ in 1..page.spacing {
            lines.push(Line::from(""));
        }
    }
    lines.push(Line::from(Span::styled(
        format!(" ▸ footer ({} passes)", page.footer_passes()),
        Style::default().fg(Color::Magenta),
    )));
    lines
}
