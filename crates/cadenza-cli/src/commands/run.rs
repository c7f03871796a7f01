use std::io;
use std::rc::Rc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, KeyCode},
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle,
    },
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Terminal,
};

use cadenza_core::{AppConfig, FrameBatcher, FrameSource, TickSource};
use cadenza_tui::{AppEvent, EventHandler, ScrollHook, VisibilityOptions, VisibilityTracker};

/// Lines of generated demo content
const DEMO_LINES: u16 = 400;
/// Content line watched by the visibility tracker
const MARKER_LINE: u16 = 200;

pub fn run(config: AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        SetTitle("Cadenza")
    )?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &AppConfig,
) -> Result<()> {
    let source = Rc::new(TickSource::new());
    let batcher = FrameBatcher::new(source.clone() as Rc<dyn FrameSource>);

    let scroll = ScrollHook::new(batcher.clone(), config.scroll.clone());
    let marker = VisibilityTracker::new(
        batcher.clone(),
        VisibilityOptions::default().threshold(0.5).margin(2),
    );

    let tick_rate = config.frame.tick_interval(config.motion.capability);
    let event_handler = EventHandler::new(tick_rate);

    let lines: Vec<String> = (1..=DEMO_LINES)
        .map(|i| {
            if i == MARKER_LINE + 1 {
                format!("{i:>4}  <<< watched line >>>")
            } else {
                format!("{i:>4}  the quick brown fox jumps over the lazy dog")
            }
        })
        .collect();

    let mut viewport_height: u16 = 0;
    let mut flushes: u64 = 0;
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| {
            let size = frame.area();
            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(1), Constraint::Length(1)])
                .split(size);

            let content = layout[0];
            viewport_height = content.height.saturating_sub(2);
            scroll.set_max_offset(DEMO_LINES.saturating_sub(viewport_height));

            let offset = scroll.offset();

            // Both rects in content coordinates, so the watched line can sit
            // above or below the visible window
            marker.observe(
                Rect::new(0, MARKER_LINE, content.width, 1),
                Rect::new(0, offset, content.width, viewport_height),
            );

            let visible: Vec<Line> = lines
                .iter()
                .skip(offset as usize)
                .take(viewport_height as usize)
                .map(|l| Line::raw(l.as_str()))
                .collect();

            let body = Paragraph::new(visible)
                .block(Block::default().borders(Borders::ALL).title("cadenza demo"));
            frame.render_widget(body, content);

            let activity = if scroll.is_active() { "scrolling" } else { "idle" };
            let watched = if marker.is_visible() {
                "on screen"
            } else {
                "off screen"
            };
            let status = Paragraph::new(format!(
                " {}/{}  {}  watched line {}  flushes {}  (q quits)",
                offset,
                DEMO_LINES.saturating_sub(viewport_height),
                activity,
                watched,
                flushes,
            ))
            .style(Style::default().add_modifier(Modifier::REVERSED));
            frame.render_widget(status, layout[1]);
        })?;

        if let Some(event) = event_handler.next()? {
            match event {
                AppEvent::Key(key) => match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('j') | KeyCode::Down => scroll.on_delta(1),
                    KeyCode::Char('k') | KeyCode::Up => scroll.on_delta(-1),
                    KeyCode::PageDown => scroll.on_delta(viewport_height as i32),
                    KeyCode::PageUp => scroll.on_delta(-(viewport_height as i32)),
                    KeyCode::Char('g') => scroll.on_delta(-(scroll.offset() as i32)),
                    KeyCode::Char('G') => scroll.on_delta(DEMO_LINES as i32),
                    _ => {}
                },
                AppEvent::Scroll(steps) => scroll.on_wheel(steps),
                AppEvent::Resize(_, _) => {}
                AppEvent::Tick => {}
            }
        }

        // One flush per frame window, no matter how many events arrived
        if last_frame.elapsed() >= tick_rate {
            scroll.tick();
            if source.fire() {
                flushes += 1;
            }
            last_frame = Instant::now();
        }
    }

    Ok(())
}
