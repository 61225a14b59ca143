//! Terminal setup, teardown, and the TUI event loop.
//!
//! The loop polls for input with a short timeout so the due-check tick
//! keeps running while the UI is idle, matching the 30-second timer the
//! CLI `watch` command uses.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::App;

/// Interval between automatic due-check passes.
const CHECK_INTERVAL: Duration = Duration::from_secs(30);

/// Input poll timeout; keeps the tick responsive without busy-looping.
const POLL_TIMEOUT: Duration = Duration::from_millis(250);

/// Launch the TUI against the given list file.
pub fn run_tui(db_path: &Path) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(db_path);
    let result = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    app.save()?;
    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    // First check runs immediately so anything already in its due
    // window fires on startup rather than 30 seconds later.
    app.run_due_check();
    let mut last_check = Instant::now();

    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(POLL_TIMEOUT)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    return Ok(());
                }
            }
        }

        if last_check.elapsed() >= CHECK_INTERVAL {
            app.run_due_check();
            last_check = Instant::now();
        }
    }
}
