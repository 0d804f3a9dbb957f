pub mod app;
pub mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::tui::app::{App, InputMode};
use crate::Service;

pub fn run(service: Service) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(service);
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{:?}", err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal
            .draw(|f| ui::draw(f, app))
            .map_err(|e| io::Error::other(e.to_string()))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && !handle_key(app, key) {
                    return Ok(());
                }
            }
        }
    }
}

/// Returns false when the user asked to quit.
fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    match app.input_mode {
        InputMode::Normal => match key.code {
            KeyCode::Char('q') => return false,
            KeyCode::Down | KeyCode::Char('j') => app.next(),
            KeyCode::Up | KeyCode::Char('k') => app.previous(),
            KeyCode::Char(' ') | KeyCode::Enter => app.toggle_status(),
            KeyCode::Char('d') | KeyCode::Delete => app.delete_task(),
            KeyCode::Char('a') => app.enter_add_mode(),
            KeyCode::Char('e') => app.enter_edit_mode(),
            KeyCode::Char('/') => app.enter_search_mode(),
            KeyCode::Char('f') | KeyCode::Tab => app.next_filter(),
            KeyCode::Char('F') | KeyCode::BackTab => app.previous_filter(),
            KeyCode::Char('t') => app.toggle_theme(),
            _ => {}
        },
        InputMode::Searching | InputMode::Adding | InputMode::Editing(_) => match key.code {
            KeyCode::Enter => app.submit(),
            KeyCode::Esc => app.exit_input_mode(),
            KeyCode::Char(c) => app.input_char(c),
            KeyCode::Backspace => app.delete_char(),
            KeyCode::Left => app.move_cursor_left(),
            KeyCode::Right => app.move_cursor_right(),
            _ => {}
        },
    }
    true
}
