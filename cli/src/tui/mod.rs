pub mod app;
pub mod ui;

use std::io;
use anyhow::Result;
use chrono::Local;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use luxas_core::{FileStore, Session};

use crate::tui::app::{App, InputMode, STEP};

pub fn run(session: Session<FileStore>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, Local::now().date_naive());
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

        if !event::poll(std::time::Duration::from_millis(250))? {
            continue;
        }
        let Event::Key(key) = event::read()? else { continue };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Left | KeyCode::Char('h') => app.previous_month(),
                KeyCode::Right | KeyCode::Char('l') => app.next_month(),
                KeyCode::Char(' ') | KeyCode::Enter => app.fill_day(),
                KeyCode::Char('+') => app.adjust_hours(STEP),
                KeyCode::Char('-') => app.adjust_hours(-STEP),
                KeyCode::Char('o') => app.adjust_overtime(STEP),
                KeyCode::Char('O') => app.adjust_overtime(-STEP),
                KeyCode::Char('d') | KeyCode::Delete => app.clear_day(),
                KeyCode::Char('r') => app.enter_remarks_mode(),
                KeyCode::Char('w') => app.save(),
                KeyCode::Char('s') => app.submit(),
                _ => {}
            },
            InputMode::Remarks => match key.code {
                KeyCode::Enter => app.submit_remarks(),
                KeyCode::Esc => app.exit_input_mode(),
                KeyCode::Char(c) => app.input_char(c),
                KeyCode::Backspace => app.delete_char(),
                KeyCode::Left => app.move_cursor_left(),
                KeyCode::Right => app.move_cursor_right(),
                _ => {}
            },
        }
    }
}
