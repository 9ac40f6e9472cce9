use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::db::Database;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(db: &mut Database) -> Result<()> {
    let mut app = App::new();
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Rows left for list content: tab, status, command bars, the
            // expenses footer, and the table borders + header.
            let content_height = f.area().height.saturating_sub(7) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db)?,
                InputMode::Command => handle_command_input(key, app, db)?,
                InputMode::Confirm => handle_confirm_input(key, app, db)?,
            }
        }
    }
    Ok(())
}

/// Route a command, reporting failures in the status bar instead of tearing
/// the TUI down. Only startup errors are fatal.
fn run_command(input: &str, app: &mut App, db: &mut Database) {
    if let Err(e) = commands::handle_command(input, app, db) {
        app.set_status(format!("Error: {e:#}"));
    }
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('J') if app.screen == Screen::Expenses => {
            run_command("move-down", app, db);
        }
        KeyCode::Char('K') if app.screen == Screen::Expenses => {
            run_command("move-up", app, db);
        }
        KeyCode::Char('D') if app.screen == Screen::Expenses => {
            run_command("delete", app, db);
        }
        KeyCode::Char('1') => switch_screen(app, db, Screen::Expenses)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Budget)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Charts)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Char('g') => {
            if app.screen == Screen::Expenses {
                scroll_to_top(&mut app.expense_index, &mut app.expense_scroll);
            }
        }
        KeyCode::Char('G') => {
            if app.screen == Screen::Expenses {
                let len = app.visible().len();
                scroll_to_bottom(
                    &mut app.expense_index,
                    &mut app.expense_scroll,
                    len,
                    app.visible_rows.max(1),
                );
            }
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Esc => {
            app.status_message.clear();
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            run_command(&input, app, db);
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &mut Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            if let Some(action) = app.pending_action.take() {
                if let Err(e) = run_pending_action(action, app, db) {
                    app.set_status(format!("Error: {e:#}"));
                }
            }
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
        }
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.staged_import = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

fn run_pending_action(action: PendingAction, app: &mut App, db: &mut Database) -> Result<()> {
    match action {
        PendingAction::DeleteExpense { id, name } => {
            db.delete_expense(id)?;
            app.refresh_all(db)?;
            app.status_after_change(format!("Deleted: {name}"));
        }
        PendingAction::ImportReplace => {
            if let Some(outcome) = app.staged_import.take() {
                let count = commands::commit_import(db, &outcome, app.today)?;
                app.refresh_all(db)?;
                let msg = if outcome.skipped > 0 {
                    format!(
                        "Imported {count} expenses ({} malformed rows skipped)",
                        outcome.skipped
                    )
                } else {
                    format!("Imported {count} expenses")
                };
                app.status_after_change(msg);
            }
        }
        PendingAction::ClearAll => {
            db.clear_all()?;
            app.refresh_all(db)?;
            app.set_status("All expenses and budgets cleared");
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &mut Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Expenses => app.refresh_all(db)?,
        Screen::Budget => app.refresh_budget(db)?,
        Screen::Charts => {
            app.refresh_expenses(db)?;
            app.refresh_charts();
        }
    }
    Ok(())
}

fn handle_move_down(app: &mut App) {
    if app.screen == Screen::Expenses {
        let len = app.visible().len();
        scroll_down(
            &mut app.expense_index,
            &mut app.expense_scroll,
            len,
            app.visible_rows.max(1),
        );
    }
}

fn handle_move_up(app: &mut App) {
    if app.screen == Screen::Expenses {
        scroll_up(&mut app.expense_index, &mut app.expense_scroll);
    }
}
