//! Terminal user interface for cohortdesk.
//!
//! Components hold explicit view state and draw it with ratatui; the app
//! component routes actions between them and the background task manager.

pub mod app_component;
pub mod components;
pub mod core;
pub mod layout;

pub use app_component::{AppComponent, Services};
pub use layout::LayoutManager;

use crate::ui::core::{Component, EventHandler, EventType};
use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::io;

/// Set up the terminal, run the app until it quits, then restore the terminal
pub async fn run_app(mut app: AppComponent) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_ui(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

async fn run_ui<B: Backend>(terminal: &mut Terminal<B>, app: &mut AppComponent) -> Result<()> {
    let mut events = EventHandler::new();
    app.start();

    loop {
        app.process_background_actions();
        terminal.draw(|f| {
            let area = f.area();
            app.render(f, area);
        })?;

        if let EventType::Key(key) = events.next_event().await? {
            let action = app.handle_key_events(key);
            app.dispatch(action);
        }

        if app.should_quit() {
            break;
        }
    }

    Ok(())
}
