mod api;
mod app;
mod config;
mod logging;
mod models;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tracing::info;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::api::ProjectsClient;
use crate::app::App;
use crate::ui::{project_form::render_project_form, projects::render_projects};

/// How long to wait on pending requests before checking for keys again
const INPUT_POLL: Duration = Duration::from_millis(50);

/// Terminal admin screen for a REST projects collection
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Collection URL, overrides PROJECTS_URL
    #[arg(long)]
    url: Option<String>,

    /// Log file, overrides PROJECTS_LOG_FILE
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = config::init(args.url, args.log_file)?;
    logging::init(&config.log_file)?;
    info!(url = %config.url, auth = config.api_token.is_some(), "starting projects admin");

    let client = ProjectsClient::from_config(&config)?;
    let mut app = App::new(Arc::new(client));

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.load();

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!(error = %err, "terminal loop failed");
        println!("Error: {}", err);
    }

    info!("projects admin stopped");

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Render the list, with the modal form on top if one is open
        terminal.draw(|f| {
            render_projects(f, app.projects_mut());
            if let Some(form) = app.form() {
                render_project_form(f, form);
            }
        })?;

        // Handle every key already queued without blocking the runtime
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key);
                }
            }
        }

        if app.should_quit() {
            break;
        }

        // Wait for a finished request or the next input tick
        tokio::select! {
            Some(api_event) = app.next_api_event() => {
                app.apply(api_event);
                app.drain_api_events();
            }
            _ = tokio::time::sleep(INPUT_POLL) => {}
        }
    }

    Ok(())
}
