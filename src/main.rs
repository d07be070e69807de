mod action;
mod app;
mod auth;
mod cli;
mod config;
mod error;
mod event;
mod github;
mod nav;
mod paging;
mod source;
mod tui;
mod types;
mod ui;

use std::panic;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::cli::Cli;
use crate::config::Config;
use crate::event::Event;
use crate::github::GitHub;
use crate::nav::SystemNavigator;
use crate::source::RepoSource;
use crate::tui::EventHandler;

/// Log to a file under the cache dir so output never lands on the
/// alternate screen. Falls back to stderr.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let log_file = dirs::cache_dir()
        .map(|dir| dir.join("repopage"))
        .and_then(|dir| {
            std::fs::create_dir_all(&dir).ok()?;
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join("repopage.log"))
                .ok()
        });

    match log_file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load(),
    };

    let page_size = cli
        .page_size
        .map(usize::from)
        .unwrap_or(config.general.page_size);
    let user = cli.user.clone().or_else(|| config.general.default_user.clone());
    let api_url = cli.api_url.as_deref().or(config.github.api_url.as_deref());

    let token = auth::load_token(&config.github);
    let github = GitHub::new(token, api_url)?;
    tracing::info!(source = github.name(), page_size, "starting");

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(Arc::new(github), page_size, user).await;

    tui::restore()?;

    result
}

async fn run(
    source: Arc<dyn RepoSource>,
    page_size: usize,
    user: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    let mut app = App::new(
        source,
        Arc::new(SystemNavigator),
        action_tx.clone(),
        page_size,
        user,
    );

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            Some(event) = events.next() => {
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        let mut viewport = None;
                        terminal.draw(|frame| viewport = ui::render(frame, &app))?;
                        if let Some(viewport) = viewport {
                            app.update(Action::RowsVisible(viewport));
                        }
                    }
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
