mod controller;
mod logging;
mod media;
mod model;
mod view;

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::sync::Mutex;

use controller::KaraokeController;
use media::MediaDeck;
use model::{AppModel, Catalog};
use view::AppView;

const DEFAULT_CATALOG: &str = "songs.json";

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(e) = logging::init_logging() {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    tracing::info!("=== karaoke-rs starting ===");

    // Step 1: Load the song catalog. A broken catalog is fatal.
    let catalog_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CATALOG.to_string());
    let catalog = Catalog::load(Path::new(&catalog_path))
        .with_context(|| format!("could not load song catalog from {catalog_path}"))?;
    if catalog.is_empty() {
        tracing::warn!(path = %catalog_path, "Catalog has no songs");
    }
    tracing::info!(path = %catalog_path, songs = catalog.len(), "Catalog loaded");

    let model = Arc::new(Mutex::new(AppModel::new(catalog)));

    // Step 2: Open the audio output and build the deck. The stream must
    // outlive playback and is not Send, so it stays on this task; a
    // missing audio device degrades to a browsable, silent song book.
    let deck: Arc<Mutex<Option<MediaDeck>>> = Arc::new(Mutex::new(None));
    let _stream = match media::open_output() {
        Ok((stream, built)) => {
            *deck.lock().await = Some(built);
            Some(stream)
        }
        Err(e) => {
            tracing::error!(error = %e, "Audio output init failed");
            model
                .lock()
                .await
                .set_error(format!("Audio init failed: {}", e))
                .await;
            None
        }
    };

    // Step 3: Wire the deck ticker to the controller's event listener.
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    media::spawn_event_ticker(deck.clone(), event_tx);

    let controller = KaraokeController::new(model.clone(), deck.clone());
    controller.start_media_event_listener(event_rx);

    tracing::info!("Starting TUI...");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, model, controller).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = ?err, "Application error");
    }

    tracing::info!("karaoke-rs shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: Arc<Mutex<AppModel>>,
    controller: KaraokeController,
) -> io::Result<()> {
    loop {
        // Get current state
        let (playback, ui_state, queue, should_quit) = {
            let model_guard = model.lock().await;

            // Auto-clear old errors (after 5 seconds)
            model_guard.auto_clear_old_errors().await;

            (
                model_guard.get_playback_info().await,
                model_guard.get_ui_state().await,
                model_guard.get_queue_view().await,
                model_guard.should_quit().await,
            )
        };

        // Draw UI
        terminal.draw(|f| {
            AppView::render(f, &playback, &ui_state, &queue);
        })?;

        // Handle input with shorter poll time for smoother UI updates
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                let _ = controller.handle_key_event(key).await;
            }
        }

        if should_quit {
            break;
        }
    }

    Ok(())
}
