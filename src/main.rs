use dual_commander::app::{self, events::UserEvent, state::AppState, view_model::render_text};
use dual_commander::config::{metadata::AppMetadata, AppConfig};
use dual_commander::utils::logging::init_logging;
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    init_logging();

    let metadata = AppMetadata::bundled();
    match metadata.release_date {
        Some(date) => println!("Dual Commander {} (released {})", metadata.version, date),
        None => println!("Dual Commander {} (development build)", metadata.version),
    }

    let config = AppConfig::load(None).unwrap_or_else(|e| {
        tracing::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    let state = Arc::new(Mutex::new(AppState::new(config, None)));
    let (proxy, mut event_rx) = mpsc::unbounded_channel::<UserEvent>();

    // Draws everything the application context reports until it quits.
    let printer = tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                UserEvent::StateUpdate(ui_state) => println!("\n{}", render_text(&ui_state)),
                UserEvent::ShowError(message) => println!("Error: {}", message),
                UserEvent::EntryDeleted(event) => {
                    tracing::debug!("{} -> {:?}", event.path().display(), event.outcome())
                }
                UserEvent::DeletionFinished { failures, .. } => {
                    for failure in failures {
                        println!("  {}", failure);
                    }
                }
                UserEvent::Quit => break,
            }
        }
    });

    {
        let state_guard = state.lock().expect("Mutex was poisoned. This should not happen.");
        println!("\n{}", render_text(&app::view_model::generate_ui_state(&state_guard)));
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!("Failed to read from stdin: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match app::parse_input_line(&line) {
            Ok(message) => app::dispatch(message, proxy.clone(), state.clone()),
            Err(e) => println!("Error: {}", e),
        }

        let should_quit = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.")
            .should_quit;
        if should_quit {
            break;
        }
    }

    let already_quit = state
        .lock()
        .expect("Mutex was poisoned. This should not happen.")
        .should_quit;
    if !already_quit {
        app::commands::quit(proxy.clone(), state.clone());
    }

    if let Err(e) = printer.await {
        tracing::error!("Event printer failed: {}", e);
    }
}
