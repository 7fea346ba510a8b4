//! Contains the command handlers the front end can invoke.
//!
//! Each function corresponds to a `Command::command`. Handlers mutate
//! the `AppState`, call into `core` where needed, and send `UserEvent`s back.

use super::actions::Action;
use super::events::UserEvent;
use super::helpers::{notify_error, with_state_and_notify};
use super::proxy::EventProxy;
use super::state::AppState;
use super::tasks::start_delete_task;
use super::view_model::generate_ui_state;
use crate::core::ErrorPolicy;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Shown for actions the file manager does not offer yet.
pub const NOT_IMPLEMENTED: &str = "Not implemented yet";

/// Runs a function-key action against the active pane.
pub fn run_action<P: EventProxy>(action: Action, proxy: P, state: Arc<Mutex<AppState>>) {
    match action {
        Action::Delete => delete_selection(proxy, state),
        Action::Quit => quit(proxy, state),
        other => {
            debug_assert!(!other.is_implemented());
            tracing::info!("'{}' requested but not implemented", other.label());
            proxy.send_event(UserEvent::ShowError(NOT_IMPLEMENTED.to_string()));
        }
    }
}

/// Deletes every selected entry of the active pane in the background.
pub fn delete_selection<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    let (targets, options, parallel) = {
        let mut state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");

        if state_guard.is_deleting {
            notify_error(&proxy, "A deletion is already running.");
            return;
        }
        let targets: Vec<PathBuf> = state_guard.active_pane().selected.iter().cloned().collect();
        if targets.is_empty() {
            notify_error(&proxy, "Nothing selected.");
            return;
        }

        state_guard.is_deleting = true;
        state_guard.status_message = format!("Deleting {} entries...", targets.len());
        proxy.send_event(UserEvent::StateUpdate(Box::new(generate_ui_state(
            &state_guard,
        ))));
        (
            targets,
            state_guard.config.delete_options(),
            state_guard.config.parallel_delete,
        )
    };

    start_delete_task(targets, options, parallel, proxy, state);
}

/// Persists the pane directories and ends the session.
pub fn quit<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        if let Err(e) = s.save_config() {
            tracing::warn!("Failed to save config on quit: {}", e);
        }
        s.should_quit = true;
        s.status_message = "Bye.".to_string();
    });
    proxy.send_event(UserEvent::Quit);
}

/// Points the active pane at `target`, resolved against its current
/// directory. `..` goes to the parent.
pub fn change_directory<P: EventProxy>(
    target: &str,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    let current = {
        let state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        state_guard.active_pane().directory.clone()
    };

    let resolved = resolve_directory(&current, target);
    if !resolved.is_dir() {
        notify_error(
            &proxy,
            format!("Not a directory: {}", resolved.display()),
        );
        return;
    }

    with_state_and_notify(&state, &proxy, |s| {
        let show_hidden = s.config.show_hidden;
        let pane = s.active_pane_mut();
        pane.directory = resolved;
        pane.selected.clear();
        match pane.refresh(show_hidden) {
            Ok(()) => s.status_message = format!("{}", s.active_pane().directory.display()),
            Err(e) => s.status_message = e.to_string(),
        }
    });
}

fn resolve_directory(current: &Path, target: &str) -> PathBuf {
    let target = target.trim();
    if target == ".." {
        return current
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| current.to_path_buf());
    }
    let joined = current.join(target);
    joined.canonicalize().unwrap_or(joined)
}

/// Makes the other pane the target of actions.
pub fn switch_pane<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.active = s.active.other();
    });
}

/// Toggles the selection of the entry called `name` in the active pane.
pub fn toggle_selection<P: EventProxy>(name: &str, proxy: P, state: Arc<Mutex<AppState>>) {
    let path = {
        let state_guard = state
            .lock()
            .expect("Mutex was poisoned. This should not happen.");
        state_guard
            .active_pane()
            .entry_named(name.trim())
            .map(|entry| entry.path.clone())
    };

    match path {
        Some(path) => with_state_and_notify(&state, &proxy, |s| {
            s.active_pane_mut().toggle_selection(&path);
        }),
        None => notify_error(&proxy, format!("No such entry: {}", name.trim())),
    }
}

pub fn toggle_hidden<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.config.show_hidden = !s.config.show_hidden;
        s.refresh_panes();
    });
}

pub fn refresh<P: EventProxy>(proxy: P, state: Arc<Mutex<AppState>>) {
    with_state_and_notify(&state, &proxy, |s| {
        s.refresh_panes();
    });
}

/// Switches between best-effort and strict deletion.
pub fn set_delete_policy<P: EventProxy>(
    payload: serde_json::Value,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    match serde_json::from_value::<ErrorPolicy>(payload.clone()) {
        Ok(policy) => with_state_and_notify(&state, &proxy, |s| {
            s.config.delete_policy = policy;
            s.status_message = format!("Delete policy: {:?}", policy);
        }),
        Err(_) => notify_error(&proxy, format!("Invalid delete policy: {}", payload)),
    }
}
