//! The headless application context: two panes, the action row, and the
//! commands a front end sends to drive them.

pub mod actions;
pub mod commands;
pub mod events;
pub mod helpers;
pub mod proxy;
pub mod state;
pub mod tasks;
pub mod view_model;

use anyhow::{bail, Result};
use serde_json::json;
use std::sync::{Arc, Mutex};

use actions::Action;
use events::Command;
use helpers::notify_error;
use proxy::EventProxy;
use state::AppState;

/// Parses a JSON message from the front end and dispatches it.
pub fn handle_message<P: EventProxy>(message: &str, proxy: P, state: Arc<Mutex<AppState>>) {
    match serde_json::from_str::<Command>(message) {
        Ok(msg) => dispatch(msg, proxy, state),
        Err(e) => notify_error(&proxy, format!("Malformed message: {}", e)),
    }
}

/// Routes a command to its handler.
pub fn dispatch<P: EventProxy>(msg: Command, proxy: P, state: Arc<Mutex<AppState>>) {
    tracing::debug!("Dispatching command '{}'", msg.command);
    let payload_str = msg.payload.as_str().unwrap_or_default().to_string();

    match msg.command.as_str() {
        "action" => match payload_str.parse::<Action>() {
            Ok(action) => commands::run_action(action, proxy, state),
            Err(e) => notify_error(&proxy, e.to_string()),
        },
        "changeDirectory" => commands::change_directory(&payload_str, proxy, state),
        "switchPane" => commands::switch_pane(proxy, state),
        "select" => commands::toggle_selection(&payload_str, proxy, state),
        "toggleHidden" => commands::toggle_hidden(proxy, state),
        "refresh" => commands::refresh(proxy, state),
        "setDeletePolicy" => commands::set_delete_policy(msg.payload, proxy, state),
        other => notify_error(&proxy, format!("Unknown command: {}", other)),
    }
}

/// Turns a line typed at the terminal into a message.
///
/// Lines starting with `{` are taken as JSON messages. Everything else is
/// the short form: `cd <dir>`, `tab`, `select <name>`, `hidden`, `refresh`,
/// `strict on|off`, or an action name or key such as `delete` or `f8`.
pub fn parse_input_line(line: &str) -> Result<Command> {
    let line = line.trim();
    if line.starts_with('{') {
        return Ok(serde_json::from_str(line)?);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let message = match word.to_ascii_lowercase().as_str() {
        "cd" if !rest.is_empty() => Command::new("changeDirectory", json!(rest)),
        "tab" => Command::new("switchPane", json!(null)),
        "select" | "sel" if !rest.is_empty() => Command::new("select", json!(rest)),
        "hidden" => Command::new("toggleHidden", json!(null)),
        "refresh" | "r" => Command::new("refresh", json!(null)),
        "strict" => match rest {
            "on" => Command::new("setDeletePolicy", json!("strict")),
            "off" => Command::new("setDeletePolicy", json!("bestEffort")),
            _ => bail!("Usage: strict on|off"),
        },
        "" => bail!("Empty command"),
        _ => {
            let action: Action = line.parse()?;
            Command::new("action", json!(action.name()))
        }
    };
    Ok(message)
}
