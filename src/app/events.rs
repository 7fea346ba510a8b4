//! Defines the event and message structures for communication between the
//! application context and its front end.

use serde::Deserialize;

use super::view_model::UiState;
use crate::core::{DeletionEvent, DeletionReport};

/// Events sent from the application context to the front end.
#[derive(Debug)]
pub enum UserEvent {
    /// A complete state update to re-render both panes.
    StateUpdate(Box<UiState>),
    /// An error message to be displayed to the user.
    ShowError(String),
    /// A single entry was handled by a running deletion.
    EntryDeleted(DeletionEvent),
    /// A deletion started by the Delete action has finished.
    DeletionFinished {
        report: DeletionReport,
        failures: Vec<String>,
    },
    /// The session is over; the front end should shut down.
    Quit,
}

/// A command sent by the front end.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Command {
    /// The name of the command to execute.
    pub command: String,
    /// The payload associated with the command, as a JSON value.
    #[serde(default)]
    pub payload: serde_json::Value,
}

impl Command {
    pub fn new(command: &str, payload: serde_json::Value) -> Self {
        Self {
            command: command.to_string(),
            payload,
        }
    }
}
