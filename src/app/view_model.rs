//! Responsible for transforming the `AppState` into a `UiState` view model.
//!
//! This module acts as a presentation layer: it snapshots both panes and the
//! action row into plain data the front end can draw without touching the
//! shared state.

use serde::Serialize;
use std::path::PathBuf;

use super::actions::Action;
use super::state::{AppState, PaneState, Side};
use crate::core::EntryKind;

/// A serializable representation of the application state for the UI.
#[derive(Serialize, Clone, Debug)]
pub struct UiState {
    pub left: PaneView,
    pub right: PaneView,
    pub active: Side,
    pub actions: Vec<ActionButton>,
    pub is_deleting: bool,
    pub status_message: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct PaneView {
    pub directory: PathBuf,
    pub entries: Vec<EntryView>,
}

#[derive(Serialize, Clone, Debug)]
pub struct EntryView {
    pub name: String,
    pub kind: EntryKind,
    pub size: u64,
    pub is_selected: bool,
}

#[derive(Serialize, Clone, Debug)]
pub struct ActionButton {
    pub action: Action,
    pub label: String,
    pub enabled: bool,
}

/// Creates the complete `UiState` from the current `AppState`.
pub fn generate_ui_state(state: &AppState) -> UiState {
    let actions = Action::ALL
        .into_iter()
        .map(|action| ActionButton {
            action,
            label: action.label(),
            enabled: !(state.is_deleting && action == Action::Delete),
        })
        .collect();

    UiState {
        left: pane_view(&state.left),
        right: pane_view(&state.right),
        active: state.active,
        actions,
        is_deleting: state.is_deleting,
        status_message: state.status_message.clone(),
    }
}

fn pane_view(pane: &PaneState) -> PaneView {
    PaneView {
        directory: pane.directory.clone(),
        entries: pane
            .entries
            .iter()
            .map(|entry| EntryView {
                name: entry.name.clone(),
                kind: entry.kind,
                size: entry.size,
                is_selected: pane.selected.contains(&entry.path),
            })
            .collect(),
    }
}

/// Renders the view model for a plain terminal: both panes one below the
/// other, the action row, then the status line.
pub fn render_text(ui: &UiState) -> String {
    let mut lines = Vec::new();
    render_pane(&mut lines, "Left", &ui.left, ui.active == Side::Left);
    render_pane(&mut lines, "Right", &ui.right, ui.active == Side::Right);

    let buttons: Vec<String> = ui
        .actions
        .iter()
        .map(|button| {
            if button.enabled {
                button.label.clone()
            } else {
                format!("[{}]", button.label)
            }
        })
        .collect();
    lines.push(buttons.join(" | "));

    if !ui.status_message.is_empty() {
        lines.push(ui.status_message.clone());
    }
    lines.join("\n")
}

fn render_pane(lines: &mut Vec<String>, title: &str, pane: &PaneView, active: bool) {
    let marker = if active { '*' } else { ' ' };
    lines.push(format!("{} {}: {}", marker, title, pane.directory.display()));

    if pane.entries.is_empty() {
        lines.push("    (empty)".to_string());
    }
    for entry in &pane.entries {
        let selected = if entry.is_selected { '+' } else { ' ' };
        let name = match entry.kind {
            EntryKind::Directory => format!("{}/", entry.name),
            EntryKind::Symlink => format!("{}@", entry.name),
            EntryKind::File => format!("{} ({} B)", entry.name, entry.size),
            EntryKind::Other => entry.name.clone(),
        };
        lines.push(format!("  {} {}", selected, name));
    }
}
