//! The function-key actions shown below the panes.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Action {
    View,
    Edit,
    Copy,
    Move,
    Mkdir,
    Delete,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown action: {0}")]
pub struct UnknownAction(pub String);

impl Action {
    /// All actions in the order their buttons are laid out.
    pub const ALL: [Action; 7] = [
        Action::View,
        Action::Edit,
        Action::Copy,
        Action::Move,
        Action::Mkdir,
        Action::Delete,
        Action::Quit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Action::View => "F3",
            Action::Edit => "F4",
            Action::Copy => "F5",
            Action::Move => "F6",
            Action::Mkdir => "F7",
            Action::Delete => "F8",
            Action::Quit => "Alt+F4",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Action::View => "View",
            Action::Edit => "Edit",
            Action::Copy => "Copy",
            Action::Move => "Move",
            Action::Mkdir => "Mkdir",
            Action::Delete => "Delete",
            Action::Quit => "Quit",
        }
    }

    /// The button caption, e.g. `F8 Delete`.
    pub fn label(self) -> String {
        format!("{} {}", self.key(), self.name())
    }

    pub fn is_implemented(self) -> bool {
        matches!(self, Action::Delete | Action::Quit)
    }
}

impl FromStr for Action {
    type Err = UnknownAction;

    /// Accepts the action name or its key, ignoring case (`delete`, `F8`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Action::ALL
            .into_iter()
            .find(|action| {
                action.name().eq_ignore_ascii_case(wanted) || action.key().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| UnknownAction(wanted.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_follow_button_row() {
        let labels: Vec<_> = Action::ALL.iter().map(|a| a.label()).collect();
        assert_eq!(
            labels,
            vec![
                "F3 View",
                "F4 Edit",
                "F5 Copy",
                "F6 Move",
                "F7 Mkdir",
                "F8 Delete",
                "Alt+F4 Quit"
            ]
        );
    }

    #[test]
    fn test_parse_by_name_or_key() {
        assert_eq!("delete".parse::<Action>(), Ok(Action::Delete));
        assert_eq!("f8".parse::<Action>(), Ok(Action::Delete));
        assert_eq!(" MKDIR ".parse::<Action>(), Ok(Action::Mkdir));
        assert_eq!("alt+f4".parse::<Action>(), Ok(Action::Quit));
        assert_eq!(
            "rename".parse::<Action>(),
            Err(UnknownAction("rename".to_string()))
        );
    }

    #[test]
    fn test_only_delete_and_quit_are_implemented() {
        let implemented: Vec<_> = Action::ALL.into_iter().filter(|a| a.is_implemented()).collect();
        assert_eq!(implemented, vec![Action::Delete, Action::Quit]);
    }
}
