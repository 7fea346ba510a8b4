//! Defines the central, mutable state of the application.

use crate::config::{settings, AppConfig};
use crate::core::{list_directory, CoreError, FileEntry};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// One of the two file lists.
#[derive(Debug, Clone)]
pub struct PaneState {
    /// The directory the pane is showing.
    pub directory: PathBuf,
    /// The directory's entries as of the last refresh.
    pub entries: Vec<FileEntry>,
    /// Absolute paths of the selected entries.
    pub selected: BTreeSet<PathBuf>,
}

impl PaneState {
    pub fn new(directory: PathBuf) -> Self {
        Self {
            directory,
            entries: Vec::new(),
            selected: BTreeSet::new(),
        }
    }

    /// Re-reads the directory. Selected entries that no longer exist are
    /// dropped from the selection.
    pub fn refresh(&mut self, show_hidden: bool) -> Result<(), CoreError> {
        match list_directory(&self.directory, show_hidden) {
            Ok(entries) => {
                self.selected
                    .retain(|path| entries.iter().any(|entry| &entry.path == path));
                self.entries = entries;
                Ok(())
            }
            Err(e) => {
                self.entries.clear();
                self.selected.clear();
                Err(e)
            }
        }
    }

    /// Moves the pane up to the nearest existing ancestor if its directory
    /// has disappeared. Returns the new directory when the pane moved.
    pub fn leave_missing_directory(&mut self) -> Option<PathBuf> {
        if self.directory.is_dir() {
            return None;
        }
        let ancestor = self
            .directory
            .ancestors()
            .skip(1)
            .find(|dir| dir.is_dir())?
            .to_path_buf();
        self.directory = ancestor.clone();
        self.selected.clear();
        Some(ancestor)
    }

    pub fn entry_named(&self, name: &str) -> Option<&FileEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Adds the entry to the selection, or removes it if already selected.
    /// Returns whether the entry is selected afterwards.
    pub fn toggle_selection(&mut self, path: &Path) -> bool {
        if self.selected.remove(path) {
            false
        } else {
            self.selected.insert(path.to_path_buf());
            true
        }
    }
}

/// Holds the complete, mutable state of the application.
///
/// This struct is wrapped in an `Arc<Mutex<...>>` so that command handlers
/// and the background deletion task can share it.
pub struct AppState {
    /// The application's configuration settings.
    pub config: AppConfig,
    /// Where the configuration is persisted; `None` for the platform default.
    pub config_dir: Option<PathBuf>,
    pub left: PaneState,
    pub right: PaneState,
    /// The pane actions apply to.
    pub active: Side,
    /// `true` while a deletion task is running.
    pub is_deleting: bool,
    /// Set by the Quit action.
    pub should_quit: bool,
    pub status_message: String,
}

impl AppState {
    /// Builds the state from a configuration. Panes without a remembered
    /// directory start in the working directory. Both panes are listed
    /// immediately.
    pub fn new(config: AppConfig, config_dir: Option<PathBuf>) -> Self {
        let fallback = std::env::current_dir()
            .ok()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));
        let pick = |remembered: &Option<PathBuf>| {
            remembered
                .clone()
                .filter(|dir| dir.is_dir())
                .unwrap_or_else(|| fallback.clone())
        };

        let mut state = Self {
            left: PaneState::new(pick(&config.left_directory)),
            right: PaneState::new(pick(&config.right_directory)),
            config,
            config_dir,
            active: Side::Left,
            is_deleting: false,
            should_quit: false,
            status_message: "Ready.".to_string(),
        };
        state.refresh_panes();
        state
    }

    pub fn pane(&self, side: Side) -> &PaneState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn pane_mut(&mut self, side: Side) -> &mut PaneState {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn active_pane(&self) -> &PaneState {
        self.pane(self.active)
    }

    pub fn active_pane_mut(&mut self) -> &mut PaneState {
        self.pane_mut(self.active)
    }

    /// Re-reads both panes. A pane whose directory has vanished first moves
    /// up to the nearest existing ancestor; a pane that cannot be listed is
    /// shown empty.
    ///
    /// Returns one note per pane that moved or failed. The last note also
    /// goes to the status line.
    pub fn refresh_panes(&mut self) -> Vec<String> {
        let show_hidden = self.config.show_hidden;
        let mut notes = Vec::new();
        for side in [Side::Left, Side::Right] {
            let pane = self.pane_mut(side);
            if let Some(directory) = pane.leave_missing_directory() {
                tracing::info!("{:?} pane moved to {}", side, directory.display());
                notes.push(format!("{:?} pane moved to {}.", side, directory.display()));
            }
            if let Err(e) = pane.refresh(show_hidden) {
                tracing::warn!("Failed to refresh {:?} pane: {}", side, e);
                notes.push(e.to_string());
            }
        }
        if let Some(last) = notes.last() {
            self.status_message = last.clone();
        }
        notes
    }

    /// Stores both pane directories in the configuration and persists it.
    pub fn save_config(&mut self) -> anyhow::Result<()> {
        self.config.left_directory = Some(self.left.directory.clone());
        self.config.right_directory = Some(self.right.directory.clone());
        settings::save_config(&self.config, self.config_dir.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn config_for(left: &Path, right: &Path) -> AppConfig {
        AppConfig {
            left_directory: Some(left.to_path_buf()),
            right_directory: Some(right.to_path_buf()),
            ..Default::default()
        }
    }

    #[test]
    fn test_new_lists_both_panes() {
        let dir = tempdir().unwrap();
        let left = dir.path().join("left");
        let right = dir.path().join("right");
        fs::create_dir_all(left.join("sub")).unwrap();
        fs::create_dir_all(&right).unwrap();
        fs::write(right.join("file.txt"), "x").unwrap();

        let state = AppState::new(config_for(&left, &right), None);

        assert_eq!(state.left.entries.len(), 1);
        assert_eq!(state.right.entries[0].name, "file.txt");
        assert_eq!(state.active, Side::Left);
    }

    #[test]
    fn test_refresh_drops_vanished_selection() {
        let dir = tempdir().unwrap();
        let gone = dir.path().join("gone.txt");
        let kept = dir.path().join("kept.txt");
        fs::write(&gone, "x").unwrap();
        fs::write(&kept, "x").unwrap();

        let mut pane = PaneState::new(dir.path().to_path_buf());
        pane.refresh(false).unwrap();
        pane.toggle_selection(&gone);
        pane.toggle_selection(&kept);
        fs::remove_file(&gone).unwrap();
        pane.refresh(false).unwrap();

        assert_eq!(pane.selected.len(), 1);
        assert!(pane.selected.contains(&kept));
    }

    #[test]
    fn test_refresh_of_missing_directory_empties_pane() {
        let dir = tempdir().unwrap();
        let doomed = dir.path().join("doomed");
        fs::create_dir(&doomed).unwrap();
        fs::write(doomed.join("a"), "x").unwrap();

        let mut pane = PaneState::new(doomed.clone());
        pane.refresh(false).unwrap();
        fs::remove_dir_all(&doomed).unwrap();

        assert!(pane.refresh(false).is_err());
        assert!(pane.entries.is_empty());
    }

    #[test]
    fn test_refresh_panes_moves_pane_out_of_deleted_directory() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("trash/sub");
        fs::create_dir_all(&nested).unwrap();
        let mut state = AppState::new(config_for(dir.path(), &nested), None);
        state.right.toggle_selection(&nested.join("x"));

        fs::remove_dir_all(dir.path().join("trash")).unwrap();
        let notes = state.refresh_panes();

        assert_eq!(state.right.directory, dir.path());
        assert!(state.right.selected.is_empty());
        assert_eq!(
            notes,
            vec![format!("Right pane moved to {}.", dir.path().display())]
        );
        assert_eq!(state.status_message, notes[0]);
        assert_eq!(state.left.directory, dir.path());
    }

    #[test]
    fn test_toggle_selection() {
        let mut pane = PaneState::new(PathBuf::from("/tmp"));
        let path = PathBuf::from("/tmp/a");

        assert!(pane.toggle_selection(&path));
        assert!(!pane.toggle_selection(&path));
        assert!(pane.selected.is_empty());
    }

    #[test]
    fn test_save_config_remembers_directories() {
        let dir = tempdir().unwrap();
        let config_dir = dir.path().join("config");
        let mut state = AppState::new(config_for(dir.path(), dir.path()), Some(config_dir.clone()));
        state.right.directory = config_dir.clone();

        state.save_config().unwrap();
        let loaded = settings::load_config(Some(&config_dir)).unwrap();

        assert_eq!(loaded.right_directory, Some(config_dir));
        assert_eq!(loaded.left_directory, Some(dir.path().to_path_buf()));
    }
}
