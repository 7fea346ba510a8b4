//! Reads the entries a pane displays.

use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// A handle to a single file-system entry, as seen without following links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileEntry {
    pub name: String,
    pub path: PathBuf,
    pub kind: EntryKind,
    pub size: u64,
}

impl FileEntry {
    pub fn from_path(path: &Path) -> io::Result<Self> {
        let metadata = fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();
        let kind = if file_type.is_dir() {
            EntryKind::Directory
        } else if file_type.is_file() {
            EntryKind::File
        } else if file_type.is_symlink() {
            EntryKind::Symlink
        } else {
            EntryKind::Other
        };

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self {
            name,
            path: path.to_path_buf(),
            kind,
            size: if kind == EntryKind::File { metadata.len() } else { 0 },
        })
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }
}

/// Lists the immediate children of `dir`: directories first, then
/// everything else, each group ordered by name ignoring case.
///
/// Entries that vanish between reading the directory and inspecting them
/// are skipped.
pub fn list_directory(dir: &Path, show_hidden: bool) -> Result<Vec<FileEntry>, CoreError> {
    if !dir.is_dir() {
        return Err(CoreError::NotADirectory(dir.to_path_buf()));
    }

    let read_dir = fs::read_dir(dir).map_err(|e| CoreError::Io(e, dir.to_path_buf()))?;
    let mut entries = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| CoreError::Io(e, dir.to_path_buf()))?;
        match FileEntry::from_path(&entry.path()) {
            Ok(file_entry) if show_hidden || !file_entry.is_hidden() => entries.push(file_entry),
            Ok(_) => {}
            Err(e) => tracing::debug!("Skipping {}: {}", entry.path().display(), e),
        }
    }

    entries.sort_by(|a, b| {
        b.is_directory()
            .cmp(&a.is_directory())
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_directory_puts_directories_first() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("A.txt"), "a").unwrap();
        fs::create_dir(dir.path().join("zeta")).unwrap();
        fs::create_dir(dir.path().join("Alpha")).unwrap();

        let names: Vec<_> = list_directory(dir.path(), false)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();

        assert_eq!(names, vec!["Alpha", "zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn test_list_directory_hides_dotfiles_unless_asked() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(".hidden"), "").unwrap();
        fs::write(dir.path().join("shown"), "").unwrap();

        assert_eq!(list_directory(dir.path(), false).unwrap().len(), 1);
        assert_eq!(list_directory(dir.path(), true).unwrap().len(), 2);
    }

    #[test]
    fn test_list_directory_rejects_files() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("plain");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            list_directory(&file, false),
            Err(CoreError::NotADirectory(p)) if p == file
        ));
    }

    #[test]
    fn test_file_entry_reports_kind_and_size() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("data.bin");
        fs::write(&file, [0u8; 42]).unwrap();

        let entry = FileEntry::from_path(&file).unwrap();
        assert_eq!(entry.kind, EntryKind::File);
        assert_eq!(entry.size, 42);
        assert_eq!(entry.name, "data.bin");

        let dir_entry = FileEntry::from_path(dir.path()).unwrap();
        assert!(dir_entry.is_directory());
        assert_eq!(dir_entry.size, 0);
    }
}
