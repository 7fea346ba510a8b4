//! Post-order deletion of a file-system subtree.
//!
//! The traversal runs on an explicit work stack instead of call-stack
//! recursion, so arbitrarily deep trees cannot overflow the stack. Symbolic
//! links are removed as links and never followed, which also rules out
//! cycles. Every entry reachable from the root gets exactly one removal
//! attempt, and a directory's attempt always comes after all of its
//! children's.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::error::{DeletionError, FailureStage, NodeFailure};

/// How failures of individual entries affect the result of a deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorPolicy {
    /// Log failures and keep going; the deletion itself never fails.
    #[default]
    BestEffort,
    /// Attempt the whole tree, then return every failure that occurred.
    Strict,
}

/// Which removal attempts are reported to the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotifyPolicy {
    /// One event per attempt, whatever its outcome.
    #[default]
    EveryAttempt,
    /// Only entries that were actually removed.
    SuccessOnly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DeleteOptions {
    pub error_policy: ErrorPolicy,
    pub notify: NotifyPolicy,
}

/// The result of a single removal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalOutcome {
    Removed,
    /// The entry was already gone when its removal was attempted.
    Missing,
    Failed(io::ErrorKind),
}

impl RemovalOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, RemovalOutcome::Removed)
    }
}

/// Emitted after the removal of an entry has been attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionEvent {
    path: PathBuf,
    outcome: RemovalOutcome,
}

impl DeletionEvent {
    pub fn new(path: PathBuf, outcome: RemovalOutcome) -> Self {
        Self { path, outcome }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn outcome(&self) -> RemovalOutcome {
        self.outcome
    }
}

/// Receives one call per handled entry, synchronously and in traversal order.
///
/// A slow observer stalls the traversal, so implementations should hand any
/// heavy work off elsewhere.
pub trait DeletionObserver {
    fn entry_deleted(&mut self, event: &DeletionEvent);
}

impl<F> DeletionObserver for F
where
    F: FnMut(&DeletionEvent),
{
    fn entry_deleted(&mut self, event: &DeletionEvent) {
        self(event)
    }
}

/// An observer that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DeletionObserver for NoopObserver {
    fn entry_deleted(&mut self, _event: &DeletionEvent) {}
}

/// Counters collected over one deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    pub attempted: usize,
    pub removed: usize,
    pub missing: usize,
    pub failed: usize,
    pub unlistable: usize,
}

impl DeletionReport {
    pub fn merge(&mut self, other: &DeletionReport) {
        self.attempted += other.attempted;
        self.removed += other.removed;
        self.missing += other.missing;
        self.failed += other.failed;
        self.unlistable += other.unlistable;
    }
}

/// Deletes `root` and everything beneath it with the default best-effort
/// options, notifying `observer` if one is given.
pub fn delete_tree(
    root: &Path,
    observer: Option<&mut dyn DeletionObserver>,
) -> Result<DeletionReport, DeletionError> {
    let deleter = TreeDeleter::default();
    match observer {
        Some(observer) => deleter.delete(root, observer),
        None => deleter.delete(root, &mut NoopObserver),
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeDeleter {
    options: DeleteOptions,
}

impl TreeDeleter {
    pub fn new(options: DeleteOptions) -> Self {
        Self { options }
    }

    /// Deletes `root` and its subtree on the calling thread.
    pub fn delete<O>(&self, root: &Path, observer: &mut O) -> Result<DeletionReport, DeletionError>
    where
        O: DeletionObserver + ?Sized,
    {
        tracing::debug!("Deleting tree rooted at {}", root.display());
        let mut traversal = Traversal::new(self.options, observer);
        traversal.run(root);
        traversal.finish()
    }

    /// Deletes the immediate subtrees of `root` on the rayon pool, then `root`.
    ///
    /// Observer calls are serialized, so the observer still sees exactly one
    /// event per entry, and the root's event is always the last one.
    pub fn delete_parallel<O>(
        &self,
        root: &Path,
        observer: &mut O,
    ) -> Result<DeletionReport, DeletionError>
    where
        O: DeletionObserver + Send + ?Sized,
    {
        if !is_real_directory(root) {
            return self.delete(root, observer);
        }

        tracing::debug!("Deleting tree rooted at {} in parallel", root.display());
        let shared = Mutex::new(observer);
        let mut forward = Serialized(&shared);
        let mut root_traversal = Traversal::new(self.options, &mut forward);
        let children = root_traversal.list_children(root);

        let options = self.options;
        let subtrees: Vec<(DeletionReport, Vec<NodeFailure>)> = children
            .par_iter()
            .map(|child| {
                let mut forward = Serialized(&shared);
                let mut traversal = Traversal::new(options, &mut forward);
                traversal.run(child);
                (traversal.report, traversal.failures)
            })
            .collect();

        for (report, failures) in subtrees {
            root_traversal.report.merge(&report);
            root_traversal.failures.extend(failures);
        }
        root_traversal.remove(root.to_path_buf(), true);
        root_traversal.finish()
    }
}

/// Forwards events from several workers into one observer, one at a time.
struct Serialized<'m, 'o, O: ?Sized>(&'m Mutex<&'o mut O>);

impl<O> DeletionObserver for Serialized<'_, '_, O>
where
    O: DeletionObserver + ?Sized,
{
    fn entry_deleted(&mut self, event: &DeletionEvent) {
        let mut observer = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        observer.entry_deleted(event);
    }
}

enum Frame {
    Visit(PathBuf),
    Remove { path: PathBuf, is_dir: bool },
}

struct Traversal<'a, O: ?Sized> {
    options: DeleteOptions,
    observer: &'a mut O,
    report: DeletionReport,
    failures: Vec<NodeFailure>,
}

impl<'a, O> Traversal<'a, O>
where
    O: DeletionObserver + ?Sized,
{
    fn new(options: DeleteOptions, observer: &'a mut O) -> Self {
        Self {
            options,
            observer,
            report: DeletionReport::default(),
            failures: Vec::new(),
        }
    }

    fn run(&mut self, root: &Path) {
        let mut stack = vec![Frame::Visit(root.to_path_buf())];

        while let Some(frame) = stack.pop() {
            match frame {
                Frame::Visit(path) => {
                    let is_dir = is_real_directory(&path);
                    let children = if is_dir {
                        self.list_children(&path)
                    } else {
                        Vec::new()
                    };
                    // The parent's removal sits below its children on the stack.
                    stack.push(Frame::Remove { path, is_dir });
                    stack.extend(children.into_iter().rev().map(Frame::Visit));
                }
                Frame::Remove { path, is_dir } => self.remove(path, is_dir),
            }
        }
    }

    /// Lists a directory's immediate children. A directory that cannot be
    /// read is treated as empty.
    fn list_children(&mut self, dir: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                self.listing_failed(dir, err);
                return Vec::new();
            }
        };

        let mut children = Vec::new();
        for entry in entries {
            match entry {
                Ok(entry) => children.push(entry.path()),
                Err(err) => self.listing_failed(dir, err),
            }
        }
        children
    }

    fn listing_failed(&mut self, dir: &Path, err: io::Error) {
        tracing::warn!("Could not list {}: {}", dir.display(), err);
        self.report.unlistable += 1;
        self.record(dir, FailureStage::Listing, err);
    }

    fn remove(&mut self, path: PathBuf, is_dir: bool) {
        self.report.attempted += 1;

        let outcome = match remove_entry(&path, is_dir) {
            Ok(()) => {
                tracing::debug!("Removed {}", path.display());
                self.report.removed += 1;
                RemovalOutcome::Removed
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("{} was already gone", path.display());
                self.report.missing += 1;
                RemovalOutcome::Missing
            }
            Err(err) => {
                tracing::warn!("Could not remove {}: {}", path.display(), err);
                self.report.failed += 1;
                let kind = err.kind();
                self.record(&path, FailureStage::Removal, err);
                RemovalOutcome::Failed(kind)
            }
        };

        let deliver = match self.options.notify {
            NotifyPolicy::EveryAttempt => true,
            NotifyPolicy::SuccessOnly => outcome.is_removed(),
        };
        if deliver {
            self.observer
                .entry_deleted(&DeletionEvent::new(path, outcome));
        }
    }

    fn record(&mut self, path: &Path, stage: FailureStage, source: io::Error) {
        if self.options.error_policy == ErrorPolicy::Strict {
            self.failures.push(NodeFailure {
                path: path.to_path_buf(),
                stage,
                source,
            });
        }
    }

    fn finish(self) -> Result<DeletionReport, DeletionError> {
        if self.failures.is_empty() {
            Ok(self.report)
        } else {
            Err(DeletionError {
                failures: self.failures,
                report: self.report,
            })
        }
    }
}

/// `true` for directories, `false` for files, symlinks and missing paths.
fn is_real_directory(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|md| md.is_dir())
        .unwrap_or(false)
}

#[cfg(not(windows))]
fn remove_entry(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        fs::remove_dir(path)
    } else {
        fs::remove_file(path)
    }
}

/// Directory symlinks on Windows are removed with `remove_dir`.
#[cfg(windows)]
fn remove_entry(path: &Path, is_dir: bool) -> io::Result<()> {
    if is_dir {
        return fs::remove_dir(path);
    }
    fs::remove_file(path).or_else(|err| {
        if path.is_dir() {
            fs::remove_dir(path)
        } else {
            Err(err)
        }
    })
}
