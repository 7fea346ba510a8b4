pub mod deleter;
pub mod error;
pub mod listing;

pub use deleter::{
    delete_tree, DeleteOptions, DeletionEvent, DeletionObserver, DeletionReport, ErrorPolicy,
    NoopObserver, NotifyPolicy, RemovalOutcome, TreeDeleter,
};
pub use error::{CoreError, DeletionError, FailureStage, NodeFailure};
pub use listing::{list_directory, EntryKind, FileEntry};
