use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use super::events::UserEvent;
use super::proxy::EventProxy;
use super::state::AppState;
use super::view_model::generate_ui_state;

use crate::core::{DeleteOptions, DeletionEvent, DeletionReport, TreeDeleter};

/// Deletes `targets` on a blocking worker and reports back through `proxy`.
///
/// Every handled entry is forwarded as `UserEvent::EntryDeleted`. When all
/// targets are done the panes are re-listed, a `StateUpdate` is sent and
/// the task ends with `UserEvent::DeletionFinished`. The caller is expected
/// to have set `AppState::is_deleting`; the task clears it.
pub fn start_delete_task<P: EventProxy>(
    targets: Vec<PathBuf>,
    options: DeleteOptions,
    parallel: bool,
    proxy: P,
    state: Arc<Mutex<AppState>>,
) {
    tokio::spawn(async move {
        tracing::info!("Deleting {} selected entries", targets.len());
        let worker_proxy = proxy.clone();
        let outcome = tokio::task::spawn_blocking(move || {
            delete_targets(&targets, options, parallel, &worker_proxy)
        })
        .await;

        let (report, failures) = match outcome {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Deletion task failed: {}", e);
                (DeletionReport::default(), vec![format!("Deletion task failed: {}", e)])
            }
        };

        {
            let mut state_guard = state
                .lock()
                .expect("Mutex was poisoned. This should not happen.");
            state_guard.is_deleting = false;
            let notes = state_guard.refresh_panes();
            let mut status = summarize(&report, failures.len());
            for note in notes {
                status.push(' ');
                status.push_str(&note);
            }
            state_guard.status_message = status;
            proxy.send_event(UserEvent::StateUpdate(Box::new(generate_ui_state(
                &state_guard,
            ))));
        }

        tracing::info!(
            "Deletion finished: {} removed, {} failed",
            report.removed,
            report.failed
        );
        proxy.send_event(UserEvent::DeletionFinished { report, failures });
    });
}

/// Runs the deleter over every target, collecting one combined report and
/// the failures of strict deletions as display strings.
fn delete_targets<P: EventProxy>(
    targets: &[PathBuf],
    options: DeleteOptions,
    parallel: bool,
    proxy: &P,
) -> (DeletionReport, Vec<String>) {
    let deleter = TreeDeleter::new(options);
    let mut forward = |event: &DeletionEvent| proxy.send_event(UserEvent::EntryDeleted(event.clone()));

    let mut total = DeletionReport::default();
    let mut failures = Vec::new();
    for target in targets {
        let result = if parallel {
            deleter.delete_parallel(target, &mut forward)
        } else {
            deleter.delete(target, &mut forward)
        };
        match result {
            Ok(report) => total.merge(&report),
            Err(err) => {
                total.merge(&err.report);
                failures.extend(err.failures.iter().map(|failure| failure.to_string()));
            }
        }
    }
    (total, failures)
}

fn summarize(report: &DeletionReport, failure_count: usize) -> String {
    let mut message = format!(
        "Deleted {} of {} entries.",
        report.removed, report.attempted
    );
    if report.failed > 0 || failure_count > 0 {
        message.push_str(&format!(
            " {} could not be deleted.",
            report.failed.max(failure_count)
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize() {
        let clean = DeletionReport {
            attempted: 4,
            removed: 4,
            ..Default::default()
        };
        assert_eq!(summarize(&clean, 0), "Deleted 4 of 4 entries.");

        let partial = DeletionReport {
            attempted: 4,
            removed: 1,
            failed: 3,
            ..Default::default()
        };
        assert_eq!(
            summarize(&partial, 0),
            "Deleted 1 of 4 entries. 3 could not be deleted."
        );
    }
}
