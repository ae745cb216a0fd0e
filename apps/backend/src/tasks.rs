//! Supervised background tasks.
//!
//! Intro timers and stream poll loops run detached from any request. A bare
//! `tokio::spawn` would swallow their failures; every background task goes
//! through [`spawn_supervised`] so errors and panics land in the log with the
//! task's name attached.

use std::future::Future;

use tokio::task::JoinHandle;
use tracing::error;

use crate::error::AppError;

/// Spawn `fut` and watch it to completion. The returned handle resolves once
/// the task has finished and its outcome has been logged.
pub fn spawn_supervised<F>(task: &'static str, fut: F) -> JoinHandle<()>
where
    F: Future<Output = Result<(), AppError>> + Send + 'static,
{
    let inner = tokio::spawn(fut);
    tokio::spawn(async move {
        match inner.await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => error!(task, error = %err, "background task failed"),
            Err(join_err) => {
                if join_err.is_panic() {
                    error!(task, "background task panicked");
                }
                // Cancellation is an orderly shutdown, not a failure.
            }
        }
    })
}
