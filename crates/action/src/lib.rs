pub mod action;
pub mod error;
pub mod registry;

pub use action::{Action, DynAction};
pub use error::ActionError;
pub use registry::ActionRegistry;

/// Run a blocking closure on the blocking pool and flatten join errors.
///
/// Packs backed by synchronous libraries (spreadsheets, PDF parsing) use this
/// so that file I/O never stalls the async runtime.
pub async fn run_blocking<F, T>(f: F) -> Result<T, ActionError>
where
    F: FnOnce() -> Result<T, ActionError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ActionError::ExecutionFailed(format!("blocking task failed: {e}")))?
}
