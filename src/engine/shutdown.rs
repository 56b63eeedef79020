// src/engine/shutdown.rs

use tracing::warn;

/// Resolves when the user presses Ctrl-C.
///
/// If the signal handler cannot be installed this never resolves, so watch
/// mode keeps running rather than exiting at once.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
