//! OS signal handling.

/// Resolve on Ctrl+C (SIGINT).
///
/// If the handler cannot be installed the error is logged and this never
/// resolves, leaving shutdown to other triggers.
pub async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
