//! OS signal handling.
//!
//! # Responsibilities
//! - Translate Ctrl+C / SIGTERM into the internal shutdown signal
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - No SIGHUP reload; the fixture's config is immutable for its lifetime

use crate::lifecycle::Shutdown;

/// Wait for a termination signal from the OS.
pub async fn wait_for_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    }

    tracing::info!("Shutdown signal received");
}

/// Spawn a task that triggers the shutdown coordinator when a termination
/// signal arrives. The coordinator is consumed; subscribe before calling.
pub fn trigger_on_signal(shutdown: Shutdown) {
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });
}
