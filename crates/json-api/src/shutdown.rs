//! Graceful shutdown on SIGINT or SIGTERM.

use std::io;

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
#[error("failed to install {signal} handler: {source}")]
pub(crate) struct ShutdownSignalError {
    signal: &'static str,
    #[source]
    source: io::Error,
}

#[cfg(unix)]
async fn terminate() -> Result<(), ShutdownSignalError> {
    signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(|source| ShutdownSignalError {
            signal: "SIGTERM",
            source,
        })?
        .recv()
        .await;

    Ok(())
}

#[cfg(not(unix))]
async fn terminate() -> Result<(), ShutdownSignalError> {
    std::future::pending().await
}

/// Wait for a stop signal, then let in-flight requests finish before the server exits.
pub(crate) async fn listen(handle: ServerHandle) -> Result<(), ShutdownSignalError> {
    let received = tokio::select! {
        result = signal::ctrl_c() => {
            result.map_err(|source| ShutdownSignalError { signal: "SIGINT", source })?;
            "SIGINT"
        }
        result = terminate() => {
            result?;
            "SIGTERM"
        }
    };

    info!(signal = received, "draining in-flight requests");

    handle.stop_graceful(None);

    Ok(())
}
