//! Graceful shutdown signal handling

use std::{io, time::Duration};

use salvo::server::ServerHandle;
use tokio::signal;
use tracing::info;

/// How long in-flight checkout requests get to finish before the server is
/// torn down. The store's transactions commit or abort on their own terms
/// either way; the grace period only bounds the HTTP drain.
const GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Wait for a termination signal, then stop the server gracefully.
pub(crate) async fn listen(handle: ServerHandle) -> io::Result<()> {
    let signal = wait_for_signal().await?;

    info!("{signal} received, draining requests");

    handle.stop_graceful(Some(GRACE_PERIOD));

    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> io::Result<&'static str> {
    let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())?;

    tokio::select! {
        result = signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = sigterm.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> io::Result<&'static str> {
    signal::ctrl_c().await.map(|()| "ctrl-c")
}
