use anyhow::Result;

/// Resolves once the process receives SIGTERM or SIGINT (Ctrl+C elsewhere).
pub async fn wait_for_shutdown() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;
        tokio::select! {
            _ = sigterm.recv() => tracing::debug!("shutdown: SIGTERM"),
            _ = sigint.recv()  => tracing::debug!("shutdown: SIGINT"),
        }
        Ok(())
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        Ok(())
    }
}
