use std::io;

use tokio::signal;
use tokio::sync::watch;

/// Process termination signals, turned into the scheduler's shutdown flag.
#[derive(Debug)]
pub(crate) struct Signals {
    #[cfg(unix)]
    terminate: signal::unix::Signal,
}

impl Signals {
    /// Registers the handlers up front so a failure surfaces at startup.
    pub(crate) fn new() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal::unix::signal(signal::unix::SignalKind::terminate())?,
        })
    }

    pub(crate) async fn forward(self, shutdown: watch::Sender<bool>) {
        let signal = self.recv().await;
        tracing::info!(signal, "Shutdown requested");
        shutdown.send_replace(true);
        // Keep the channel open until the scheduler has seen the flag
        shutdown.closed().await;
    }

    #[cfg(unix)]
    async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = signal::ctrl_c() => "SIGINT",
            _ = self.terminate.recv() => "SIGTERM",
        }
    }

    #[cfg(not(unix))]
    async fn recv(self) -> &'static str {
        let _ = signal::ctrl_c().await;
        "ctrl-c"
    }
}
