//! Graceful shutdown
//!
//! The controller owns the root `CancellationToken`; startup work and the
//! HTTP server each hold a child of it.

use std::future::Future;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Root of the process shutdown tree.
///
/// ```ignore
/// let shutdown = ShutdownController::with_signals();
/// server.serve(shutdown.child_token()).await?;
/// ```
#[derive(Clone, Default)]
pub struct ShutdownController {
    token: CancellationToken,
}

impl ShutdownController {
    /// Controller cancelled on Ctrl+C, or SIGTERM on unix.
    pub fn with_signals() -> Self {
        let controller = Self::default();
        let token = controller.token.clone();

        tokio::spawn(async move {
            let signal = termination_signal().await;
            info!(signal, "Shutting down, draining in-flight requests");
            token.cancel();
        });

        controller
    }

    /// Token cancelled along with the controller.
    pub fn child_token(&self) -> CancellationToken {
        self.token.child_token()
    }
}

async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Ctrl+C handler unavailable");
        std::future::pending::<()>().await;
    }
}

async fn termination_signal() -> &'static str {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => tokio::select! {
                _ = ctrl_c() => "SIGINT",
                _ = sigterm.recv() => "SIGTERM",
            },
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                ctrl_c().await;
                "SIGINT"
            }
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await;
        "Ctrl+C"
    }
}

/// Drive `future` unless shutdown comes first.
///
/// `None` means the token was cancelled before the future finished.
pub async fn run_until_shutdown<F, T>(token: CancellationToken, future: F) -> Option<T>
where
    F: Future<Output = T>,
{
    tokio::select! {
        result = future => Some(result),
        _ = token.cancelled() => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_children_follow_root() {
        let controller = ShutdownController::default();
        let startup = controller.child_token();
        let http = controller.child_token();

        startup.cancel();
        assert!(!http.is_cancelled());

        controller.token.cancel();
        assert!(http.is_cancelled());
    }

    #[tokio::test]
    async fn test_run_until_shutdown() {
        let token = CancellationToken::new();
        assert_eq!(run_until_shutdown(token.clone(), async { 42 }).await, Some(42));

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            canceller.cancel();
        });
        let slow = async {
            tokio::time::sleep(Duration::from_secs(10)).await;
            42
        };
        assert_eq!(run_until_shutdown(token, slow).await, None);
    }
}
