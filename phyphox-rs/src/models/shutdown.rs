use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::Notify;

const SHUTDOWN_PERIOD_MS: u64 = 100;
const MAX_RETRIES: u64 = 10;

pub(crate) struct ShutdownSignal {
    notify: Arc<Notify>,
}

impl ShutdownSignal {
    fn new(notify: Arc<Notify>) -> Self {
        Self { notify }
    }

    /// Waits for Ctrl+C, or for `run_for_millis` if given
    async fn wait_for_trigger(&self, run_for_millis: Option<u64>) {
        match run_for_millis {
            Some(time_to_live_millis) => {
                tokio::time::sleep(Duration::from_millis(time_to_live_millis)).await;
            }
            None => loop {
                match signal::ctrl_c().await {
                    Ok(()) => {
                        info!("Ctrl+C received. Sending stop signal...");
                        break;
                    }
                    Err(e) => {
                        error!("Error while waiting for Ctrl+C: {}", e);
                        tokio::time::sleep(Duration::from_millis(SHUTDOWN_PERIOD_MS)).await;
                    }
                }
            },
        }
    }

    async fn listen_for_shutdown(&self, run_for_millis: Option<u64>) {
        self.wait_for_trigger(run_for_millis).await;
        // The acquisition loop only waits on the signal between polls, so repeat it
        for _ in 0..MAX_RETRIES {
            self.notify.notify_waiters();
            tokio::time::sleep(Duration::from_millis(SHUTDOWN_PERIOD_MS)).await;
        }
    }
}

/// Spawns a task that notifies `notify` on Ctrl+C, or once `run_for_millis` elapsed.
pub fn listen_for_shutdown(
    notify: Arc<Notify>,
    run_for_millis: Option<u64>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let shutdown_signal = ShutdownSignal::new(notify);
        shutdown_signal.listen_for_shutdown(run_for_millis).await;
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_shutdown_signal_with_timeout() {
        let notify = Arc::new(Notify::new());
        let handle = listen_for_shutdown(notify.clone(), Some(200));

        let result = timeout(Duration::from_millis(300), notify.notified()).await;
        assert!(result.is_ok(), "Shutdown signal was not received in time");

        handle.abort();
    }

    #[tokio::test]
    async fn test_shutdown_signal_is_repeated() {
        let notify = Arc::new(Notify::new());
        let handle = listen_for_shutdown(notify.clone(), Some(50));

        // a waiter arriving after the first notification is still released
        tokio::time::sleep(Duration::from_millis(120)).await;
        let result = timeout(Duration::from_millis(200), notify.notified()).await;
        assert!(result.is_ok());

        handle.abort();
    }
}
