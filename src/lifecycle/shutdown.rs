//! Shutdown coordination for the relay.

use tokio::sync::broadcast;

/// Coordinator for graceful shutdown.
///
/// The server subscribes once; tests and the signal handler call `trigger`.
pub struct Shutdown {
    tx: broadcast::Sender<()>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve once shutdown is triggered or the coordinator is dropped.
pub async fn triggered(mut rx: broadcast::Receiver<()>) {
    // Lagged cannot happen with a single message; any result means stop.
    let _ = rx.recv().await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_trigger_wakes_subscriber() {
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(1), triggered(rx))
            .await
            .expect("subscriber should wake");
    }

    #[tokio::test]
    async fn test_drop_wakes_subscriber() {
        let shutdown = Shutdown::new();
        let rx = shutdown.subscribe();
        drop(shutdown);
        tokio::time::timeout(Duration::from_secs(1), triggered(rx))
            .await
            .expect("subscriber should wake on drop");
    }
}
