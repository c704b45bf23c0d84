//! Cancellation signal shared by the dispatcher and its branches.

use tokio::sync::broadcast;

/// Coordinator for branch cancellation.
///
/// Provides a broadcast channel every branch subscribes to at launch.
/// Triggering the signal, or dropping it, cancels every subscriber.
/// Subscribers created after a trigger do not observe it.
pub struct CancelSignal {
    tx: broadcast::Sender<()>,
}

impl CancelSignal {
    /// Create a new cancellation coordinator.
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self { tx }
    }

    /// Subscribe to the cancellation signal.
    pub fn subscribe(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
            cancelled: false,
        }
    }

    /// Trigger the cancellation signal.
    pub fn trigger(&self) {
        let _ = self.tx.send(());
    }

    /// Number of live subscribers (branches still holding a token).
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// A branch's view of the cancellation signal.
#[derive(Debug)]
pub struct CancelToken {
    rx: broadcast::Receiver<()>,
    cancelled: bool,
}

impl CancelToken {
    /// Resolves once the signal fires or its sender is dropped.
    ///
    /// Cancel safe; usable as a `tokio::select!` branch.
    pub async fn cancelled(&mut self) {
        if self.cancelled {
            return;
        }
        // Ok, Lagged and Closed all mean the dispatcher is done with us.
        let _ = self.rx.recv().await;
        self.cancelled = true;
    }

    /// Non-blocking check.
    pub fn is_cancelled(&mut self) -> bool {
        if !self.cancelled {
            self.cancelled = !matches!(
                self.rx.try_recv(),
                Err(broadcast::error::TryRecvError::Empty)
            );
        }
        self.cancelled
    }
}
