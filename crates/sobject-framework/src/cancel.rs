//! # Cancellation
//!
//! Every remote call made by the reconciler can be abandoned by the host.
//! A [`Cancellation`] wraps a `watch` receiver; the matching
//! [`CancelHandle`] flips it. When the signal fires before a remote call
//! completes, the call is dropped and the reconciler returns
//! [`ReconcileError::Cancelled`] without touching local state.
//!
//! ```rust
//! use sobject_framework::{Cancellation, ReconcileError};
//!
//! #[tokio::main]
//! async fn main() {
//!     let (handle, cancel) = Cancellation::new();
//!     handle.cancel();
//!     let result = cancel.guard(std::future::pending::<()>()).await;
//!     assert_eq!(result, Err(ReconcileError::Cancelled));
//! }
//! ```

use crate::error::ReconcileError;
use std::future::Future;
use tokio::sync::watch;

/// Fires the paired [`Cancellation`].
#[derive(Debug)]
pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        let _ = self.sender.send(true);
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cancellation {
    receiver: Option<watch::Receiver<bool>>,
}

impl Cancellation {
    pub fn new() -> (CancelHandle, Cancellation) {
        let (sender, receiver) = watch::channel(false);
        (
            CancelHandle { sender },
            Cancellation {
                receiver: Some(receiver),
            },
        )
    }

    /// A signal that never fires.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        self.receiver.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Completes once the signal fires. Never completes for [`Cancellation::none`]
    /// or when the handle is dropped without cancelling.
    pub async fn cancelled(&self) {
        let Some(mut rx) = self.receiver.clone() else {
            return std::future::pending().await;
        };
        let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }

    /// Runs `call` unless the signal fires first. A call that has already
    /// completed when the signal is seen keeps its result.
    pub async fn guard<F, T>(&self, call: F) -> Result<T, ReconcileError>
    where
        F: Future<Output = T>,
    {
        if self.is_cancelled() {
            return Err(ReconcileError::Cancelled);
        }
        tokio::select! {
            biased;
            out = call => Ok(out),
            _ = self.cancelled() => Err(ReconcileError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::task::Poll;
    use std::time::Duration;

    #[tokio::test]
    async fn test_none_never_cancels() {
        let cancel = Cancellation::none();
        assert!(!cancel.is_cancelled());
        assert_eq!(cancel.guard(async { 7 }).await, Ok(7));
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_call() {
        let (handle, cancel) = Cancellation::new();
        let task = tokio::spawn(async move { cancel.guard(std::future::pending::<()>()).await });
        tokio::time::sleep(Duration::from_millis(10)).await;
        handle.cancel();
        assert_eq!(task.await.unwrap(), Err(ReconcileError::Cancelled));
    }

    #[tokio::test]
    async fn test_already_cancelled_skips_call() {
        let (handle, cancel) = Cancellation::new();
        handle.cancel();
        assert!(cancel.is_cancelled());
        let ran = std::sync::atomic::AtomicBool::new(false);
        let result = cancel
            .guard(async { ran.store(true, std::sync::atomic::Ordering::SeqCst) })
            .await;
        assert_eq!(result, Err(ReconcileError::Cancelled));
        assert!(!ran.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_completed_call_wins_over_late_signal() {
        let (handle, cancel) = Cancellation::new();
        let (tx, rx) = tokio::sync::oneshot::channel();
        let guarded = cancel.guard(rx);
        tokio::pin!(guarded);

        std::future::poll_fn(|cx| {
            assert!(guarded.as_mut().poll(cx).is_pending());
            Poll::Ready(())
        })
        .await;

        // The reply and the signal are both ready on the next poll
        tx.send("inserted").unwrap();
        handle.cancel();
        assert_eq!(guarded.await, Ok(Ok("inserted")));
    }

    #[tokio::test]
    async fn test_dropped_handle_does_not_cancel() {
        let (handle, cancel) = Cancellation::new();
        drop(handle);
        assert_eq!(cancel.guard(async { "done" }).await, Ok("done"));
    }
}
