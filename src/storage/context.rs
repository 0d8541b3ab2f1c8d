//! Execution context for storage calls.
//!
//! A [`Context`] carries an optional deadline and an optional cancellation
//! signal. Backends run each statement through [`Context::run`], which drops
//! the in-flight future (aborting its I/O) as soon as the context is done and
//! reports [`StorageError::Cancelled`].

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error_handling::types::StorageError;

#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

/// Cancels every [`Context`] derived from it.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Context {
    /// A context that is never done.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            cancel: None,
        }
    }

    /// Derive a cancellable copy of this context, keeping its deadline.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            deadline: self.deadline,
            cancel: Some(rx),
        };
        (ctx, CancelHandle { tx })
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn is_done(&self) -> bool {
        let expired = self.deadline.is_some_and(|d| d <= Instant::now());
        let cancelled = self.cancel.as_ref().is_some_and(|rx| *rx.borrow());
        expired || cancelled
    }

    /// Resolves once the deadline passes or cancellation is requested.
    pub async fn done(&self) {
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };
        let cancelled = async {
            match &self.cancel {
                Some(rx) => {
                    let mut rx = rx.clone();
                    // sender dropped without cancelling: never done
                    let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
                    if closed {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };
        tokio::select! {
            _ = expired => {}
            _ = cancelled => {}
        }
    }

    /// Drive `fut` to completion unless the context finishes first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, StorageError>
    where
        F: Future<Output = Result<T, StorageError>>,
    {
        if self.is_done() {
            return Err(StorageError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.done() => Err(StorageError::Cancelled),
            res = fut => res,
        }
    }
}
