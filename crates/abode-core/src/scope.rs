//! Cooperative cancellation tied to a store's lifetime.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::{Error, Result};

/// Cancellation scope owned by a store.
///
/// Once cancelled, in-flight calls run through [`Scope::run`] resolve to
/// [`Error::Cancelled`] and their responses are never applied.
#[derive(Debug, Clone)]
pub struct Scope {
    cancelled: Arc<watch::Sender<bool>>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = watch::channel(false);
        Self {
            cancelled: Arc::new(sender),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.send_replace(true);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        *self.cancelled.borrow()
    }

    /// Resolves once the scope is cancelled.
    pub async fn cancelled(&self) {
        let mut receiver = self.cancelled.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel.
        let _ = receiver.wait_for(|cancelled| *cancelled).await;
    }

    /// Drive `future` unless the scope is cancelled first.
    ///
    /// Cancellation is checked again after completion so a response that
    /// races with `cancel` is dropped as well.
    pub async fn run<T, F>(&self, future: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let result = tokio::select! {
            biased;
            () = self.cancelled() => Err(Error::Cancelled),
            result = future => result,
        };

        if self.is_cancelled() {
            return Err(Error::Cancelled);
        }
        result
    }
}
