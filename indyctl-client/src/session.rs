//! Lifetime scope for in-flight requests
//!
//! A `Session` stands for one interactive flow (an editing form, a listing
//! view). Requests awaited through [`Session::guard`] resolve to
//! [`ClientError::Cancelled`] once the session is closed, so late responses
//! never reach state that has been torn down. Dropping the session closes it.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::ClientError;

pub struct Session {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

/// Closes a session from another task, e.g. a Ctrl+C handler
#[derive(Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.tx),
        }
    }

    pub fn close(&self) {
        if !self.tx.send_replace(true) {
            tracing::debug!("session closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        *self.rx.borrow()
    }

    /// Await `fut` unless the session closes first.
    ///
    /// A result that completes after the session closed is discarded too.
    pub async fn guard<F: Future>(&self, fut: F) -> Result<F::Output, ClientError> {
        if self.is_closed() {
            return Err(ClientError::Cancelled);
        }

        let mut rx = self.rx.clone();
        tokio::select! {
            biased;
            _ = rx.wait_for(|closed| *closed) => Err(ClientError::Cancelled),
            output = fut => {
                if self.is_closed() {
                    Err(ClientError::Cancelled)
                } else {
                    Ok(output)
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.tx.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn open_session_passes_output_through() {
        let session = Session::new();
        let value = session.guard(async { 42 }).await.unwrap();
        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn closed_session_rejects_immediately() {
        let session = Session::new();
        session.close();
        let result = session.guard(async { 42 }).await;
        assert!(matches!(result, Err(ClientError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_interrupts_pending_request() {
        let session = Session::new();
        let handle = session.cancel_handle();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            handle.cancel();
        });

        let slow = async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            "late"
        };
        let result = session.guard(slow).await;
        assert!(result.unwrap_err().is_cancelled());
        assert!(session.is_closed());
    }
}
