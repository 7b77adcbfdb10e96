//! Cancellation signal shared by every fetch unit.

use tokio::sync::watch;

/// Sending half; call [`CancelHandle::cancel`] to stop outstanding work.
#[derive(Debug)]
pub struct CancelHandle {
    tx: watch::Sender<bool>,
}

/// Receiving half, cloned into each unit of work.
#[derive(Debug, Clone)]
pub struct CancelToken {
    rx: watch::Receiver<bool>,
}

pub fn cancel_pair() -> (CancelHandle, CancelToken) {
    let (tx, rx) = watch::channel(false);
    (CancelHandle { tx }, CancelToken { rx })
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn token(&self) -> CancelToken {
        CancelToken {
            rx: self.tx.subscribe(),
        }
    }
}

impl CancelToken {
    /// A token that is never cancelled.
    pub fn never() -> Self {
        cancel_pair().1
    }

    pub fn is_cancelled(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves once cancellation is requested.
    ///
    /// A handle dropped without cancelling leaves this pending forever.
    pub async fn cancelled(&mut self) {
        let signalled = self.rx.wait_for(|c| *c).await.is_ok();
        if !signalled {
            std::future::pending::<()>().await;
        }
    }
}
