//! Single-fire exit signal shared by the application shells

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::{FutureExt, Shared};
use tracing::info;

use crate::error::AppError;

struct ExitState {
    sender: RefCell<Option<oneshot::Sender<()>>>,
    receiver: Shared<oneshot::Receiver<()>>,
}

/// Fires once; every waiter completes when it does
#[derive(Clone)]
pub struct ExitSignal {
    inner: Rc<ExitState>,
}

impl ExitSignal {
    pub fn new() -> Self {
        let (sender, receiver) = oneshot::channel();
        Self {
            inner: Rc::new(ExitState {
                sender: RefCell::new(Some(sender)),
                receiver: receiver.shared(),
            }),
        }
    }

    /// Fires the signal
    ///
    /// A second call returns [`AppError::AlreadySignalled`].
    pub fn fire(&self) -> Result<(), AppError> {
        let sender = self
            .inner
            .sender
            .borrow_mut()
            .take()
            .ok_or(AppError::AlreadySignalled)?;
        // The receiver lives in `inner`, so the send cannot fail while we hold it
        let _ = sender.send(());
        info!("exit signalled");
        Ok(())
    }

    pub fn is_fired(&self) -> bool {
        self.inner.sender.borrow().is_none()
    }

    /// Completes once [`ExitSignal::fire`] has been called
    pub fn wait(&self) -> impl Future<Output = ()> + 'static {
        let receiver = self.inner.receiver.clone();
        async move {
            // A dropped sender also means exit
            let _ = receiver.await;
        }
    }
}

impl Default for ExitSignal {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_second_fire_is_rejected() {
        let signal = ExitSignal::new();
        assert!(!signal.is_fired());
        signal.fire().unwrap();
        assert!(signal.is_fired());
        assert!(matches!(signal.fire(), Err(AppError::AlreadySignalled)));
    }

    #[test]
    fn test_every_waiter_completes() {
        let signal = ExitSignal::new();
        let first = signal.wait();
        let second = signal.clone().wait();
        signal.fire().unwrap();
        block_on(first);
        block_on(second);
        block_on(signal.wait());
    }
}
