// src/engine/shutdown.rs

//! Run-until-cancelled support for the polling loops.

use std::time::Duration;

use tokio::sync::watch;

/// Sending half: call [`ShutdownHandle::shutdown`] to stop every loop holding
/// a matching [`ShutdownSignal`].
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

/// Receiving half, checked by the loops once per iteration.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

pub fn shutdown_channel() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownSignal { rx })
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        // No receivers left means nothing is running; that is fine.
        let _ = self.tx.send(true);
    }

    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }
}

impl ShutdownSignal {
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for `period`, returning early with `true` if shutdown is
    /// requested. Returns `false` when the full period elapsed.
    pub async fn sleep_or_shutdown(&mut self, period: Duration) -> bool {
        let sleep = tokio::time::sleep(period);
        tokio::pin!(sleep);

        let requested = tokio::select! {
            _ = &mut sleep => return false,
            res = self.rx.wait_for(|stop| *stop) => res.is_ok(),
        };

        if !requested {
            // Handle dropped without shutting down: nobody can cancel any
            // more, so just finish the wait.
            sleep.await;
        }
        requested
    }
}
