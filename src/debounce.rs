//! Trailing-edge debouncer.
//!
//! DESIGN
//! ======
//! A worker task waits for a trigger, then keeps restarting a quiet-window
//! sleep for as long as further triggers arrive. When the window elapses
//! without a new trigger the action is spawned as its own task, so a slow
//! action is never cancelled by later triggers and the next window can start
//! right away. The action reads whatever it needs at fire time; triggers
//! carry no payload.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
    worker: JoinHandle<()>,
}

impl Debouncer {
    /// Spawn the debounce worker on the current tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn spawn<F, Fut>(window: Duration, action: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<()>();
        let worker = tokio::spawn(async move {
            while rx.recv().await.is_some() {
                let mut collapsed = 0_usize;
                loop {
                    tokio::select! {
                        maybe = rx.recv() => {
                            if maybe.is_none() {
                                return;
                            }
                            collapsed += 1;
                        }
                        () = tokio::time::sleep(window) => break,
                    }
                }
                debug!(collapsed, ?window, "debounce window elapsed");
                tokio::spawn(action());
            }
        });
        Self { tx, worker }
    }

    /// Schedule the action, restarting the quiet window if one is pending.
    pub fn trigger(&self) {
        // Send only fails once the worker is gone, which means we are shutting down.
        let _ = self.tx.send(());
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
#[path = "debounce_test.rs"]
mod tests;
