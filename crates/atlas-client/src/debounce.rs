//! # Debouncer
//!
//! Emits a value only after input has been quiet for a fixed interval.
//!
//! ## Timing
//! ```text
//!   push("c")   push("ca")   push("can")
//!      │            │            │
//!      ▼            ▼            ▼
//!   ───●────────────●────────────●──────────────────────●──────►
//!      └─ timer ─X  └─ timer ─X  └──────── 500 ms ──────┘
//!                                                  on_settle("can")
//! ```
//!
//! Each push cancels the pending timer and starts a new one. Dropping the
//! [`Debouncer`] discards a value that has not settled yet.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    task: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Spawns the timer task. Must be called inside a tokio runtime.
    pub fn spawn<F, Fut>(delay: Duration, mut on_settle: F) -> Self
    where
        F: FnMut(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();

        let task = tokio::spawn(async move {
            let mut pending: Option<T> = None;
            loop {
                match pending.take() {
                    None => match rx.recv().await {
                        Some(value) => pending = Some(value),
                        None => break,
                    },
                    Some(value) => {
                        tokio::select! {
                            next = rx.recv() => match next {
                                Some(newer) => {
                                    trace!("Debounce timer restarted");
                                    pending = Some(newer);
                                }
                                None => break,
                            },
                            _ = tokio::time::sleep(delay) => on_settle(value).await,
                        }
                    }
                }
            }
        });

        Self { tx, task }
    }

    /// Feeds a new value, restarting the quiet period.
    ///
    /// ## Returns
    /// `false` if the timer task is no longer running.
    pub fn push(&self, value: T) -> bool {
        self.tx.send(value).is_ok()
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    fn recorder(
        delay: Duration,
    ) -> (
        Debouncer<&'static str>,
        mpsc::UnboundedReceiver<(&'static str, Instant)>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let debouncer = Debouncer::spawn(delay, move |value| {
            let tx = tx.clone();
            async move {
                let _ = tx.send((value, Instant::now()));
            }
        });
        (debouncer, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_settles() {
        let (debouncer, mut rx) = recorder(Duration::from_millis(500));
        let start = Instant::now();

        debouncer.push("c");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("ca");
        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.push("can");

        let (value, at) = rx.recv().await.unwrap();
        assert_eq!(value, "can");
        assert_eq!(at - start, Duration::from_millis(700));

        drop(debouncer);
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_bursts_settle_separately() {
        let (debouncer, mut rx) = recorder(Duration::from_millis(500));

        debouncer.push("a");
        tokio::time::sleep(Duration::from_millis(600)).await;
        debouncer.push("b");

        assert_eq!(rx.recv().await.unwrap().0, "a");
        assert_eq!(rx.recv().await.unwrap().0, "b");
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_unsettled_value() {
        let (debouncer, mut rx) = recorder(Duration::from_millis(500));
        debouncer.push("x");
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(debouncer.is_running());

        drop(debouncer);
        assert!(rx.recv().await.is_none());
    }
}
