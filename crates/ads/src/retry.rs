//! Delayed, cancellable task scheduling.
//!
//! Every retry, refill, background prepare and settle delay runs under a
//! child of one root `CancellationToken`, so shutting the controller down
//! stops all of them.

use adpace_domain::AdConfig;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Why a prepare is being scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryReason {
    /// Refill after a show completed.
    Refill,
    /// Refill after the network reported a dismissal.
    Dismissed,
    /// Backoff after a load or show failure.
    Failure,
}

impl RetryReason {
    pub fn delay(&self, config: &AdConfig) -> Duration {
        match self {
            RetryReason::Refill | RetryReason::Dismissed => config.refill_delay(),
            RetryReason::Failure => config.failure_backoff(),
        }
    }

    /// Whether this attempt counts against the retry cap.
    pub fn counts_as_failure(&self) -> bool {
        matches!(self, RetryReason::Failure)
    }

    pub fn label(&self) -> &'static str {
        match self {
            RetryReason::Refill => "refill",
            RetryReason::Dismissed => "dismissed",
            RetryReason::Failure => "failure",
        }
    }
}

impl std::fmt::Display for RetryReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Handle to a scheduled task.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    token: CancellationToken,
}

impl ScheduledTask {
    /// Cancel the task if it has not completed yet.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

/// Decrements the pending counter when a task finishes or is cancelled.
struct PendingGuard(Arc<AtomicUsize>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Spawns delayed tasks tied to one cancellation root.
pub struct RetryScheduler {
    root: CancellationToken,
    pending: Arc<AtomicUsize>,
}

impl Default for RetryScheduler {
    fn default() -> Self {
        Self {
            root: CancellationToken::new(),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl RetryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `task` after `delay` unless cancelled first.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&self, delay: Duration, task: F) -> ScheduledTask
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.root.child_token();
        let handle = ScheduledTask {
            token: token.clone(),
        };

        if self.root.is_cancelled() {
            tracing::debug!("scheduler shut down, dropping task");
            return handle;
        }

        self.pending.fetch_add(1, Ordering::AcqRel);
        let guard = PendingGuard(Arc::clone(&self.pending));

        tokio::spawn(async move {
            let _guard = guard;
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    tracing::debug!("scheduled task cancelled");
                }
                _ = async {
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    task.await;
                } => {}
            }
        });

        handle
    }

    /// Run `task` in the background right away, still cancellable.
    pub fn spawn<F>(&self, task: F) -> ScheduledTask
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.schedule(Duration::ZERO, task)
    }

    /// Sleep for `delay`. Returns `false` if the scheduler shut down first.
    pub async fn sleep(&self, delay: Duration) -> bool {
        tokio::select! {
            biased;
            _ = self.root.cancelled() => false,
            _ = tokio::time::sleep(delay) => true,
        }
    }

    /// Token cancelled on shutdown, for long-lived listeners.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.root.child_token()
    }

    /// Number of scheduled tasks that have not finished yet.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    /// Cancel every pending task and refuse new ones.
    pub fn shutdown(&self) {
        self.root.cancel();
    }

    pub fn is_shut_down(&self) -> bool {
        self.root.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;

    #[test]
    fn test_retry_delays() {
        let config = AdConfig::default();
        assert_eq!(RetryReason::Refill.delay(&config), Duration::from_millis(1000));
        assert_eq!(
            RetryReason::Dismissed.delay(&config),
            Duration::from_millis(1000)
        );
        assert_eq!(
            RetryReason::Failure.delay(&config),
            Duration::from_millis(2000)
        );
        assert!(RetryReason::Failure.counts_as_failure());
        assert!(!RetryReason::Refill.counts_as_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn test_task_runs_after_delay() {
        let scheduler = RetryScheduler::new();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = Arc::clone(&ran);

        scheduler.schedule(Duration::from_millis(2000), async move {
            ran_clone.store(true, Ordering::SeqCst);
        });
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(!ran.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_handle_stops_task() {
        let scheduler = RetryScheduler::new();
        let ran = Arc::new(AtomicBool::new(false));
        let ran_clone = Arc::clone(&ran);

        let handle = scheduler.schedule(Duration::from_millis(1000), async move {
            ran_clone.store(true, Ordering::SeqCst);
        });
        handle.cancel();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_everything() {
        let scheduler = RetryScheduler::new();
        let ran = Arc::new(AtomicBool::new(false));

        for _ in 0..3 {
            let ran_clone = Arc::clone(&ran);
            scheduler.schedule(Duration::from_millis(1000), async move {
                ran_clone.store(true, Ordering::SeqCst);
            });
        }
        scheduler.shutdown();

        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert!(!ran.load(Ordering::SeqCst));
        assert_eq!(scheduler.pending(), 0);

        let late = scheduler.schedule(Duration::ZERO, async {});
        assert!(late.is_cancelled());
        assert!(!scheduler.sleep(Duration::from_millis(10)).await);
    }
}
