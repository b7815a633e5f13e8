//! Per-request time budget with optional external cancellation.

use crate::error::{PipelineError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

// Stand-in for "never" when a timeout does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Absolute expiry shared by every stage of one request.
///
/// Cloning is cheap; clones observe the same cancellation signal.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Instant,
    cancel_rx: Option<watch::Receiver<bool>>,
}

/// Handle that cancels every [`Deadline`] derived from the same
/// [`Deadline::cancellable`] call.
#[derive(Debug)]
pub struct Canceller {
    tx: watch::Sender<bool>,
}

impl Canceller {
    pub fn cancel(&self) {
        let _ = self.tx.send(true);
    }
}

impl Deadline {
    pub fn after(timeout: Duration) -> Self {
        Self::at(expiry_after(timeout))
    }

    pub fn at(expires_at: Instant) -> Self {
        Self {
            expires_at,
            cancel_rx: None,
        }
    }

    pub fn cancellable(timeout: Duration) -> (Self, Canceller) {
        let (tx, rx) = watch::channel(false);
        let deadline = Self {
            expires_at: expiry_after(timeout),
            cancel_rx: Some(rx),
        };
        (deadline, Canceller { tx })
    }

    /// Attaches an external cancellation signal; `true` cancels.
    pub fn with_cancellation(mut self, cancel_rx: watch::Receiver<bool>) -> Self {
        self.cancel_rx = Some(cancel_rx);
        self
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Derives a tighter deadline that never outlives `self`.
    pub fn sub(&self, timeout: Duration) -> Self {
        Self {
            expires_at: self.expires_at.min(expiry_after(timeout)),
            cancel_rx: self.cancel_rx.clone(),
        }
    }

    /// Fails if the request was cancelled or the budget is spent.
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        if Instant::now() >= self.expires_at {
            return Err(PipelineError::Timeout);
        }
        Ok(())
    }

    /// Drives `fut` until it completes, the deadline passes, or the request
    /// is cancelled. On the latter two the future is dropped, which aborts any
    /// in-flight HTTP call it owns.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = T>,
    {
        self.check()?;

        let mut cancel_rx = self.cancel_rx.clone();
        tokio::select! {
            biased;

            _ = wait_cancelled(cancel_rx.as_mut()) => Err(PipelineError::Cancelled),
            _ = tokio::time::sleep_until(self.expires_at) => Err(PipelineError::Timeout),
            output = fut => Ok(output),
        }
    }
}

fn expiry_after(timeout: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(timeout.min(FAR_FUTURE)).unwrap_or(now)
}

async fn wait_cancelled(rx: Option<&mut watch::Receiver<bool>>) {
    let Some(rx) = rx else {
        return std::future::pending().await;
    };
    // A dropped Canceller is not a cancellation.
    let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
    if closed {
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_passes_before_expiry() {
        let deadline = Deadline::after(Duration::from_secs(5));
        assert!(deadline.check().is_ok());
        assert!(deadline.remaining() > Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_expired_deadline_times_out() {
        let deadline = Deadline::at(Instant::now());
        assert!(matches!(deadline.check(), Err(PipelineError::Timeout)));
        assert_eq!(deadline.remaining(), Duration::ZERO);

        let result = deadline.run(async { 1 }).await;
        assert!(matches!(result, Err(PipelineError::Timeout)));
    }

    #[tokio::test]
    async fn test_run_returns_output() {
        let deadline = Deadline::after(Duration::from_secs(5));
        assert_eq!(deadline.run(async { 42 }).await.unwrap(), 42);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_times_out_slow_future() {
        let deadline = Deadline::after(Duration::from_millis(50));
        let result = deadline
            .run(tokio::time::sleep(Duration::from_secs(10)))
            .await;
        assert!(matches!(result, Err(PipelineError::Timeout)));
    }

    #[tokio::test]
    async fn test_sub_never_extends_parent() {
        let parent = Deadline::after(Duration::from_millis(100));
        let child = parent.sub(Duration::from_secs(60));
        assert_eq!(child.expires_at(), parent.expires_at());

        let tighter = parent.sub(Duration::from_millis(10));
        assert!(tighter.expires_at() < parent.expires_at());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_interrupts_run() {
        let (deadline, canceller) = Deadline::cancellable(Duration::from_secs(60));
        let child = deadline.sub(Duration::from_secs(30));

        let handle = tokio::spawn(async move {
            child
                .run(tokio::time::sleep(Duration::from_secs(10)))
                .await
        });
        tokio::time::sleep(Duration::from_millis(5)).await;
        canceller.cancel();

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(PipelineError::Cancelled)));
        assert!(matches!(deadline.check(), Err(PipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_cancelled_takes_precedence_over_timeout() {
        let (deadline, canceller) = Deadline::cancellable(Duration::ZERO);
        canceller.cancel();
        assert!(matches!(deadline.check(), Err(PipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_external_cancellation_signal() {
        let (tx, rx) = watch::channel(false);
        let deadline = Deadline::after(Duration::from_secs(5)).with_cancellation(rx);
        assert!(deadline.check().is_ok());
        tx.send(true).unwrap();
        assert!(matches!(deadline.check(), Err(PipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_oversized_timeouts_saturate() {
        let deadline = Deadline::after(Duration::MAX);
        assert!(deadline.check().is_ok());
        assert!(deadline.remaining() > Duration::from_secs(86_400 * 365));
        assert_eq!(deadline.run(async { 7 }).await.unwrap(), 7);

        let child = deadline.sub(Duration::MAX);
        assert_eq!(child.expires_at(), deadline.expires_at());

        let (cancellable, canceller) = Deadline::cancellable(Duration::from_secs(u64::MAX));
        assert!(cancellable.check().is_ok());
        canceller.cancel();
        assert!(matches!(cancellable.check(), Err(PipelineError::Cancelled)));
    }

    #[tokio::test]
    async fn test_dropped_canceller_is_not_cancellation() {
        let (deadline, canceller) = Deadline::cancellable(Duration::from_secs(5));
        drop(canceller);
        assert!(!deadline.is_cancelled());
        assert_eq!(deadline.run(async { "done" }).await.unwrap(), "done");
    }
}
