//! Deadline and cancellation bounds for collaborator calls.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::error::Interrupted;

/// Bounds applied to every collaborator call made while handling one command.
///
/// The transport supplies a context per inbound update. A call that hits the
/// deadline or observes cancellation fails with [`Interrupted`], which callers
/// classify like any other failure of that collaborator.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    deadline: Option<Instant>,
    cancel: Option<watch::Receiver<bool>>,
}

impl CallContext {
    /// A context with no deadline and no cancellation signal.
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// A timeout too large to represent leaves the context without a deadline.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Cancel in-flight and future calls once `true` is published on the channel.
    pub fn with_cancellation(mut self, cancel: watch::Receiver<bool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Run `fut` bounded by `per_call`, the context deadline and cancellation.
    pub(crate) async fn run<T, E, F>(&self, per_call: Option<Duration>, fut: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: From<Interrupted>,
    {
        if self.is_cancelled() {
            return Err(Interrupted::Cancelled.into());
        }

        let started = Instant::now();
        let deadline = match (per_call.and_then(|d| started.checked_add(d)), self.deadline) {
            (Some(call), Some(ctx)) => Some(call.min(ctx)),
            (call, ctx) => call.or(ctx),
        };

        let bounded = async {
            match deadline {
                Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                    Ok(result) => result,
                    Err(_) => Err(Interrupted::DeadlineExceeded(
                        deadline.saturating_duration_since(started),
                    )
                    .into()),
                },
                None => fut.await,
            }
        };

        let Some(mut cancel) = self.cancel.clone() else {
            return bounded.await;
        };

        tokio::select! {
            result = bounded => result,
            () = cancelled(&mut cancel) => Err(Interrupted::Cancelled.into()),
        }
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    let closed = rx.wait_for(|cancelled| *cancelled).await.is_err();
    if closed {
        // Sender dropped without cancelling
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Failed(Interrupted);

    impl From<Interrupted> for Failed {
        fn from(err: Interrupted) -> Self {
            Self(err)
        }
    }

    async fn slow() -> Result<u32, Failed> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(1)
    }

    #[tokio::test(start_paused = true)]
    async fn test_per_call_timeout() {
        let ctx = CallContext::unbounded();
        let result = ctx.run(Some(Duration::from_secs(5)), slow()).await;
        assert_eq!(
            result,
            Err(Failed(Interrupted::DeadlineExceeded(Duration::from_secs(5))))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_context_deadline_wins_when_earlier() {
        let ctx = CallContext::unbounded().with_timeout(Duration::from_secs(2));
        let result = ctx.run(Some(Duration::from_secs(5)), slow()).await;
        assert_eq!(
            result,
            Err(Failed(Interrupted::DeadlineExceeded(Duration::from_secs(2))))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_mid_call() {
        let (tx, rx) = watch::channel(false);
        let ctx = CallContext::unbounded().with_cancellation(rx);

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            let _ = tx.send(true);
        });

        let result = ctx.run(None, slow()).await;
        assert_eq!(result, Err(Failed(Interrupted::Cancelled)));
        assert!(ctx.is_cancelled());
    }

    #[tokio::test]
    async fn test_huge_timeouts_mean_no_deadline() {
        let ctx = CallContext::unbounded().with_timeout(Duration::MAX);
        let result: Result<u32, Failed> = ctx.run(Some(Duration::MAX), async { Ok(3) }).await;
        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_dropped_sender_never_cancels() {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        let ctx = CallContext::unbounded().with_cancellation(rx);

        let result: Result<u32, Failed> = ctx.run(None, async { Ok(7) }).await;
        assert_eq!(result, Ok(7));
    }
}
