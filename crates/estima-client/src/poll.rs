//! Fixed-interval status polling with cooperative cancellation.

use crate::api::{ApiClient, ApiError, ApiResult};
use crate::types::StatusResponse;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Cancellation handle for a running poll loop. Clone it into a ctrl-c
/// handler or another thread; the loop exits before its next request.
#[derive(Debug, Clone, Default)]
pub struct PollHandle(Arc<AtomicBool>);

impl PollHandle {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why a poll loop returned.
#[derive(Debug)]
pub enum PollOutcome {
    /// The workflow reached COMPLETED or an error status; the final
    /// snapshot is attached.
    Terminal(StatusResponse),
    /// The server returned 404 for the workflow id.
    Gone,
    /// The handle was cancelled.
    Cancelled,
}

/// Polls `/status/:id` until the workflow terminates, the server forgets
/// the id, or the handle is cancelled.
///
/// `on_snapshot` runs for every successful fetch. Returning `false` from
/// it stops the loop the same way cancellation does, which is how a caller
/// breaks out at WAITING_FOR_HUMAN to hand control back to the operator.
/// Transport errors are logged and retried on the next tick.
pub fn poll_until_settled<F>(
    client: &ApiClient,
    workflow_id: &str,
    interval: Duration,
    handle: &PollHandle,
    mut on_snapshot: F,
) -> ApiResult<PollOutcome>
where
    F: FnMut(&StatusResponse) -> bool,
{
    loop {
        if handle.is_cancelled() {
            return Ok(PollOutcome::Cancelled);
        }

        match client.status(workflow_id) {
            Ok(snapshot) => {
                let status = snapshot.workflow_status();
                tracing::debug!(workflow_id, status = %status, "poll tick");

                let keep_going = on_snapshot(&snapshot);

                if status.is_terminal() {
                    return Ok(PollOutcome::Terminal(snapshot));
                }
                if !keep_going {
                    return Ok(PollOutcome::Cancelled);
                }
            }
            Err(ApiError::Gone) => {
                tracing::warn!(workflow_id, "workflow no longer known to server");
                return Ok(PollOutcome::Gone);
            }
            Err(err @ ApiError::Unauthorized) => return Err(err),
            Err(err) => {
                // Transient backend hiccups should not kill a watch that
                // has been running for minutes.
                tracing::warn!(workflow_id, error = %err, "status fetch failed, will retry");
            }
        }

        sleep_cancellable(interval, handle);
    }
}

/// Sleeps in short slices so cancellation takes effect promptly.
fn sleep_cancellable(total: Duration, handle: &PollHandle) {
    const SLICE: Duration = Duration::from_millis(100);
    let mut remaining = total;
    while !remaining.is_zero() && !handle.is_cancelled() {
        let step = remaining.min(SLICE);
        std::thread::sleep(step);
        remaining = remaining.saturating_sub(step);
    }
}
