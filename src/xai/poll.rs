//! Bounded polling for asynchronous video jobs
//!
//! Video generation and editing are asynchronous upstream: the initial call
//! returns a job descriptor and the result materializes later. This module
//! polls job status at a fixed interval with a hard attempt ceiling.
//!
//! Termination conditions, in order of checking:
//! - the job reports `completed` or `failed`, or carries a result URL
//!   (implicit completion - the upstream sometimes omits `status` once the
//!   URL exists);
//! - the attempt budget is exhausted (`Timeout`);
//! - the caller's cancellation token fires during a wait (`Cancelled`).
//!
//! Each wait is an independent suspension point; nothing is locked across
//! the sleeps.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{GrokMcpError, Result};
use crate::xai::client::XaiApi;
use crate::xai::types::VideoJob;

/// Default seconds between status polls
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default attempt ceiling (60 polls at 5s = 5 minutes)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 60;

/// Polling parameters for video job completion
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed wait between status polls
    pub interval: Duration,
    /// Hard ceiling on the number of status polls
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Poll a video job until it reaches a terminal state.
///
/// Returns the terminal job descriptor; callers decide how to surface a
/// `failed` status. Exhausting the budget fails with `Timeout`.
pub async fn poll_video_job(
    api: &dyn XaiApi,
    job_id: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
) -> Result<VideoJob> {
    for attempt in 1..=config.max_attempts {
        let job = api.video_status(job_id).await?;

        if job.is_terminal() {
            tracing::debug!(job_id, attempt, status = ?job.status, "video job reached terminal state");
            return Ok(job);
        }

        tracing::trace!(job_id, attempt, status = ?job.status, "video job still pending");

        if attempt < config.max_attempts {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(GrokMcpError::cancelled(format!(
                        "polling for video job {} was cancelled",
                        job_id
                    )));
                }
                _ = tokio::time::sleep(config.interval) => {}
            }
        }
    }

    Err(GrokMcpError::timeout(job_id, config.max_attempts))
}
