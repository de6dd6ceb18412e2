use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::generation::domain::video_generator::{
    GenerationError, JobId, JobStatus, VideoGenerator,
};
use crate::shared::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_MAX_ATTEMPTS};

/// Granularity of the cancellation check while waiting between polls.
const CANCEL_CHECK_SLICE: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
        }
    }
}

#[derive(Error, Debug)]
pub enum PollError {
    #[error("polling cancelled")]
    Cancelled,
    #[error("job did not finish within {attempts} polls")]
    TimedOut { attempts: usize },
    #[error("generation job failed: {reason}")]
    JobFailed { reason: String },
    #[error(transparent)]
    Generator(#[from] GenerationError),
}

/// Polls a generation job to completion with a fixed interval and a
/// bounded number of attempts.
///
/// The wait between polls is sliced so a flipped `cancel` flag is
/// honored within ~100 ms rather than after a full interval. A status
/// request is never retried on its own; failures propagate immediately
/// (the fixed-interval poll is the only retry the boundary performs).
pub fn poll_until_done(
    generator: &mut dyn VideoGenerator,
    job_id: &JobId,
    config: &PollConfig,
    cancel: &AtomicBool,
) -> Result<String, PollError> {
    for _ in 0..config.max_attempts {
        sleep_unless_cancelled(config.interval, cancel)?;

        match generator.status(job_id)? {
            JobStatus::Succeeded { video_url } => return Ok(video_url),
            JobStatus::Failed { reason } => return Err(PollError::JobFailed { reason }),
            JobStatus::Pending | JobStatus::Running => {}
        }
    }
    Err(PollError::TimedOut {
        attempts: config.max_attempts,
    })
}

fn sleep_unless_cancelled(interval: Duration, cancel: &AtomicBool) -> Result<(), PollError> {
    let mut remaining = interval;
    loop {
        if cancel.load(Ordering::Relaxed) {
            return Err(PollError::Cancelled);
        }
        if remaining.is_zero() {
            return Ok(());
        }
        let slice = remaining.min(CANCEL_CHECK_SLICE);
        std::thread::sleep(slice);
        remaining -= slice;
    }
}

/// Handle to a poll running on its own thread.
///
/// Dropping the handle does not stop the poll; flip [`cancel`] for that.
pub struct PollHandle {
    receiver: crossbeam_channel::Receiver<Result<String, PollError>>,
    cancel: Arc<AtomicBool>,
}

impl PollHandle {
    /// Blocks until the poll finishes (or was cancelled).
    pub fn wait(&self) -> Result<String, PollError> {
        self.receiver
            .recv()
            .unwrap_or(Err(PollError::Cancelled))
    }

    /// Shared flag that aborts the poll when set.
    pub fn cancel_flag(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

/// Runs [`poll_until_done`] on a dedicated thread, surfacing the job as
/// a cancellable asynchronous operation.
pub fn spawn_poll(
    mut generator: Box<dyn VideoGenerator>,
    job_id: JobId,
    config: PollConfig,
) -> PollHandle {
    let (tx, rx) = crossbeam_channel::bounded(1);
    let cancel = Arc::new(AtomicBool::new(false));
    let thread_cancel = cancel.clone();

    std::thread::spawn(move || {
        let result = poll_until_done(generator.as_mut(), &job_id, &config, &thread_cancel);
        if let Err(ref e) = result {
            log::warn!("generation poll ended with error: {e}");
        }
        // Receiver may be gone if the caller stopped caring.
        let _ = tx.send(result);
    });

    PollHandle { receiver: rx, cancel }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::domain::image_payload::ImagePayload;
    use std::collections::VecDeque;

    struct StubGenerator {
        statuses: VecDeque<Result<JobStatus, GenerationError>>,
        polls: usize,
    }

    impl StubGenerator {
        fn new(statuses: Vec<Result<JobStatus, GenerationError>>) -> Self {
            Self {
                statuses: statuses.into(),
                polls: 0,
            }
        }
    }

    impl VideoGenerator for StubGenerator {
        fn submit(&mut self, _payload: &ImagePayload) -> Result<JobId, GenerationError> {
            Ok(JobId::new("stub-job"))
        }

        fn status(&mut self, _job_id: &JobId) -> Result<JobStatus, GenerationError> {
            self.polls += 1;
            self.statuses
                .pop_front()
                .unwrap_or(Ok(JobStatus::Running))
        }
    }

    fn fast_config(max_attempts: usize) -> PollConfig {
        PollConfig {
            interval: Duration::ZERO,
            max_attempts,
        }
    }

    #[test]
    fn test_succeeds_after_pending_and_running() {
        let mut generator = StubGenerator::new(vec![
            Ok(JobStatus::Pending),
            Ok(JobStatus::Running),
            Ok(JobStatus::Succeeded {
                video_url: "https://cdn.example/video.mp4".into(),
            }),
        ]);
        let cancel = AtomicBool::new(false);

        let url = poll_until_done(
            &mut generator,
            &JobId::new("j1"),
            &fast_config(10),
            &cancel,
        )
        .unwrap();

        assert_eq!(url, "https://cdn.example/video.mp4");
        assert_eq!(generator.polls, 3);
    }

    #[test]
    fn test_job_failure_surfaces_reason() {
        let mut generator = StubGenerator::new(vec![Ok(JobStatus::Failed {
            reason: "content policy".into(),
        })]);
        let cancel = AtomicBool::new(false);

        let result = poll_until_done(
            &mut generator,
            &JobId::new("j1"),
            &fast_config(10),
            &cancel,
        );
        assert!(matches!(result, Err(PollError::JobFailed { reason }) if reason == "content policy"));
    }

    #[test]
    fn test_times_out_after_max_attempts() {
        let mut generator = StubGenerator::new(vec![]);
        let cancel = AtomicBool::new(false);

        let result =
            poll_until_done(&mut generator, &JobId::new("j1"), &fast_config(3), &cancel);
        assert!(matches!(result, Err(PollError::TimedOut { attempts: 3 })));
        assert_eq!(generator.polls, 3);
    }

    #[test]
    fn test_pre_cancelled_never_polls() {
        let mut generator = StubGenerator::new(vec![]);
        let cancel = AtomicBool::new(true);

        let result =
            poll_until_done(&mut generator, &JobId::new("j1"), &fast_config(5), &cancel);
        assert!(matches!(result, Err(PollError::Cancelled)));
        assert_eq!(generator.polls, 0);
    }

    #[test]
    fn test_generator_error_propagates_without_retry() {
        let mut generator = StubGenerator::new(vec![Err(GenerationError::Upstream(
            "503 from service".into(),
        ))]);
        let cancel = AtomicBool::new(false);

        let result =
            poll_until_done(&mut generator, &JobId::new("j1"), &fast_config(5), &cancel);
        assert!(matches!(result, Err(PollError::Generator(_))));
        assert_eq!(generator.polls, 1);
    }

    #[test]
    fn test_spawn_poll_delivers_result_over_channel() {
        let generator = StubGenerator::new(vec![Ok(JobStatus::Succeeded {
            video_url: "https://cdn.example/clip.mp4".into(),
        })]);

        let handle = spawn_poll(Box::new(generator), JobId::new("j1"), fast_config(5));
        let url = handle.wait().unwrap();
        assert_eq!(url, "https://cdn.example/clip.mp4");
    }

    #[test]
    fn test_spawn_poll_cancellation() {
        // Long interval so the poll is still sleeping when we cancel.
        let generator = StubGenerator::new(vec![]);
        let config = PollConfig {
            interval: Duration::from_secs(60),
            max_attempts: 1,
        };

        let handle = spawn_poll(Box::new(generator), JobId::new("j1"), config);
        handle.cancel();
        let result = handle.wait();
        assert!(matches!(result, Err(PollError::Cancelled)));
    }
}
