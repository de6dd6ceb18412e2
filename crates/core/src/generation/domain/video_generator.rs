use thiserror::Error;

use crate::generation::domain::image_payload::ImagePayload;

/// Opaque identifier of a submitted generation job.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle of a generation job as reported by the service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Running,
    Succeeded { video_url: String },
    Failed { reason: String },
}

/// Errors from the generation boundary, split the way the relay maps
/// them to HTTP classes: caller input (4xx) versus service/transport
/// trouble (5xx).
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("rejected request: {0}")]
    Client(String),
    #[error("generation service error: {0}")]
    Upstream(String),
}

impl GenerationError {
    pub fn is_client(&self) -> bool {
        matches!(self, GenerationError::Client(_))
    }
}

/// Domain interface for a third-party image-to-video service.
pub trait VideoGenerator: Send {
    /// Submits an image for generation, returning the job to poll.
    fn submit(&mut self, payload: &ImagePayload) -> Result<JobId, GenerationError>;

    /// Fetches the current status of a submitted job.
    fn status(&mut self, job_id: &JobId) -> Result<JobStatus, GenerationError>;
}
