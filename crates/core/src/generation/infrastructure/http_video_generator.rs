use serde::{Deserialize, Serialize};

use crate::generation::domain::image_payload::ImagePayload;
use crate::generation::domain::video_generator::{
    GenerationError, JobId, JobStatus, VideoGenerator,
};

const DEFAULT_MODEL: &str = "gen3a_turbo";
const DEFAULT_DURATION_SECS: u32 = 10;
const DEFAULT_PROMPT: &str = "A person sits still, maintaining a serious expression and \
direct eye contact with the camera. The camera is completely still, with soft natural \
lighting. The person nods slowly, blinks naturally, and occasionally tilts their head \
slightly, creating a natural and realistic effect.";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SubmitRequest<'a> {
    model: &'a str,
    prompt_image: &'a str,
    prompt_text: &'a str,
    duration: u32,
}

#[derive(Deserialize)]
struct SubmitResponse {
    id: String,
}

#[derive(Deserialize)]
struct TaskResponse {
    status: String,
    #[serde(default)]
    output: Vec<String>,
    #[serde(default)]
    failure: Option<String>,
}

/// Blocking HTTP client for a hosted image-to-video generation API.
///
/// `POST {base}/image-to-video` submits the data-URI image and returns a
/// task id; `GET {base}/tasks/{id}` reports progress. HTTP 4xx responses
/// are classified as client errors, everything else (5xx, transport,
/// malformed bodies) as upstream.
pub struct HttpVideoGenerator {
    client: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
    prompt_text: String,
    duration_secs: u32,
}

impl HttpVideoGenerator {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            prompt_text: DEFAULT_PROMPT.to_string(),
            duration_secs: DEFAULT_DURATION_SECS,
        }
    }

    pub fn with_prompt(mut self, prompt_text: impl Into<String>) -> Self {
        self.prompt_text = prompt_text.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    fn classify_response(
        response: reqwest::blocking::Response,
    ) -> Result<reqwest::blocking::Response, GenerationError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().unwrap_or_default();
        let message = format!("{status}: {body}");
        if status.is_client_error() {
            Err(GenerationError::Client(message))
        } else {
            Err(GenerationError::Upstream(message))
        }
    }
}

impl VideoGenerator for HttpVideoGenerator {
    fn submit(&mut self, payload: &ImagePayload) -> Result<JobId, GenerationError> {
        let request = SubmitRequest {
            model: &self.model,
            prompt_image: payload.data_uri(),
            prompt_text: &self.prompt_text,
            duration: self.duration_secs,
        };

        let response = self
            .client
            .post(format!("{}/image-to-video", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;
        let response = Self::classify_response(response)?;

        let submitted: SubmitResponse = response
            .json()
            .map_err(|e| GenerationError::Upstream(format!("malformed submit response: {e}")))?;
        log::info!("generation job {} submitted", submitted.id);
        Ok(JobId::new(submitted.id))
    }

    fn status(&mut self, job_id: &JobId) -> Result<JobStatus, GenerationError> {
        let response = self
            .client
            .get(format!("{}/tasks/{}", self.base_url, job_id.as_str()))
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| GenerationError::Upstream(e.to_string()))?;
        let response = Self::classify_response(response)?;

        let task: TaskResponse = response
            .json()
            .map_err(|e| GenerationError::Upstream(format!("malformed task response: {e}")))?;
        map_task(task)
    }
}

fn map_task(task: TaskResponse) -> Result<JobStatus, GenerationError> {
    match task.status.as_str() {
        "SUCCEEDED" => {
            let video_url = task.output.into_iter().next().ok_or_else(|| {
                GenerationError::Upstream("job succeeded but returned no output".into())
            })?;
            Ok(JobStatus::Succeeded { video_url })
        }
        "FAILED" => Ok(JobStatus::Failed {
            reason: task.failure.unwrap_or_else(|| "unspecified".into()),
        }),
        "PENDING" => Ok(JobStatus::Pending),
        // RUNNING, THROTTLED, and anything the API adds later all read
        // as still-in-progress; the poll bound caps how long we wait.
        _ => Ok(JobStatus::Running),
    }
}
