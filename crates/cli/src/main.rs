use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use clap::{Parser, Subcommand};

use eyecue_core::detection::domain::detection_reducer::{
    DetectionReducer, EyeFilterConfig, ReducerConfig,
};
use eyecue_core::detection::domain::frame_detector::FrameDetector;
use eyecue_core::detection::infrastructure::model_resolver;
use eyecue_core::detection::infrastructure::rustface_detector::RustfaceFrameDetector;
use eyecue_core::detection::infrastructure::unavailable_detector::UnavailableDetector;
use eyecue_core::events::sink::LogSink;
use eyecue_core::generation::domain::image_payload::ImagePayload;
use eyecue_core::generation::domain::job_poller::{poll_until_done, PollConfig};
use eyecue_core::generation::domain::video_generator::VideoGenerator;
use eyecue_core::generation::infrastructure::http_video_generator::HttpVideoGenerator;
use eyecue_core::pipeline::detect_session_use_case::DetectSessionUseCase;
use eyecue_core::shared::constants::{
    DEFAULT_MOVE_THRESHOLD, DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POLL_MAX_ATTEMPTS,
    FACE_MODEL_NAME, FACE_MODEL_URL,
};
use eyecue_core::video::infrastructure::image_sequence_source::ImageSequenceSource;

/// Debounced face/eye detection events and image-to-video generation.
#[derive(Parser)]
#[command(name = "eyecue")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a detection session over an image sequence and log events.
    Detect {
        /// Directory of frame images (sorted by name).
        input: PathBuf,

        /// Head-move debounce threshold in pixels.
        #[arg(long, default_value_t = DEFAULT_MOVE_THRESHOLD)]
        move_threshold: f64,

        /// Eye filter profile: strict or relaxed.
        #[arg(long, default_value = "strict")]
        eye_profile: String,

        /// Clear the eye state when the head disappears.
        #[arg(long)]
        reset_eyes_on_head_loss: bool,

        /// Stop after this many frames.
        #[arg(long)]
        max_frames: Option<usize>,

        /// Path to a SeetaFace model file (downloaded to cache if omitted).
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Submit an image for video generation and poll to completion.
    Generate {
        /// Image file (jpeg, jpg, png, or webp; at most 5 MiB).
        image: PathBuf,

        /// API key (falls back to the EYECUE_API_KEY environment variable).
        #[arg(long)]
        api_key: Option<String>,

        #[arg(long, default_value = "https://api.dev.runwayml.com/v1")]
        base_url: String,

        /// Seconds between job status polls.
        #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
        interval_secs: u64,

        /// Give up after this many polls.
        #[arg(long, default_value_t = DEFAULT_POLL_MAX_ATTEMPTS)]
        max_attempts: usize,
    },
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    match Cli::parse().command {
        Command::Detect {
            input,
            move_threshold,
            eye_profile,
            reset_eyes_on_head_loss,
            max_frames,
            model,
        } => run_detect(
            &input,
            move_threshold,
            &eye_profile,
            reset_eyes_on_head_loss,
            max_frames,
            model,
        ),
        Command::Generate {
            image,
            api_key,
            base_url,
            interval_secs,
            max_attempts,
        } => run_generate(&image, api_key, &base_url, interval_secs, max_attempts),
    }
}

fn parse_eye_profile(name: &str) -> Result<EyeFilterConfig, Box<dyn std::error::Error>> {
    match name {
        "strict" => Ok(EyeFilterConfig::STRICT),
        "relaxed" => Ok(EyeFilterConfig::RELAXED),
        other => Err(format!("unknown eye profile {other:?} (expected strict or relaxed)").into()),
    }
}

/// Model-load failure leaves the session with a no-op detector rather
/// than aborting; every frame then reads as "nothing detected."
fn build_detector(model: Option<PathBuf>) -> Box<dyn FrameDetector> {
    let model_path: Result<PathBuf, Box<dyn std::error::Error>> = match model {
        Some(path) => Ok(path),
        None => {
            model_resolver::resolve(FACE_MODEL_NAME, FACE_MODEL_URL, None).map_err(Into::into)
        }
    };

    match model_path.and_then(|path| RustfaceFrameDetector::from_model_path(&path)) {
        Ok(detector) => Box::new(detector),
        Err(e) => {
            log::warn!("detector unavailable: {e}");
            Box::new(UnavailableDetector)
        }
    }
}

fn run_detect(
    input: &Path,
    move_threshold: f64,
    eye_profile: &str,
    reset_eyes_on_head_loss: bool,
    max_frames: Option<usize>,
    model: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ReducerConfig {
        move_threshold,
        eye_filter: parse_eye_profile(eye_profile)?,
        reset_eye_state_on_head_loss: reset_eyes_on_head_loss,
    };

    let mut session =
        DetectSessionUseCase::new(build_detector(model), DetectionReducer::new(config));
    session.subscribe(Box::new(LogSink));

    let mut source = ImageSequenceSource::new();
    let report = session.execute(&mut source, input, max_frames)?;
    println!(
        "{} frames processed, {} events",
        report.frames_processed, report.events_emitted
    );
    Ok(())
}

fn run_generate(
    image: &Path,
    api_key: Option<String>,
    base_url: &str,
    interval_secs: u64,
    max_attempts: usize,
) -> Result<(), Box<dyn std::error::Error>> {
    let api_key = match api_key.or_else(|| std::env::var("EYECUE_API_KEY").ok()) {
        Some(key) if !key.is_empty() => key,
        _ => return Err("no API key: pass --api-key or set EYECUE_API_KEY".into()),
    };

    let payload = ImagePayload::from_path(image)?;
    let mut generator = HttpVideoGenerator::new(base_url, api_key);
    let job_id = generator.submit(&payload)?;
    log::info!("polling job {} every {interval_secs}s", job_id.as_str());

    let config = PollConfig {
        interval: Duration::from_secs(interval_secs),
        max_attempts,
    };
    let cancel = AtomicBool::new(false);
    let video_url = poll_until_done(&mut generator, &job_id, &config, &cancel)?;

    println!("{video_url}");
    Ok(())
}
