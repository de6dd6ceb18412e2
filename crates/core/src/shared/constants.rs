pub const FACE_MODEL_NAME: &str = "seeta_fd_frontal_v1.0.bin";
pub const FACE_MODEL_URL: &str =
    "https://github.com/atomashpolskiy/rustface/raw/master/model/seeta_fd_frontal_v1.0.bin";

/// Head movement below this many pixels (per axis) is treated as jitter.
pub const DEFAULT_MOVE_THRESHOLD: f64 = 20.0;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const SUPPORTED_IMAGE_FORMATS: &[&str] = &["jpeg", "jpg", "png", "webp"];

/// Generation job status poll cadence.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
/// Upper bound on status polls before the job is declared timed out
/// (~10 minutes at the default interval).
pub const DEFAULT_POLL_MAX_ATTEMPTS: usize = 60;

pub const FRAME_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp", "webp"];
