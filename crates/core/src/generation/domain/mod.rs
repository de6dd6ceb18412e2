pub mod image_payload;
pub mod job_poller;
pub mod video_generator;
