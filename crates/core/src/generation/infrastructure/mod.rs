pub mod http_video_generator;
