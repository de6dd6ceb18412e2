pub mod model_resolver;
pub mod rustface_detector;
pub mod scripted_detector;
pub mod unavailable_detector;
