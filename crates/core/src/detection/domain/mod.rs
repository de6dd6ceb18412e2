pub mod detection_reducer;
pub mod frame_detector;
