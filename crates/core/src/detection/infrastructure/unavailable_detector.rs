use crate::detection::domain::frame_detector::FrameDetector;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Detector installed when model loading fails.
///
/// Returns empty candidate sets for every frame, so a session keeps
/// running with detection degraded to "nothing found" instead of
/// aborting.
pub struct UnavailableDetector;

impl FrameDetector for UnavailableDetector {
    fn detect_faces(&mut self, _frame: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        Ok(Vec::new())
    }

    fn detect_eyes(
        &mut self,
        _frame: &Frame,
        _region: Rect,
    ) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        Ok(Vec::new())
    }
}
