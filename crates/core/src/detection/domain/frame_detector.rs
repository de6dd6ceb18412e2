use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Domain interface for per-frame face and eye detection.
///
/// Implementations may be stateful (model handles, frame caches), hence
/// `&mut self`. An unavailable or failed detector is expected to surface
/// as empty candidate sets at the call site, never as a fatal condition.
pub trait FrameDetector: Send {
    /// Candidate face boxes for the whole frame.
    fn detect_faces(&mut self, frame: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>>;

    /// Candidate eye boxes confined to `region` (a face box). Returned
    /// coordinates are relative to the region, matching how cascade
    /// classifiers report ROI hits.
    fn detect_eyes(
        &mut self,
        frame: &Frame,
        region: Rect,
    ) -> Result<Vec<Rect>, Box<dyn std::error::Error>>;
}
