use std::path::Path;

use crate::shared::frame::Frame;

/// Produces frames for a detection session.
///
/// Implementations own the I/O details (camera stream, image sequence);
/// the session loop only sees `Frame`s in order, each carrying its
/// sequence index.
pub trait FrameSource: Send {
    /// Opens the source. Returns the number of frames if known.
    fn open(&mut self, path: &Path) -> Result<Option<usize>, Box<dyn std::error::Error>>;

    /// Returns an iterator over frames in capture order.
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_>;

    /// Releases any resources held by the source.
    fn close(&mut self);
}
