use std::path::{Path, PathBuf};

use crate::shared::constants::FRAME_EXTENSIONS;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

/// Adapts a directory of image files to the [`FrameSource`] interface.
///
/// Files are ordered by name and filtered to known image extensions, so
/// a dumped camera capture (`frame_0001.png`, ...) replays as a stream.
/// Decoding happens lazily, one frame per iterator step.
#[derive(Default)]
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
}

impl ImageSequenceSource {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_frame_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_ascii_lowercase();
            FRAME_EXTENSIONS.contains(&ext.as_str())
        })
}

fn decode(path: &Path, index: usize) -> Result<Frame, Box<dyn std::error::Error>> {
    let img = image::open(path)?.into_rgb8();
    let (width, height) = img.dimensions();
    Ok(Frame::new(img.into_raw(), width, height, 3, index))
}

impl FrameSource for ImageSequenceSource {
    fn open(&mut self, path: &Path) -> Result<Option<usize>, Box<dyn std::error::Error>> {
        let mut paths: Vec<PathBuf> = std::fs::read_dir(path)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && has_frame_extension(p))
            .collect();
        paths.sort();
        if paths.is_empty() {
            return Err(format!("no image files found in {}", path.display()).into());
        }
        self.paths = paths;
        Ok(Some(self.paths.len()))
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        Box::new(
            self.paths
                .iter()
                .enumerate()
                .map(|(index, path)| decode(path, index)),
        )
    }

    fn close(&mut self) {
        self.paths.clear();
    }
}
