use std::io::Cursor;
use std::path::Path;

use rustface::ImageData;

use crate::detection::domain::frame_detector::FrameDetector;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Face detection backed by the `rustface` crate (SeetaFace engine).
///
/// The pretrained model is loaded from a byte blob before first use;
/// construction fails if the blob does not parse, which callers treat as
/// "detector unavailable" and degrade to empty detections.
///
/// SeetaFace ships no eye cascade, so `detect_eyes` always returns the
/// empty set here. Sessions that need eye events plug in a backend
/// implementing both halves of [`FrameDetector`].
pub struct RustfaceFrameDetector {
    model: rustface::Model,
    min_face_size: u32,
    score_thresh: f64,
}

impl RustfaceFrameDetector {
    pub fn from_model_bytes(model_data: &[u8]) -> Result<Self, Box<dyn std::error::Error>> {
        let model = rustface::read_model(Cursor::new(model_data))?;
        Ok(Self {
            model,
            min_face_size: 20,
            score_thresh: 2.0,
        })
    }

    pub fn from_model_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let bytes = std::fs::read(path)?;
        Self::from_model_bytes(&bytes)
    }
}

impl FrameDetector for RustfaceFrameDetector {
    fn detect_faces(&mut self, frame: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        // The engine's detector is cheap to build relative to a detection
        // pass, and building per call keeps the model shareable.
        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(self.min_face_size);
        detector.set_score_thresh(self.score_thresh);
        detector.set_pyramid_scale_factor(0.8);
        detector.set_slide_window_step(4, 4);

        let gray = frame.to_luma();
        let faces = detector.detect(&ImageData::new(&gray, frame.width(), frame.height()));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                Rect::new(bbox.x(), bbox.y(), bbox.width() as i32, bbox.height() as i32)
            })
            .collect())
    }

    fn detect_eyes(
        &mut self,
        _frame: &Frame,
        _region: Rect,
    ) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        Ok(Vec::new())
    }
}
