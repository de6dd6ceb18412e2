use std::collections::HashMap;

use crate::detection::domain::frame_detector::FrameDetector;
use crate::shared::frame::Frame;
use crate::shared::rect::Rect;

/// Replays pre-authored detections by frame index.
///
/// Lets tests and demo runs drive the reducer through exact appear /
/// move / blink / disappear scenarios without a camera or a model file.
/// Frames with no entry read as "nothing detected."
#[derive(Default)]
pub struct ScriptedDetector {
    faces: HashMap<usize, Vec<Rect>>,
    eyes: HashMap<usize, Vec<Rect>>,
}

impl ScriptedDetector {
    pub fn new(faces: HashMap<usize, Vec<Rect>>, eyes: HashMap<usize, Vec<Rect>>) -> Self {
        Self { faces, eyes }
    }

    /// Scenario builder: one entry per frame, `(faces, eyes)`.
    pub fn from_script(script: Vec<(Vec<Rect>, Vec<Rect>)>) -> Self {
        let mut faces = HashMap::new();
        let mut eyes = HashMap::new();
        for (index, (f, e)) in script.into_iter().enumerate() {
            faces.insert(index, f);
            eyes.insert(index, e);
        }
        Self { faces, eyes }
    }
}

impl FrameDetector for ScriptedDetector {
    fn detect_faces(&mut self, frame: &Frame) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        Ok(self.faces.get(&frame.index()).cloned().unwrap_or_default())
    }

    fn detect_eyes(
        &mut self,
        frame: &Frame,
        _region: Rect,
    ) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        Ok(self.eyes.get(&frame.index()).cloned().unwrap_or_default())
    }
}
