use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::detection::domain::detection_reducer::{
    select_primary_face, DetectionReducer, DetectorState, RawDetection,
};
use crate::detection::domain::frame_detector::FrameDetector;
use crate::events::bus::{EventBus, SubscriptionId};
use crate::events::sink::EventSink;
use crate::shared::frame::Frame;
use crate::video::domain::frame_source::FrameSource;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionReport {
    pub frames_processed: usize,
    pub events_emitted: usize,
}

/// One detection session: frames in, debounced events out.
///
/// Per tick: detect faces, pick the primary face, detect eyes within it,
/// reduce to events, dispatch to subscribers. Detector failures degrade
/// to empty candidate sets (logged, never fatal), so a session survives
/// an unavailable classifier. The `streaming` flag is checked before
/// each tick; flipping it is the only cancellation needed since a single
/// tick never blocks.
pub struct DetectSessionUseCase {
    detector: Box<dyn FrameDetector>,
    reducer: DetectionReducer,
    state: DetectorState,
    bus: EventBus,
    streaming: Arc<AtomicBool>,
}

impl DetectSessionUseCase {
    pub fn new(detector: Box<dyn FrameDetector>, reducer: DetectionReducer) -> Self {
        Self {
            detector,
            reducer,
            state: DetectorState::new(),
            bus: EventBus::new(),
            streaming: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) -> SubscriptionId {
        self.bus.subscribe(sink)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// Shared flag that stops the session loop when cleared.
    pub fn streaming_flag(&self) -> Arc<AtomicBool> {
        self.streaming.clone()
    }

    pub fn state(&self) -> &DetectorState {
        &self.state
    }

    /// Processes a single frame and dispatches whatever events it
    /// produced. Hosts with their own frame cadence call this directly.
    pub fn process_frame(&mut self, frame: &Frame) -> usize {
        let faces = match self.detector.detect_faces(frame) {
            Ok(faces) => faces,
            Err(e) => {
                log::warn!("face detection failed on frame {}: {e}", frame.index());
                Vec::new()
            }
        };

        let eyes = match select_primary_face(&faces) {
            Some(primary) => match self.detector.detect_eyes(frame, primary) {
                Ok(eyes) => eyes,
                Err(e) => {
                    log::warn!("eye detection failed on frame {}: {e}", frame.index());
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        let events = self.reducer.process(&RawDetection { faces, eyes }, &mut self.state);
        self.bus.dispatch(&events);
        events.len()
    }

    /// Runs the session over every frame the source yields, or until the
    /// streaming flag is cleared or `max_frames` is reached.
    pub fn execute(
        &mut self,
        source: &mut dyn FrameSource,
        input: &Path,
        max_frames: Option<usize>,
    ) -> Result<SessionReport, Box<dyn std::error::Error>> {
        let total = source.open(input)?;
        log::info!(
            "detection session over {} ({} frames)",
            input.display(),
            total.map_or_else(|| "?".into(), |n| n.to_string())
        );

        let mut report = SessionReport::default();
        for frame in source.frames() {
            if !self.streaming.load(Ordering::Relaxed) {
                break;
            }
            if max_frames.is_some_and(|cap| report.frames_processed >= cap) {
                break;
            }
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    log::warn!("skipping undecodable frame: {e}");
                    continue;
                }
            };
            report.events_emitted += self.process_frame(&frame);
            report.frames_processed += 1;
        }
        source.close();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::infrastructure::scripted_detector::ScriptedDetector;
    use crate::events::event::{Event, EyeState};
    use crate::shared::rect::Rect;
    use std::sync::Mutex;

    struct StubSource {
        count: usize,
    }

    impl FrameSource for StubSource {
        fn open(&mut self, _path: &Path) -> Result<Option<usize>, Box<dyn std::error::Error>> {
            Ok(Some(self.count))
        }

        fn frames(
            &mut self,
        ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
            Box::new((0..self.count).map(|i| Ok(Frame::new(vec![0u8; 16], 4, 4, 1, i))))
        }

        fn close(&mut self) {}
    }

    struct RecordingSink {
        seen: Arc<Mutex<Vec<Event>>>,
    }

    impl EventSink for RecordingSink {
        fn on_event(&mut self, event: &Event) {
            self.seen.lock().unwrap().push(*event);
        }
    }

    struct FailingDetector;

    impl FrameDetector for FailingDetector {
        fn detect_faces(
            &mut self,
            _frame: &Frame,
        ) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
            Err("classifier not loaded".into())
        }

        fn detect_eyes(
            &mut self,
            _frame: &Frame,
            _region: Rect,
        ) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
            Err("classifier not loaded".into())
        }
    }

    fn face() -> Rect {
        Rect::new(50, 50, 100, 100)
    }

    fn eye_pair() -> Vec<Rect> {
        vec![Rect::new(10, 20, 25, 20), Rect::new(60, 20, 25, 20)]
    }

    fn session_with_recording(
        detector: Box<dyn FrameDetector>,
    ) -> (DetectSessionUseCase, Arc<Mutex<Vec<Event>>>) {
        let mut session = DetectSessionUseCase::new(detector, DetectionReducer::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        session.subscribe(Box::new(RecordingSink { seen: seen.clone() }));
        (session, seen)
    }

    #[test]
    fn test_appear_blink_disappear_scenario() {
        // 0: head appears, eyes closed; 1: eyes open; 2: eyes still open;
        // 3: head gone.
        let detector = ScriptedDetector::from_script(vec![
            (vec![face()], vec![]),
            (vec![face()], eye_pair()),
            (vec![face()], eye_pair()),
            (vec![], vec![]),
        ]);
        let (mut session, seen) = session_with_recording(Box::new(detector));

        let report = session
            .execute(&mut StubSource { count: 4 }, Path::new("stub"), None)
            .unwrap();

        assert_eq!(report.frames_processed, 4);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                Event::HeadDetected { x: 100.0, y: 100.0 },
                Event::EyeStateChanged(EyeState::Open),
                Event::HeadLost,
            ]
        );
        assert_eq!(report.events_emitted, 3);
    }

    #[test]
    fn test_detector_failure_degrades_to_no_detection() {
        let (mut session, seen) = session_with_recording(Box::new(FailingDetector));

        let report = session
            .execute(&mut StubSource { count: 5 }, Path::new("stub"), None)
            .unwrap();

        assert_eq!(report.frames_processed, 5);
        assert_eq!(report.events_emitted, 0);
        assert!(seen.lock().unwrap().is_empty());
        assert!(!session.state().has_head());
    }

    #[test]
    fn test_cleared_streaming_flag_stops_before_first_tick() {
        let detector = ScriptedDetector::from_script(vec![(vec![face()], vec![])]);
        let (mut session, seen) = session_with_recording(Box::new(detector));
        session.streaming_flag().store(false, Ordering::Relaxed);

        let report = session
            .execute(&mut StubSource { count: 3 }, Path::new("stub"), None)
            .unwrap();

        assert_eq!(report, SessionReport::default());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_max_frames_caps_the_session() {
        let detector = ScriptedDetector::from_script(vec![
            (vec![face()], vec![]),
            (vec![face()], vec![]),
            (vec![], vec![]), // would fire HeadLost if reached
        ]);
        let (mut session, seen) = session_with_recording(Box::new(detector));

        let report = session
            .execute(&mut StubSource { count: 3 }, Path::new("stub"), Some(2))
            .unwrap();

        assert_eq!(report.frames_processed, 2);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![Event::HeadDetected { x: 100.0, y: 100.0 }]
        );
    }

    #[test]
    fn test_unsubscribed_sink_receives_nothing() {
        let detector = ScriptedDetector::from_script(vec![(vec![face()], vec![])]);
        let mut session =
            DetectSessionUseCase::new(Box::new(detector), DetectionReducer::default());
        let seen = Arc::new(Mutex::new(Vec::new()));
        let id = session.subscribe(Box::new(RecordingSink { seen: seen.clone() }));
        assert!(session.unsubscribe(id));

        session
            .execute(&mut StubSource { count: 1 }, Path::new("stub"), None)
            .unwrap();

        assert!(seen.lock().unwrap().is_empty());
    }
}
