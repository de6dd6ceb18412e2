use crate::events::event::{Event, EyeState};
use crate::shared::constants::DEFAULT_MOVE_THRESHOLD;
use crate::shared::rect::Rect;

/// Ratio thresholds for filtering eye candidates against their face box.
///
/// A candidate survives only if `width/height > aspect_threshold`,
/// `width/face_width > size_threshold`, and
/// `height/face_height > size_threshold`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EyeFilterConfig {
    pub aspect_threshold: f64,
    pub size_threshold: f64,
}

impl EyeFilterConfig {
    /// Canonical profile: rejects tall or tiny candidates aggressively.
    pub const STRICT: Self = Self {
        aspect_threshold: 0.5,
        size_threshold: 0.1,
    };

    /// Permissive profile for low-resolution or poorly lit streams.
    pub const RELAXED: Self = Self {
        aspect_threshold: 0.2,
        size_threshold: 0.05,
    };

    fn accepts(&self, eye: &Rect, face: &Rect) -> bool {
        if !eye.is_valid() {
            return false;
        }
        let aspect = eye.width as f64 / eye.height as f64;
        let width_ratio = eye.width as f64 / face.width as f64;
        let height_ratio = eye.height as f64 / face.height as f64;
        aspect > self.aspect_threshold
            && width_ratio > self.size_threshold
            && height_ratio > self.size_threshold
    }
}

impl Default for EyeFilterConfig {
    fn default() -> Self {
        Self::STRICT
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReducerConfig {
    /// Per-axis head-center displacement (pixels) that must be exceeded
    /// before a move event fires.
    pub move_threshold: f64,
    pub eye_filter: EyeFilterConfig,
    /// When `false` (the default), the last eye state survives head loss
    /// and the next head inherits it as the comparison baseline. This
    /// staleness is deliberate; enable the flag to clear instead.
    pub reset_eye_state_on_head_loss: bool,
}

impl Default for ReducerConfig {
    fn default() -> Self {
        Self {
            move_threshold: DEFAULT_MOVE_THRESHOLD,
            eye_filter: EyeFilterConfig::default(),
            reset_eye_state_on_head_loss: false,
        }
    }
}

/// One frame's raw detector output.
///
/// `eyes` are the candidates for the primary face only, in coordinates
/// relative to that face's box (the reducer never positions them, so the
/// frame-vs-ROI origin distinction does not affect it). Empty sets are
/// the normal "nothing detected" case, not an error.
#[derive(Clone, Debug, Default)]
pub struct RawDetection {
    pub faces: Vec<Rect>,
    pub eyes: Vec<Rect>,
}

impl RawDetection {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Per-session detection state. Created once, mutated exactly once per
/// processed frame by [`DetectionReducer::process`], confined to the
/// frame loop's thread.
#[derive(Clone, Debug, Default)]
pub struct DetectorState {
    has_head: bool,
    head_center: Option<(f64, f64)>,
    eye_state: Option<EyeState>,
}

impl DetectorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_head(&self) -> bool {
        self.has_head
    }

    /// Center of the last accepted face; `None` whenever no head is
    /// present.
    pub fn head_center(&self) -> Option<(f64, f64)> {
        self.head_center
    }

    /// Last determined eye state. `None` until first determined; may be
    /// stale after head loss (see [`ReducerConfig`]).
    pub fn eye_state(&self) -> Option<EyeState> {
        self.eye_state
    }
}

/// Picks the largest-area valid face, ties broken by first-encountered.
///
/// The frame loop uses the same selection to choose the eye-detection
/// region, so the reducer and the detector agree on the primary face.
pub fn select_primary_face(faces: &[Rect]) -> Option<Rect> {
    let mut best: Option<Rect> = None;
    for face in faces.iter().filter(|f| f.is_valid()) {
        match best {
            Some(b) if b.area() >= face.area() => {}
            _ => best = Some(*face),
        }
    }
    best
}

/// Turns raw per-frame detections into debounced, edge-triggered events.
///
/// Stateless itself; all persistence lives in the caller-owned
/// [`DetectorState`]. `process` never blocks and never fails.
#[derive(Clone, Debug, Default)]
pub struct DetectionReducer {
    config: ReducerConfig,
}

impl DetectionReducer {
    pub fn new(config: ReducerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReducerConfig {
        &self.config
    }

    /// Processes one frame's detections, mutating `state` in place.
    ///
    /// Returned events are ordered: `HeadDetected`/`HeadLost`, then
    /// `HeadMoved`, then `EyeStateChanged`. Each variant appears at most
    /// once per call.
    pub fn process(&self, raw: &RawDetection, state: &mut DetectorState) -> Vec<Event> {
        let mut events = Vec::new();

        let Some(face) = select_primary_face(&raw.faces) else {
            if state.has_head {
                events.push(Event::HeadLost);
            }
            state.has_head = false;
            state.head_center = None;
            if self.config.reset_eye_state_on_head_loss {
                state.eye_state = None;
            }
            return events;
        };

        let (cx, cy) = face.center();

        if !state.has_head {
            events.push(Event::HeadDetected { x: cx, y: cy });
            state.has_head = true;
        }

        if let Some((prev_x, prev_y)) = state.head_center {
            let dx = (cx - prev_x).abs();
            let dy = (cy - prev_y).abs();
            if dx > self.config.move_threshold || dy > self.config.move_threshold {
                events.push(Event::HeadMoved { x: cx, y: cy });
            }
        }
        state.head_center = Some((cx, cy));

        let surviving = raw
            .eyes
            .iter()
            .filter(|eye| self.config.eye_filter.accepts(eye, &face))
            .count();
        let new_eye_state = if surviving < 2 {
            EyeState::Closed
        } else {
            EyeState::Open
        };
        if let Some(prev) = state.eye_state {
            if prev != new_eye_state {
                events.push(Event::EyeStateChanged(new_eye_state));
            }
        }
        state.eye_state = Some(new_eye_state);

        events
    }
}
