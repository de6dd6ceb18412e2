use crate::events::event::{Event, EyeState};

/// Subscriber interface for detection events.
///
/// Every method has a no-op default, so a sink implements only the
/// transitions it cares about — the typed equivalent of the optional
/// callback slots this replaces.
pub trait EventSink: Send {
    fn on_head_detected(&mut self, _x: f64, _y: f64) {}
    fn on_head_moved(&mut self, _x: f64, _y: f64) {}
    fn on_head_lost(&mut self) {}
    fn on_eye_state_changed(&mut self, _state: EyeState) {}

    /// Routes an event to the matching slot. Sinks normally override the
    /// per-event methods instead of this.
    fn on_event(&mut self, event: &Event) {
        match *event {
            Event::HeadDetected { x, y } => self.on_head_detected(x, y),
            Event::HeadMoved { x, y } => self.on_head_moved(x, y),
            Event::HeadLost => self.on_head_lost(),
            Event::EyeStateChanged(state) => self.on_eye_state_changed(state),
        }
    }
}

/// Sink that logs every event at info level.
pub struct LogSink;

impl EventSink for LogSink {
    fn on_head_detected(&mut self, x: f64, y: f64) {
        log::info!("head detected at ({x:.1}, {y:.1})");
    }

    fn on_head_moved(&mut self, x: f64, y: f64) {
        log::info!("head moved to ({x:.1}, {y:.1})");
    }

    fn on_head_lost(&mut self) {
        log::info!("head lost");
    }

    fn on_eye_state_changed(&mut self, state: EyeState) {
        match state {
            EyeState::Open => log::info!("eyes open"),
            EyeState::Closed => log::info!("eyes closed"),
        }
    }
}
