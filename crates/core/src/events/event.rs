/// Eye openness as judged from one frame's surviving eye candidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyeState {
    Open,
    Closed,
}

/// Edge-triggered detection event.
///
/// Events fire on state transitions only, never on every frame a state
/// holds. Within one reducer call the order is fixed:
/// `HeadDetected`/`HeadLost`, then `HeadMoved`, then `EyeStateChanged`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// A head appeared; coordinates are the face center in frame pixels.
    HeadDetected { x: f64, y: f64 },
    /// The head center shifted by more than the jitter threshold on
    /// either axis.
    HeadMoved { x: f64, y: f64 },
    /// No face candidate remained after at least one frame with a head.
    HeadLost,
    /// Eye openness flipped relative to the previous determination.
    EyeStateChanged(EyeState),
}
