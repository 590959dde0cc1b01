use bubble_core::{CapturedItem, Mode, Suggestion};
use tokio::sync::mpsc;

/// Input to the companion run loop.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureEvent {
    /// Text became available from the capture source.
    Copied { content: String },
    SetMode(Mode),
    TogglePause,
}

impl CaptureEvent {
    pub fn copied(content: &str) -> Self {
        CaptureEvent::Copied {
            content: content.to_string(),
        }
    }
}

/// Output of the companion run loop, consumed by the rendering side.
#[derive(Debug, Clone, PartialEq)]
pub enum CompanionUpdate {
    Captured(CapturedItem),
    /// Suggestions computed for `item_id`. The item may no longer be the
    /// head when this arrives; whether to show it is up to the consumer.
    Suggestions {
        item_id: String,
        suggestions: Vec<Suggestion>,
    },
    ModeChanged(Mode),
    PauseChanged(bool),
}

/// The end held by whoever produces captures and renders updates.
pub struct FrontEnd {
    pub events: mpsc::Sender<CaptureEvent>,
    pub updates: mpsc::Receiver<CompanionUpdate>,
}

/// The end consumed by `Companion::run_loop`.
pub struct CompanionEnd {
    pub events: mpsc::Receiver<CaptureEvent>,
    pub updates: mpsc::Sender<CompanionUpdate>,
}

/// Two bounded channels joining a capture front end to the companion.
/// A zero `capacity` is raised to one.
pub fn capture_bus(capacity: usize) -> (FrontEnd, CompanionEnd) {
    let capacity = capacity.max(1);
    let (event_tx, event_rx) = mpsc::channel(capacity);
    let (update_tx, update_rx) = mpsc::channel(capacity);
    (
        FrontEnd {
            events: event_tx,
            updates: update_rx,
        },
        CompanionEnd {
            events: event_rx,
            updates: update_tx,
        },
    )
}
