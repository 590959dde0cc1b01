pub mod bus;
pub mod companion;
pub mod history;
pub mod intent;
pub mod suggest;

pub use bus::{capture_bus, CaptureEvent, CompanionEnd, CompanionUpdate, FrontEnd};
pub use companion::Companion;
pub use history::{demo_items, HistoryLog};
pub use intent::{classify_kind, IntentClassifier};
pub use suggest::SuggestionEngine;
