use bubble_core::{CapturedItem, ItemKind};
use chrono::{Duration, Utc};
use tracing::debug;

/// Captured items, newest first.
///
/// `append` is the only way in. Consumers read through `head` and `all`,
/// which hand out borrows, so a reader can never mutate the log.
#[derive(Debug, Default, Clone)]
pub struct HistoryLog {
    items: Vec<CapturedItem>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing newest-first sequence, taken as-is.
    pub fn with_items(items: Vec<CapturedItem>) -> Self {
        Self { items }
    }

    /// Insert `item` at the front. Returns false and leaves the log unchanged
    /// when the content is blank or repeats the current head.
    pub fn append(&mut self, item: CapturedItem) -> bool {
        if item.content.trim().is_empty() {
            debug!(id = %item.id, "Dropping blank capture");
            return false;
        }
        if self.head().is_some_and(|head| head.content == item.content) {
            debug!(id = %item.id, "Dropping consecutive duplicate capture");
            return false;
        }
        self.items.insert(0, item);
        true
    }

    pub fn head(&self) -> Option<&CapturedItem> {
        self.items.first()
    }

    pub fn all(&self) -> &[CapturedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The two sample captures a demo session starts with, newest first.
pub fn demo_items() -> Vec<CapturedItem> {
    let now = Utc::now();

    let mut address = CapturedItem::new(
        "Johnathan Q. Public\n123 Innovation Way\nSan Francisco, CA 94105\n(555) 012-3456",
        ItemKind::Text,
    )
    .with_source("Outlook")
    .with_classification("Detected: Address & Contact Info");
    address.captured_at = now - Duration::minutes(5);

    let mut snippet = CapturedItem::new(
        r#"const userProfile = { name: "Alice", role: "Developer" };"#,
        ItemKind::Code,
    )
    .with_source("VS Code")
    .with_classification("Detected: JavaScript Object");
    snippet.captured_at = now - Duration::minutes(15);

    vec![address, snippet]
}
