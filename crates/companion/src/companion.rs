use bubble_core::{CapturedItem, Config, Mode, Suggestion};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::bus::{CaptureEvent, CompanionEnd, CompanionUpdate};
use crate::history::HistoryLog;
use crate::intent::{classify_kind, IntentClassifier};
use crate::suggest::SuggestionEngine;

/// The capture pipeline: the single writer of the history log.
pub struct Companion {
    classifier: IntentClassifier,
    engine: SuggestionEngine,
    history: HistoryLog,
    mode: Mode,
    paused: bool,
    source_label: String,
}

impl Companion {
    pub fn new(config: &Config, engine: SuggestionEngine) -> Self {
        Self {
            classifier: IntentClassifier::new(),
            engine,
            history: HistoryLog::new(),
            mode: config.companion.mode,
            paused: false,
            source_label: config.companion.source_label.clone(),
        }
    }

    pub fn with_history(mut self, history: HistoryLog) -> Self {
        self.history = history;
        self
    }

    /// Classify and store a capture. `None` when paused, blank, or a repeat
    /// of the newest item.
    pub fn handle_capture(&mut self, content: &str) -> Option<CapturedItem> {
        if self.paused {
            debug!("Capture ignored while paused");
            return None;
        }
        if content.trim().is_empty() {
            debug!("Capture ignored: blank content");
            return None;
        }

        let item = CapturedItem::new(content, classify_kind(content))
            .with_source(self.source_label.clone())
            .with_classification(self.classifier.classify(content));

        if !self.history.append(item.clone()) {
            return None;
        }

        info!(
            id = %item.id,
            kind = %item.kind,
            classification = item.classification.as_deref().unwrap_or(""),
            "Captured clipboard item"
        );
        Some(item)
    }

    /// Suggestions for the newest item; empty when nothing was captured yet.
    pub async fn suggest_latest(&self) -> Vec<Suggestion> {
        match self.history.head() {
            Some(item) => self.engine.suggest_for(item).await,
            None => {
                debug!("No captures yet, skipping suggestions");
                Vec::new()
            }
        }
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }

    /// Process capture events one at a time until the capture channel closes,
    /// the update receiver goes away, or `shutdown_rx` fires.
    pub async fn run_loop(
        &mut self,
        bus: CompanionEnd,
        mut shutdown_rx: Option<broadcast::Receiver<()>>,
    ) {
        let CompanionEnd {
            events: mut capture_rx,
            updates: update_tx,
        } = bus;
        info!(mode = %self.mode, remote = self.engine.is_remote(), "Companion started");

        loop {
            tokio::select! {
                _ = async {
                    if let Some(ref mut rx) = shutdown_rx {
                        let _ = rx.recv().await;
                    } else {
                        std::future::pending::<()>().await;
                    }
                } => {
                    break;
                }
                event = capture_rx.recv() => {
                    match event {
                        Some(event) => {
                            if !self.handle_event(event, &update_tx).await {
                                debug!("Update receiver dropped");
                                break;
                            }
                        }
                        None => break,
                    }
                }
            }
        }

        info!(captured = self.history.len(), "Companion stopped");
    }

    /// Returns false once updates can no longer be delivered.
    async fn handle_event(&mut self, event: CaptureEvent, update_tx: &mpsc::Sender<CompanionUpdate>) -> bool {
        match event {
            CaptureEvent::Copied { content } => {
                let Some(item) = self.handle_capture(&content) else {
                    return true;
                };
                let item_id = item.id.clone();
                if update_tx.send(CompanionUpdate::Captured(item)).await.is_err() {
                    return false;
                }
                if self.mode.fetches_suggestions() {
                    let suggestions = self.suggest_latest().await;
                    return update_tx
                        .send(CompanionUpdate::Suggestions { item_id, suggestions })
                        .await
                        .is_ok();
                }
                true
            }
            CaptureEvent::SetMode(mode) => {
                self.set_mode(mode);
                update_tx.send(CompanionUpdate::ModeChanged(mode)).await.is_ok()
            }
            CaptureEvent::TogglePause => {
                let paused = self.toggle_pause();
                update_tx.send(CompanionUpdate::PauseChanged(paused)).await.is_ok()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::capture_bus;
    use crate::history::demo_items;
    use crate::intent::{LABEL_EMAIL, LABEL_GENERAL};
    use crate::suggest::tests::{MockClient, Reply};
    use bubble_core::ItemKind;
    use std::sync::atomic::Ordering;

    fn companion(mock: std::sync::Arc<MockClient>) -> Companion {
        Companion::new(&Config::default(), SuggestionEngine::new(mock))
    }

    #[test]
    fn test_handle_capture_classifies_and_stores() {
        let mut c = companion(MockClient::new(false, Reply::Empty));
        let item = c.handle_capture("a@b.com").unwrap();
        assert_eq!(item.classification.as_deref(), Some(LABEL_EMAIL));
        assert_eq!(item.source_label.as_deref(), Some("Browser Context"));
        assert_eq!(item.kind, ItemKind::Text);
        assert_eq!(c.history().head().unwrap().id, item.id);
    }

    #[test]
    fn test_handle_capture_rejects_blank_and_repeat() {
        let mut c = companion(MockClient::new(false, Reply::Empty));
        assert!(c.handle_capture("   ").is_none());
        assert!(c.handle_capture("hi").is_some());
        assert!(c.handle_capture("hi").is_none());
        assert_eq!(c.history().len(), 1);
        assert_eq!(c.history().head().unwrap().classification.as_deref(), Some(LABEL_GENERAL));
    }

    #[test]
    fn test_pause_drops_captures() {
        let mut c = companion(MockClient::new(false, Reply::Empty));
        assert!(c.toggle_pause());
        assert!(c.handle_capture("while paused").is_none());
        assert!(!c.toggle_pause());
        assert!(c.handle_capture("after resume").is_some());
        assert_eq!(c.history().len(), 1);
    }

    #[tokio::test]
    async fn test_suggest_latest_with_empty_history() {
        let mock = MockClient::new(true, Reply::Text("[]"));
        let c = companion(mock.clone());
        assert!(c.suggest_latest().await.is_empty());
        assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_suggest_latest_uses_head() {
        let mock = MockClient::new(true, Reply::Text("[]"));
        let mut c = companion(mock.clone()).with_history(HistoryLog::with_items(demo_items()));
        c.handle_capture("Simulated New Lead: Sarah Connor, Skynet Systems.");
        c.suggest_latest().await;

        let instructions = mock.instructions.lock().unwrap();
        assert_eq!(instructions.len(), 1);
        assert!(instructions[0].contains("Sarah Connor"));
    }

    #[tokio::test]
    async fn test_run_loop_suggest_mode() {
        let payload = r#"[{"action": "Create Lead", "description": "Add to CRM"}]"#;
        let mut c = companion(MockClient::new(true, Reply::Text(payload)));
        let (front, bus) = capture_bus(8);
        let (capture_tx, mut update_rx) = (front.events, front.updates);

        capture_tx.send(CaptureEvent::copied("new lead")).await.unwrap();
        capture_tx.send(CaptureEvent::copied("new lead")).await.unwrap();
        drop(capture_tx);
        c.run_loop(bus, None).await;

        let captured = match update_rx.recv().await.unwrap() {
            CompanionUpdate::Captured(item) => item,
            other => panic!("unexpected update: {:?}", other),
        };
        assert_eq!(captured.content, "new lead");

        match update_rx.recv().await.unwrap() {
            CompanionUpdate::Suggestions { item_id, suggestions } => {
                assert_eq!(item_id, captured.id);
                assert_eq!(suggestions, vec![Suggestion::new("Create Lead", "Add to CRM")]);
            }
            other => panic!("unexpected update: {:?}", other),
        }

        // the repeated copy produced nothing
        assert!(update_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_run_loop_suggestions_follow_their_capture() {
        let mut c = companion(MockClient::new(true, Reply::Text("[]")));
        let (front, bus) = capture_bus(8);
        let (capture_tx, mut update_rx) = (front.events, front.updates);

        capture_tx.send(CaptureEvent::copied("first")).await.unwrap();
        capture_tx.send(CaptureEvent::copied("second")).await.unwrap();
        drop(capture_tx);
        c.run_loop(bus, None).await;

        for expected in ["first", "second"] {
            let captured = match update_rx.recv().await.unwrap() {
                CompanionUpdate::Captured(item) => item,
                other => panic!("unexpected update: {:?}", other),
            };
            assert_eq!(captured.content, expected);
            match update_rx.recv().await.unwrap() {
                CompanionUpdate::Suggestions { item_id, .. } => assert_eq!(item_id, captured.id),
                other => panic!("unexpected update: {:?}", other),
            }
        }
        assert!(update_rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_run_loop_observe_mode_skips_suggestions() {
        let mock = MockClient::new(true, Reply::Text("[]"));
        let mut c = companion(mock.clone());
        let (front, bus) = capture_bus(8);
        let (capture_tx, mut update_rx) = (front.events, front.updates);

        capture_tx.send(CaptureEvent::SetMode(Mode::Observe)).await.unwrap();
        capture_tx.send(CaptureEvent::copied("watch only")).await.unwrap();
        capture_tx.send(CaptureEvent::TogglePause).await.unwrap();
        capture_tx.send(CaptureEvent::copied("ignored")).await.unwrap();
        drop(capture_tx);
        c.run_loop(bus, None).await;

        assert_eq!(update_rx.recv().await, Some(CompanionUpdate::ModeChanged(Mode::Observe)));
        assert!(matches!(update_rx.recv().await, Some(CompanionUpdate::Captured(_))));
        assert_eq!(update_rx.recv().await, Some(CompanionUpdate::PauseChanged(true)));
        assert!(update_rx.recv().await.is_none());
        assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
        assert_eq!(c.history().len(), 1);
    }

    #[tokio::test]
    async fn test_run_loop_stops_on_shutdown() {
        let mut c = companion(MockClient::new(false, Reply::Empty));
        let (_front, bus) = capture_bus(8);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        shutdown_tx.send(()).unwrap();
        c.run_loop(bus, Some(shutdown_rx)).await;
        assert!(c.history().is_empty());
    }
}
