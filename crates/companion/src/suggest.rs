use std::sync::Arc;

use bubble_core::{CapturedItem, Error, Result, Suggestion};
use bubble_providers::IntelligenceClient;
use serde_json::Value;
use tracing::{debug, info, warn};

pub const LOCAL_MODE_ACTION: &str = "Local Mode";
pub const LOCAL_MODE_DESCRIPTION: &str = "Set API_KEY to enable AI mapping.";
pub const ERROR_ACTION: &str = "Error";
pub const ERROR_DESCRIPTION: &str = "Failed to reach intelligence layer.";

/// Turns the latest capture into a short list of suggested actions.
///
/// Never fails from the caller's point of view: a missing credential yields
/// the "Local Mode" placeholder and any remote failure yields the "Error"
/// placeholder. Calls are neither deduplicated nor cancelled.
pub struct SuggestionEngine {
    client: Arc<dyn IntelligenceClient>,
}

impl SuggestionEngine {
    pub fn new(client: Arc<dyn IntelligenceClient>) -> Self {
        Self { client }
    }

    pub fn is_remote(&self) -> bool {
        self.client.is_configured()
    }

    pub async fn suggest(&self, latest_content: &str) -> Vec<Suggestion> {
        self.run(latest_content, None).await
    }

    /// Like `suggest`, but names the item's source as the active application.
    pub async fn suggest_for(&self, item: &CapturedItem) -> Vec<Suggestion> {
        self.run(&item.content, item.source_label.as_deref()).await
    }

    async fn run(&self, content: &str, active_app: Option<&str>) -> Vec<Suggestion> {
        if !self.client.is_configured() {
            debug!("No API key configured, returning local-mode suggestion");
            return vec![Suggestion::new(LOCAL_MODE_ACTION, LOCAL_MODE_DESCRIPTION)];
        }

        match self.fetch(content, active_app).await {
            Ok(suggestions) => {
                info!(count = suggestions.len(), "Suggestions received");
                suggestions
            }
            Err(e) => {
                warn!(error = %e, "Suggestion request failed");
                vec![Suggestion::new(ERROR_ACTION, ERROR_DESCRIPTION)]
            }
        }
    }

    async fn fetch(&self, content: &str, active_app: Option<&str>) -> Result<Vec<Suggestion>> {
        let instruction = build_instruction(content, active_app);
        let body = self
            .client
            .generate_structured(&instruction, &suggestion_schema())
            .await?;

        match body {
            Some(text) if !text.trim().is_empty() => {
                serde_json::from_str::<Vec<Suggestion>>(&text).map_err(|e| {
                    Error::Provider(format!("Suggestion payload is not an action list: {}", e))
                })
            }
            _ => Ok(Vec::new()),
        }
    }
}

pub fn build_instruction(content: &str, active_app: Option<&str>) -> String {
    match active_app.map(str::trim).filter(|a| !a.is_empty()) {
        Some(app) => format!(
            "The user copied: \"{}\". The current application window is \"{}\". Suggest 3 useful automation actions.",
            content, app
        ),
        None => format!(
            "The user copied: \"{}\". Suggest 3 useful automation actions.",
            content
        ),
    }
}

/// Response schema: an array of `{action, description}` string objects.
pub fn suggestion_schema() -> Value {
    serde_json::json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "action": { "type": "STRING" },
                "description": { "type": "STRING" }
            },
            "required": ["action", "description"]
        }
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use async_trait::async_trait;
    use bubble_core::ItemKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    pub(crate) enum Reply {
        Text(&'static str),
        Empty,
        Fail,
    }

    pub(crate) struct MockClient {
        configured: bool,
        reply: Reply,
        pub calls: AtomicUsize,
        pub instructions: Mutex<Vec<String>>,
    }

    impl MockClient {
        pub(crate) fn new(configured: bool, reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                configured,
                reply,
                calls: AtomicUsize::new(0),
                instructions: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl IntelligenceClient for MockClient {
        fn is_configured(&self) -> bool {
            self.configured
        }

        async fn generate_structured(&self, instruction: &str, _schema: &Value) -> Result<Option<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.instructions.lock().unwrap().push(instruction.to_string());
            match self.reply {
                Reply::Text(t) => Ok(Some(t.to_string())),
                Reply::Empty => Ok(None),
                Reply::Fail => Err(Error::Provider("connection refused".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_local_mode_without_credential() {
        let mock = MockClient::new(false, Reply::Text("[]"));
        let engine = SuggestionEngine::new(mock.clone());

        for content in ["a@b.com", "anything else"] {
            let out = engine.suggest(content).await;
            assert_eq!(out, vec![Suggestion::new("Local Mode", "Set API_KEY to enable AI mapping.")]);
        }
        assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
        assert!(!engine.is_remote());
    }

    #[tokio::test]
    async fn test_remote_failure_becomes_error_suggestion() {
        let mock = MockClient::new(true, Reply::Fail);
        let engine = SuggestionEngine::new(mock.clone());
        let out = engine.suggest("hello").await;
        assert_eq!(out, vec![Suggestion::new("Error", "Failed to reach intelligence layer.")]);
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_malformed_payload_becomes_error_suggestion() {
        let mock = MockClient::new(true, Reply::Text("{\"action\": \"not a list\"}"));
        let engine = SuggestionEngine::new(mock);
        let out = engine.suggest("hello").await;
        assert_eq!(out, vec![Suggestion::new(ERROR_ACTION, ERROR_DESCRIPTION)]);
    }

    #[tokio::test]
    async fn test_empty_body_yields_no_suggestions() {
        let engine = SuggestionEngine::new(MockClient::new(true, Reply::Empty));
        assert!(engine.suggest("hello").await.is_empty());

        let engine = SuggestionEngine::new(MockClient::new(true, Reply::Text("   ")));
        assert!(engine.suggest("hello").await.is_empty());
    }

    #[tokio::test]
    async fn test_remote_order_is_preserved() {
        let payload = r#"[
            {"action": "Create Lead", "description": "Add Sarah Connor to the CRM"},
            {"action": "Draft Email", "description": "Write an intro email"},
            {"action": "Schedule Call", "description": "Book a follow-up"},
            {"action": "Tag Company", "description": "Tag Skynet Systems"}
        ]"#;
        let mock = MockClient::new(true, Reply::Text(payload));
        let engine = SuggestionEngine::new(mock.clone());
        let out = engine.suggest("Sarah Connor, Skynet Systems").await;

        let actions: Vec<&str> = out.iter().map(|s| s.action.as_str()).collect();
        assert_eq!(actions, vec!["Create Lead", "Draft Email", "Schedule Call", "Tag Company"]);

        let instructions = mock.instructions.lock().unwrap();
        assert_eq!(instructions.len(), 1);
        assert!(instructions[0].contains("\"Sarah Connor, Skynet Systems\""));
        assert!(!instructions[0].contains("application window"));
    }

    #[tokio::test]
    async fn test_suggest_for_names_source_application() {
        let mock = MockClient::new(true, Reply::Text("[]"));
        let engine = SuggestionEngine::new(mock.clone());
        let item = CapturedItem::new("lead info", ItemKind::Text).with_source("Outlook");
        assert!(engine.suggest_for(&item).await.is_empty());

        let instructions = mock.instructions.lock().unwrap();
        assert!(instructions[0].contains("The current application window is \"Outlook\""));
    }

    #[test]
    fn test_schema_shape() {
        let schema = suggestion_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["properties"]["action"]["type"], "STRING");
    }
}
