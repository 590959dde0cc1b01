use std::sync::Arc;

use bubble_core::{Config, Error, Result};
use tracing::debug;

use crate::{GeminiClient, IntelligenceClient};

/// Infer the provider name from a model string prefix.
/// Returns None when the prefix is not recognized.
pub fn infer_provider_from_model(model: &str) -> Option<&'static str> {
    if model.starts_with("gemini/") || model.starts_with("gemini-") {
        Some("gemini")
    } else if model.starts_with("anthropic/") || model.starts_with("claude-") {
        Some("anthropic")
    } else if model.starts_with("openai/") || model.starts_with("gpt-") {
        Some("openai")
    } else {
        None
    }
}

/// Build the intelligence client described by `config`.
///
/// A missing credential is not an error: the returned client reports
/// `is_configured() == false` and the suggestion engine stays local.
/// Models that name a provider other than Gemini are rejected.
pub fn create_client(config: &Config) -> Result<Arc<dyn IntelligenceClient>> {
    let model = config.companion.model.trim();
    if model.is_empty() {
        return Err(Error::Config("companion.model must not be empty".to_string()));
    }

    match infer_provider_from_model(model) {
        Some("gemini") | None => {}
        Some(other) => {
            return Err(Error::Config(format!(
                "model '{}' belongs to provider '{}', only gemini models are supported",
                model, other
            )));
        }
    }

    let api_key = config.api_key();
    debug!(
        model = %model,
        has_key = api_key.is_some(),
        "Creating Gemini client"
    );

    Ok(Arc::new(GeminiClient::new(
        api_key.as_deref(),
        config.api_base(),
        model,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_provider() {
        assert_eq!(infer_provider_from_model("gemini-3-flash-preview"), Some("gemini"));
        assert_eq!(infer_provider_from_model("gemini/gemini-2.0-flash"), Some("gemini"));
        assert_eq!(infer_provider_from_model("gpt-4o"), Some("openai"));
        assert_eq!(infer_provider_from_model("my-local-model"), None);
    }

    #[test]
    fn test_rejects_foreign_model() {
        let mut config = Config::default();
        config.companion.model = "claude-sonnet".to_string();
        assert!(matches!(create_client(&config), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_empty_model() {
        let mut config = Config::default();
        config.companion.model = "  ".to_string();
        assert!(create_client(&config).is_err());
    }

    #[test]
    fn test_configured_key_enables_client() {
        let mut config = Config::default();
        config.set_api_key("file-key");
        let client = create_client(&config).unwrap();
        assert!(client.is_configured());
    }
}
