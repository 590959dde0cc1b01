pub mod factory;
pub mod gemini;

use async_trait::async_trait;
use bubble_core::Result;
use serde_json::Value;

/// A remote generative text service that can answer with JSON constrained
/// to a declared schema.
#[async_trait]
pub trait IntelligenceClient: Send + Sync {
    /// Whether a credential is available. Callers must not issue requests
    /// against an unconfigured client.
    fn is_configured(&self) -> bool;

    /// Send one instruction and return the raw response text, or `None`
    /// when the service answered without any text.
    async fn generate_structured(&self, instruction: &str, schema: &Value) -> Result<Option<String>>;
}

pub use factory::{create_client, infer_provider_from_model};
pub use gemini::GeminiClient;
