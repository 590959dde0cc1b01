use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a captured item holds. Text captures are refined into `Code` or
/// `FormData` by the companion's kind heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    #[default]
    Text,
    Image,
    Code,
    FormData,
}

impl ItemKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Text => "text",
            ItemKind::Image => "image",
            ItemKind::Code => "code",
            ItemKind::FormData => "form-data",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single clipboard capture as stored in the history log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedItem {
    pub id: String,
    pub content: String,
    pub captured_at: DateTime<Utc>,
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}

impl CapturedItem {
    pub fn new(content: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            captured_at: Utc::now(),
            kind,
            source_label: None,
            classification: None,
        }
    }

    pub fn with_source(mut self, label: impl Into<String>) -> Self {
        self.source_label = Some(label.into());
        self
    }

    pub fn with_classification(mut self, label: impl Into<String>) -> Self {
        self.classification = Some(label.into());
        self
    }
}

/// One suggested follow-up action for the latest capture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub action: String,
    pub description: String,
}

impl Suggestion {
    pub fn new(action: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            description: description.into(),
        }
    }
}

/// Operating mode of the companion.
///
/// `Observe` only captures and classifies. `Suggest` and `Apply` also fetch
/// suggestions for every accepted capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Observe,
    #[default]
    Suggest,
    Apply,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Observe => "observe",
            Mode::Suggest => "suggest",
            Mode::Apply => "apply",
        }
    }

    pub fn fetches_suggestions(&self) -> bool {
        !matches!(self, Mode::Observe)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "observe" => Ok(Mode::Observe),
            "suggest" => Ok(Mode::Suggest),
            "apply" => Ok(Mode::Apply),
            other => Err(crate::Error::Config(format!(
                "unknown mode '{}' (expected observe, suggest or apply)",
                other
            ))),
        }
    }
}

/// A named automation recipe shown next to the capture history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedFlow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
}

impl SavedFlow {
    fn new(id: &str, name: &str, description: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
        }
    }

    pub fn builtin() -> Vec<SavedFlow> {
        vec![
            Self::new("1", "CRM Auto-Fill", "Maps lead info to Salesforce fields", "Database"),
            Self::new("2", "Expense Reporter", "Extracts data from receipts to SAP", "ReceiptText"),
            Self::new("3", "Admin Onboarding", "Copies user data into HR systems", "UserPlus"),
        ]
    }
}
