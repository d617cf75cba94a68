use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::discord::DiscordUser;
use crate::types::{FormId, ResponseId};

/// A form definition as stored in the document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Behaviour flags, e.g. `OPEN` while the form accepts responses.
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// One question inside a form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub name: String,
    /// Input type rendered by the frontend (`shorttext`, `select`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Type-specific configuration, opaque to the backend.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// A stored submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormResponse {
    pub id: ResponseId,
    pub form_id: FormId,
    /// Profile snapshot of the submitting user, taken from their session.
    pub user: DiscordUser,
    pub timestamp: DateTime<Utc>,
    /// Answers keyed by question id, opaque to the backend.
    pub response: serde_json::Map<String, serde_json::Value>,
}
