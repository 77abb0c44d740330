//! Advisory models
//!
//! `AdvisoryContent` is what the AI service produces, `AdvisoryRecord` is what
//! gets persisted, and `AdvisoryResult` is what callers render.

use serde::{Deserialize, Serialize};

/// Urgency of an advisory
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertLevel::Low => write!(f, "LOW"),
            AlertLevel::Medium => write!(f, "MEDIUM"),
            AlertLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Advisory body in the shape the AI service is asked to return
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryContent {
    #[serde(alias = "advisoryTitle")]
    pub title: String,
    /// Usually three items; the count is requested, not enforced
    pub action_items: Vec<String>,
    pub alert_level: AlertLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_message: Option<String>,
    pub reasoning: String,
}

/// Persisted advisory: content plus the time it was fetched
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryRecord {
    #[serde(flatten)]
    pub content: AdvisoryContent,
    #[serde(alias = "timestamp")]
    pub fetched_at_epoch_millis: i64,
}

impl AdvisoryRecord {
    /// Rehydrate a saved advisory; the original fetch time is kept
    pub fn into_cached(self) -> AdvisoryResult {
        AdvisoryResult {
            content: self.content,
            fetched_at_epoch_millis: Some(self.fetched_at_epoch_millis),
            is_from_cache: true,
        }
    }
}

/// Advisory as handed to the presentation layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AdvisoryResult {
    #[serde(flatten)]
    pub content: AdvisoryContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at_epoch_millis: Option<i64>,
    #[serde(default, alias = "isOfflineData")]
    pub is_from_cache: bool,
}

impl AdvisoryResult {
    /// A result straight from the AI service
    pub fn fresh(content: AdvisoryContent, fetched_at_epoch_millis: i64) -> Self {
        Self {
            content,
            fetched_at_epoch_millis: Some(fetched_at_epoch_millis),
            is_from_cache: false,
        }
    }

    /// Shown when offline with nothing saved. Never persisted.
    pub fn no_connection_placeholder() -> Self {
        Self {
            content: AdvisoryContent {
                title: "No Connection & No Data".to_string(),
                action_items: vec![
                    "Please connect to the internet to download initial advisories.".to_string(),
                ],
                alert_level: AlertLevel::Low,
                alert_message: None,
                reasoning: "Offline mode requires at least one previous successful sync."
                    .to_string(),
            },
            fetched_at_epoch_millis: None,
            is_from_cache: true,
        }
    }

    /// Shown when the AI service failed and nothing is saved. Never persisted.
    pub fn service_unreachable_placeholder() -> Self {
        Self {
            content: AdvisoryContent {
                title: "Service Unreachable".to_string(),
                action_items: vec![
                    "Check internet connection.".to_string(),
                    "Try again later.".to_string(),
                ],
                alert_level: AlertLevel::Low,
                alert_message: None,
                reasoning: "Server connection failed.".to_string(),
            },
            fetched_at_epoch_millis: None,
            is_from_cache: false,
        }
    }

    /// Replace the alert message with a note that saved data is being shown
    pub fn with_fallback_notice(mut self, reason: &str) -> Self {
        self.content.alert_message = Some(format!("Using saved data ({})", reason));
        self
    }

    /// The persistable form; placeholders have no fetch time and yield `None`
    pub fn to_record(&self) -> Option<AdvisoryRecord> {
        self.fetched_at_epoch_millis.map(|fetched_at| AdvisoryRecord {
            content: self.content.clone(),
            fetched_at_epoch_millis: fetched_at,
        })
    }

    /// How old the advisory is relative to `now_millis`
    pub fn age_millis(&self, now_millis: i64) -> Option<i64> {
        self.fetched_at_epoch_millis
            .map(|fetched_at| now_millis.saturating_sub(fetched_at).max(0))
    }
}
