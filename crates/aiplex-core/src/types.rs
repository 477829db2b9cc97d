//! Core types for Aiplex — model entries, API key records and usage snapshots.
//!
//! These are the shapes the HTTP API speaks. JSON uses camelCase keys except
//! for the model entry's `type` field, which keeps its wire name.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ─────────────────────────────────────────────
// Model kind (task)
// ─────────────────────────────────────────────

/// The task a model entry is used for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// Chat / text completion.
    Text,
    /// Text-to-image generation.
    Image,
    /// Image question answering / captioning.
    Vision,
    /// Image-to-video generation.
    Video,
    /// Text-to-speech.
    Audio,
    /// Speech-to-text.
    Transcription,
}

impl ModelKind {
    /// All kinds, in display order.
    pub const ALL: [ModelKind; 6] = [
        ModelKind::Text,
        ModelKind::Image,
        ModelKind::Vision,
        ModelKind::Video,
        ModelKind::Audio,
        ModelKind::Transcription,
    ];

    /// Wire name (`"text"`, `"image"`, …).
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Text => "text",
            ModelKind::Image => "image",
            ModelKind::Vision => "vision",
            ModelKind::Video => "video",
            ModelKind::Audio => "audio",
            ModelKind::Transcription => "transcription",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModelKind::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown model type '{s}'"))
    }
}

// ─────────────────────────────────────────────
// Model entries
// ─────────────────────────────────────────────

/// A routable model: which provider serves it and for which task.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    /// Provider name as used by the registry (`"openai"`, `"google"`, …).
    /// Kept as a free string so unknown providers survive a round trip.
    pub provider: String,
    /// Model identifier sent upstream. Falls back to the provider's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
}

impl ModelEntry {
    /// Create an entry without an explicit upstream model.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        kind: ModelKind,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
            provider: provider.into(),
            upstream: None,
        }
    }

    /// Attach the upstream model identifier.
    pub fn with_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.upstream = Some(upstream.into());
        self
    }
}

/// Body of `POST /api/models`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewModel {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ModelKind,
    pub provider: String,
    #[serde(default)]
    pub upstream: Option<String>,
}

// ─────────────────────────────────────────────
// API keys
// ─────────────────────────────────────────────

/// A stored API key. The value never leaves the process through the API.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiKeyEntry {
    pub id: String,
    pub name: String,
    pub value: String,
}

impl ApiKeyEntry {
    /// Redacted view for listing.
    pub fn summary(&self) -> KeySummary {
        KeySummary {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Public view of a key: id and display name only.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct KeySummary {
    pub id: String,
    pub name: String,
}

/// Body of `POST /api/keys`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewApiKey {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

// ─────────────────────────────────────────────
// Usage
// ─────────────────────────────────────────────

/// Snapshot of usage counters since process start.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageStats {
    pub total_calls: u64,
    pub total_cost: f64,
    /// Calls per model display name.
    pub by_model: BTreeMap<String, u64>,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_kind_wire_names() {
        assert_eq!(serde_json::to_value(ModelKind::Text).unwrap(), "text");
        assert_eq!(
            serde_json::to_value(ModelKind::Transcription).unwrap(),
            "transcription"
        );
        let kind: ModelKind = serde_json::from_str("\"vision\"").unwrap();
        assert_eq!(kind, ModelKind::Vision);
    }

    #[test]
    fn test_model_kind_from_str() {
        assert_eq!("IMAGE".parse::<ModelKind>().unwrap(), ModelKind::Image);
        assert!("hologram".parse::<ModelKind>().is_err());
    }

    #[test]
    fn test_model_entry_json_shape() {
        let entry = ModelEntry::new("gemini-pro", "Gemini Pro", ModelKind::Text, "google");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "text");
        assert_eq!(json["provider"], "google");
        // No upstream → field omitted
        assert!(json.get("upstream").is_none());

        let with = entry.with_upstream("gemini-1.5-pro");
        let json = serde_json::to_value(&with).unwrap();
        assert_eq!(json["upstream"], "gemini-1.5-pro");
    }

    #[test]
    fn test_new_model_without_upstream() {
        let body: NewModel = serde_json::from_value(serde_json::json!({
            "name": "My Llama",
            "type": "text",
            "provider": "groq"
        }))
        .unwrap();
        assert_eq!(body.kind, ModelKind::Text);
        assert!(body.upstream.is_none());
    }

    #[test]
    fn test_usage_stats_camel_case() {
        let mut stats = UsageStats::default();
        stats.by_model.insert("Gemini Pro".into(), 2);
        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("totalCalls").is_some());
        assert!(json.get("totalCost").is_some());
        assert_eq!(json["byModel"]["Gemini Pro"], 2);
    }

    #[test]
    fn test_key_summary_hides_value() {
        let entry = ApiKeyEntry {
            id: "openai".into(),
            name: "OpenAI".into(),
            value: "sk-secret".into(),
        };
        let json = serde_json::to_string(&entry.summary()).unwrap();
        assert!(!json.contains("sk-secret"));
    }
}
