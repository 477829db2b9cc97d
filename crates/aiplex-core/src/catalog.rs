//! Model catalog — the in-memory list of routable model entries.
//!
//! Lookups scan in insertion order, so when two entries share an id
//! (the built-in `gpt-4o-mini` exists as both a vision and a text model)
//! an id-only lookup returns the first one. Task-scoped lookups go through
//! [`ModelCatalog::find_for`].

use tokio::sync::RwLock;
use tracing::debug;

use crate::config::CatalogConfig;
use crate::types::{ModelEntry, ModelKind, NewModel};

/// The built-in model list, in display order.
pub fn builtin_models() -> Vec<ModelEntry> {
    use ModelKind::*;
    vec![
        ModelEntry::new("groq-mixtral", "Groq Mixtral", Text, "groq")
            .with_upstream("mixtral-8x7b-32768"),
        ModelEntry::new("hf-flux", "Hugging Face FLUX", Image, "huggingface")
            .with_upstream("black-forest-labs/FLUX.1-dev"),
        ModelEntry::new(
            "salesforce/blip-image-captioning-large",
            "BLIP Image Captioning",
            Vision,
            "huggingface",
        )
        .with_upstream("Salesforce/blip-image-captioning-large"),
        ModelEntry::new("gpt-4o-mini", "GPT-4o-mini Vision", Vision, "openai")
            .with_upstream("gpt-4o-mini"),
        ModelEntry::new("gpt-4o-mini", "GPT-4o-mini", Text, "openai").with_upstream("gpt-4o-mini"),
        ModelEntry::new("openai-dalle3", "OpenAI DALL-E 3", Image, "openai")
            .with_upstream("dall-e-3"),
        ModelEntry::new("mistral-large", "Mistral Large", Text, "mistral")
            .with_upstream("mistral-large-latest"),
        ModelEntry::new("elevenlabs-tts", "ElevenLabs TTS", Audio, "elevenlabs")
            .with_upstream("21m00Tcm4TlvDq8ikWAM"),
        ModelEntry::new("claude-3-haiku-20240307", "Claude 3 Haiku", Text, "anthropic")
            .with_upstream("claude-3-haiku-20240307"),
        ModelEntry::new("claude-3-5-sonnet-20240620", "Claude 3.5 Sonnet", Text, "anthropic")
            .with_upstream("claude-3-5-sonnet-20240620"),
        ModelEntry::new("claude-3-opus-20240229", "Claude 3 Opus", Text, "anthropic")
            .with_upstream("claude-3-opus-20240229"),
        ModelEntry::new("gemini-pro", "Gemini Pro", Text, "google").with_upstream("gemini-pro"),
        ModelEntry::new(
            "stabilityai/stable-video-diffusion-img2vid-xt",
            "Stable Video Diffusion",
            Video,
            "huggingface",
        )
        .with_upstream("stabilityai/stable-video-diffusion-img2vid-xt"),
        ModelEntry::new("whisper-1", "OpenAI Whisper", Transcription, "openai")
            .with_upstream("whisper-1"),
        ModelEntry::new("whisper-large-v3", "Groq Whisper", Transcription, "groq")
            .with_upstream("whisper-large-v3"),
    ]
}

/// In-memory model catalog, shared across request handlers.
pub struct ModelCatalog {
    entries: RwLock<Vec<ModelEntry>>,
}

impl ModelCatalog {
    /// Create a catalog holding exactly `entries`.
    pub fn new(entries: Vec<ModelEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Build the startup catalog: built-ins (unless disabled) followed by
    /// the configured extra entries.
    pub fn from_config(config: &CatalogConfig) -> Self {
        let mut entries = if config.seed_builtin {
            builtin_models()
        } else {
            Vec::new()
        };
        entries.extend(config.extra.iter().cloned());
        debug!(models = entries.len(), "model catalog initialized");
        Self::new(entries)
    }

    /// All entries in insertion order.
    pub async fn list(&self) -> Vec<ModelEntry> {
        self.entries.read().await.clone()
    }

    /// First entry with this id, regardless of task.
    pub async fn get(&self, id: &str) -> Option<ModelEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|m| m.id == id)
            .cloned()
    }

    /// Entry with this id serving `kind`.
    pub async fn find_for(&self, id: &str, kind: ModelKind) -> Option<ModelEntry> {
        self.entries
            .read()
            .await
            .iter()
            .find(|m| m.id == id && m.kind == kind)
            .cloned()
    }

    /// Append a new entry under a freshly generated id.
    pub async fn add(&self, model: NewModel) -> ModelEntry {
        let entry = ModelEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name: model.name,
            kind: model.kind,
            provider: model.provider,
            upstream: model.upstream.filter(|u| !u.trim().is_empty()),
        };
        self.entries.write().await.push(entry.clone());
        debug!(id = %entry.id, name = %entry.name, kind = %entry.kind, "model added");
        entry
    }

    /// Remove every entry with this id. Returns whether anything was removed.
    pub async fn remove(&self, id: &str) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|m| m.id != id);
        let removed = entries.len() != before;
        debug!(id, removed, "model remove");
        removed
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the catalog is empty.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn new_model(name: &str, kind: ModelKind, provider: &str) -> NewModel {
        NewModel {
            name: name.to_string(),
            kind,
            provider: provider.to_string(),
            upstream: None,
        }
    }

    #[test]
    fn test_builtin_catalog_shape() {
        let models = builtin_models();
        assert_eq!(models.len(), 15);
        assert_eq!(models[0].id, "groq-mixtral");
        assert!(models.iter().all(|m| m.upstream.is_some()));
        assert!(models
            .iter()
            .any(|m| m.kind == ModelKind::Video && m.provider == "huggingface"));
    }

    #[tokio::test]
    async fn test_get_returns_first_duplicate() {
        let catalog = ModelCatalog::new(builtin_models());
        let entry = catalog.get("gpt-4o-mini").await.unwrap();
        assert_eq!(entry.kind, ModelKind::Vision);
    }

    #[tokio::test]
    async fn test_find_for_scopes_by_kind() {
        let catalog = ModelCatalog::new(builtin_models());
        let text = catalog.find_for("gpt-4o-mini", ModelKind::Text).await.unwrap();
        assert_eq!(text.name, "GPT-4o-mini");
        assert!(catalog.find_for("hf-flux", ModelKind::Video).await.is_none());
    }

    #[tokio::test]
    async fn test_add_generates_unique_ids() {
        let catalog = ModelCatalog::new(Vec::new());
        let a = catalog.add(new_model("A", ModelKind::Text, "groq")).await;
        let b = catalog.add(new_model("B", ModelKind::Text, "groq")).await;
        assert_ne!(a.id, b.id);
        assert_eq!(catalog.len().await, 2);
        assert_eq!(catalog.list().await[1].name, "B");
    }

    #[tokio::test]
    async fn test_add_drops_blank_upstream() {
        let catalog = ModelCatalog::new(Vec::new());
        let mut model = new_model("Blank", ModelKind::Image, "openai");
        model.upstream = Some("  ".to_string());
        let entry = catalog.add(model).await;
        assert!(entry.upstream.is_none());
    }

    #[tokio::test]
    async fn test_remove() {
        let catalog = ModelCatalog::new(builtin_models());
        assert!(catalog.remove("gpt-4o-mini").await);
        // Both entries sharing the id are gone
        assert!(catalog.get("gpt-4o-mini").await.is_none());
        assert_eq!(catalog.len().await, 13);
        // Unknown id is not an error
        assert!(!catalog.remove("does-not-exist").await);
    }

    #[tokio::test]
    async fn test_from_config_without_builtins() {
        let config = CatalogConfig {
            seed_builtin: false,
            extra: vec![ModelEntry::new("x", "X", ModelKind::Audio, "elevenlabs")],
        };
        let catalog = ModelCatalog::from_config(&config);
        let models = catalog.list().await;
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "x");
        assert!(!catalog.is_empty().await);
    }

    #[tokio::test]
    async fn test_from_config_appends_extra() {
        let config = CatalogConfig {
            seed_builtin: true,
            extra: vec![ModelEntry::new("x", "X", ModelKind::Audio, "elevenlabs")],
        };
        let catalog = ModelCatalog::from_config(&config);
        assert_eq!(catalog.len().await, 16);
        assert_eq!(catalog.list().await.last().unwrap().id, "x");
    }
}
