//! API key store — in-memory, looked up on every provider call.
//!
//! Keys are never cached inside provider clients, so a key posted through
//! the API is used by the very next request.

use tokio::sync::RwLock;
use tracing::debug;

use crate::types::{ApiKeyEntry, KeySummary, NewApiKey};

/// In-memory API key store.
pub struct KeyStore {
    entries: RwLock<Vec<ApiKeyEntry>>,
}

impl KeyStore {
    /// Create a store seeded with `entries`.
    pub fn new(entries: Vec<ApiKeyEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Redacted list of all keys, in insertion order.
    pub async fn list(&self) -> Vec<KeySummary> {
        self.entries
            .read()
            .await
            .iter()
            .map(ApiKeyEntry::summary)
            .collect()
    }

    /// Store a new key under a generated id.
    pub async fn add(&self, key: NewApiKey) -> KeySummary {
        let entry = ApiKeyEntry {
            id: uuid::Uuid::new_v4().to_string(),
            name: key.name,
            value: key.value,
        };
        let summary = entry.summary();
        self.entries.write().await.push(entry);
        debug!(id = %summary.id, name = %summary.name, "api key added");
        summary
    }

    /// Remove every key with this id. Returns whether anything was removed.
    pub async fn remove(&self, id: &str) -> bool {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|k| k.id != id);
        entries.len() != before
    }

    /// Resolve the key for a provider.
    ///
    /// Matches entries whose id equals `key_id` or whose name equals
    /// `display_name` (case-insensitive), skips empty values, and returns the
    /// most recently added match.
    pub async fn resolve(&self, key_id: &str, display_name: &str) -> Option<String> {
        self.entries
            .read()
            .await
            .iter()
            .rev()
            .find(|k| {
                !k.value.is_empty()
                    && (k.id == key_id || k.name.eq_ignore_ascii_case(display_name))
            })
            .map(|k| k.value.clone())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, name: &str, value: &str) -> ApiKeyEntry {
        ApiKeyEntry {
            id: id.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    #[tokio::test]
    async fn test_resolve_by_id() {
        let store = KeyStore::new(vec![entry("gemini", "Gemini", "AIza-1")]);
        assert_eq!(store.resolve("gemini", "Gemini").await.as_deref(), Some("AIza-1"));
        assert!(store.resolve("openai", "OpenAI").await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_skips_empty_seed() {
        let store = KeyStore::new(vec![entry("openai", "OpenAI", "")]);
        assert!(store.resolve("openai", "OpenAI").await.is_none());

        // A posted key with the same display name fills the gap
        store
            .add(NewApiKey {
                name: "openai".into(),
                value: "sk-posted".into(),
            })
            .await;
        assert_eq!(
            store.resolve("openai", "OpenAI").await.as_deref(),
            Some("sk-posted")
        );
    }

    #[tokio::test]
    async fn test_resolve_prefers_latest() {
        let store = KeyStore::new(vec![entry("groq", "Groq", "gsk-env")]);
        store
            .add(NewApiKey {
                name: "Groq".into(),
                value: "gsk-new".into(),
            })
            .await;
        assert_eq!(store.resolve("groq", "Groq").await.as_deref(), Some("gsk-new"));
    }

    #[tokio::test]
    async fn test_list_is_redacted_and_remove_works() {
        let store = KeyStore::new(vec![entry("mistral", "Mistral AI", "m-1")]);
        let added = store
            .add(NewApiKey {
                name: "Mistral AI".into(),
                value: "m-2".into(),
            })
            .await;

        let listed = store.list().await;
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1], added);

        assert!(store.remove(&added.id).await);
        assert_eq!(
            store.resolve("mistral", "Mistral AI").await.as_deref(),
            Some("m-1")
        );
        assert!(!store.remove("missing").await);
    }
}
