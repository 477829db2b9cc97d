//! Provider registry — static specs for all 7 supported providers.
//!
//! Each `ProviderSpec` describes how to reach a provider: which wire protocol
//! it speaks, where its API lives, which key authenticates it, which tasks it
//! serves and what each call is booked as in the usage counters.

use aiplex_core::config::ProvidersConfig;
use aiplex_core::{ApiKeyEntry, ModelEntry, ModelKind};

// ─────────────────────────────────────────────
// ProviderSpec — static metadata for one provider
// ─────────────────────────────────────────────

/// Wire protocol spoken by a provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApiStyle {
    /// `/chat/completions`, `/images/generations`, `/audio/transcriptions`.
    OpenAiCompatible,
    /// `/v1/messages` with `x-api-key`.
    Anthropic,
    /// `models/{model}:generateContent?key=…`.
    Gemini,
    /// Serverless inference API, `models/{model}` with raw payloads.
    HuggingFace,
    /// `text-to-speech/{voice}` with `xi-api-key`.
    ElevenLabs,
}

/// Example per-call costs (USD). `None` means the task is not implemented
/// for this provider.
#[derive(Clone, Copy, Debug, Default)]
pub struct TaskCosts {
    pub text: Option<f64>,
    pub image: Option<f64>,
    pub vision: Option<f64>,
    pub video: Option<f64>,
    pub audio: Option<f64>,
    pub transcription: Option<f64>,
}

const NO_COSTS: TaskCosts = TaskCosts {
    text: None,
    image: None,
    vision: None,
    video: None,
    audio: None,
    transcription: None,
};

/// Cost booked for chat with a provider that has no chat implementation.
pub const FALLBACK_CHAT_COST: f64 = 0.01;

/// Static specification describing one provider.
#[derive(Clone, Debug)]
pub struct ProviderSpec {
    /// Registry name used in model entries (e.g. `"google"`).
    pub name: &'static str,
    /// Id of the seeded key-store entry (e.g. `"gemini"`).
    pub key_id: &'static str,
    /// Human-readable name; also the key-store entry name.
    pub display_name: &'static str,
    /// Name used in user-facing failure messages.
    pub api_label: &'static str,
    /// Environment variable holding the API key.
    pub env_key: &'static str,
    /// Keywords to match in free-form model names (lowercase).
    pub keywords: &'static [&'static str],
    /// Wire protocol.
    pub api_style: ApiStyle,
    /// Default API base URL.
    pub default_api_base: &'static str,
    /// Upstream model used when an entry carries none.
    pub default_models: &'static [(ModelKind, &'static str)],
    /// Supported tasks and their example costs.
    pub costs: TaskCosts,
}

impl ProviderSpec {
    /// Example cost for one call of `kind`, or `None` if unsupported.
    pub fn cost(&self, kind: ModelKind) -> Option<f64> {
        match kind {
            ModelKind::Text => self.costs.text,
            ModelKind::Image => self.costs.image,
            ModelKind::Vision => self.costs.vision,
            ModelKind::Video => self.costs.video,
            ModelKind::Audio => self.costs.audio,
            ModelKind::Transcription => self.costs.transcription,
        }
    }

    /// Whether this provider implements `kind`.
    pub fn supports(&self, kind: ModelKind) -> bool {
        self.cost(kind).is_some()
    }

    /// Default upstream model for `kind`.
    pub fn default_model(&self, kind: ModelKind) -> Option<&'static str> {
        self.default_models
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, m)| *m)
    }
}

// ─────────────────────────────────────────────
// All 7 providers (in key-store seeding order)
// ─────────────────────────────────────────────

/// Complete list of supported provider specifications.
pub static PROVIDERS: &[ProviderSpec] = &[
    ProviderSpec {
        name: "groq",
        key_id: "groq",
        display_name: "Groq",
        api_label: "Groq",
        env_key: "GROQ_API_KEY",
        keywords: &["groq", "llama"],
        api_style: ApiStyle::OpenAiCompatible,
        default_api_base: "https://api.groq.com/openai/v1",
        default_models: &[
            (ModelKind::Text, "mixtral-8x7b-32768"),
            (ModelKind::Transcription, "whisper-large-v3"),
        ],
        costs: TaskCosts {
            text: Some(0.01),
            transcription: Some(0.002),
            ..NO_COSTS
        },
    },
    ProviderSpec {
        name: "huggingface",
        key_id: "huggingface",
        display_name: "HuggingFace",
        api_label: "Hugging Face",
        env_key: "HUGGINGFACE_API_KEY",
        keywords: &["huggingface"],
        api_style: ApiStyle::HuggingFace,
        default_api_base: "https://api-inference.huggingface.co",
        default_models: &[
            (ModelKind::Image, "black-forest-labs/FLUX.1-dev"),
            (ModelKind::Vision, "Salesforce/blip-image-captioning-large"),
            (ModelKind::Video, "stabilityai/stable-video-diffusion-img2vid-xt"),
        ],
        costs: TaskCosts {
            image: Some(0.05),
            vision: Some(0.01),
            video: Some(0.5),
            ..NO_COSTS
        },
    },
    ProviderSpec {
        name: "openai",
        key_id: "openai",
        display_name: "OpenAI",
        api_label: "OpenAI",
        env_key: "OPENAI_API_KEY",
        keywords: &["openai", "gpt", "dall-e", "whisper"],
        api_style: ApiStyle::OpenAiCompatible,
        default_api_base: "https://api.openai.com/v1",
        default_models: &[
            (ModelKind::Text, "gpt-4o-mini"),
            (ModelKind::Vision, "gpt-4o-mini"),
            (ModelKind::Image, "dall-e-3"),
            (ModelKind::Transcription, "whisper-1"),
        ],
        costs: TaskCosts {
            text: Some(0.03),
            image: Some(0.1),
            vision: Some(0.02),
            transcription: Some(0.006),
            ..NO_COSTS
        },
    },
    ProviderSpec {
        name: "google",
        key_id: "gemini",
        display_name: "Gemini",
        api_label: "Gemini",
        env_key: "GEMINI_API_KEY",
        keywords: &["gemini", "google"],
        api_style: ApiStyle::Gemini,
        default_api_base: "https://generativelanguage.googleapis.com/v1beta",
        default_models: &[
            (ModelKind::Text, "gemini-pro"),
            (ModelKind::Vision, "gemini-1.5-flash"),
        ],
        costs: TaskCosts {
            text: Some(0.02),
            vision: Some(0.02),
            ..NO_COSTS
        },
    },
    ProviderSpec {
        name: "mistral",
        key_id: "mistral",
        display_name: "Mistral AI",
        api_label: "Mistral AI",
        env_key: "MISTRAL_API_KEY",
        keywords: &["mistral", "codestral"],
        api_style: ApiStyle::OpenAiCompatible,
        default_api_base: "https://api.mistral.ai/v1",
        default_models: &[(ModelKind::Text, "mistral-large-latest")],
        costs: TaskCosts {
            text: Some(0.01),
            ..NO_COSTS
        },
    },
    ProviderSpec {
        name: "anthropic",
        key_id: "anthropic",
        display_name: "Anthropic",
        api_label: "Anthropic",
        env_key: "ANTHROPIC_API_KEY",
        keywords: &["anthropic", "claude"],
        api_style: ApiStyle::Anthropic,
        default_api_base: "https://api.anthropic.com/v1",
        default_models: &[(ModelKind::Text, "claude-3-haiku-20240307")],
        costs: TaskCosts {
            text: Some(0.02),
            ..NO_COSTS
        },
    },
    ProviderSpec {
        name: "elevenlabs",
        key_id: "elevenlabs",
        display_name: "ElevenLabs",
        api_label: "ElevenLabs",
        env_key: "ELEVENLABS_API_KEY",
        keywords: &["elevenlabs", "eleven"],
        api_style: ApiStyle::ElevenLabs,
        default_api_base: "https://api.elevenlabs.io/v1",
        // Rachel, one of the stock voices
        default_models: &[(ModelKind::Audio, "21m00Tcm4TlvDq8ikWAM")],
        costs: TaskCosts {
            audio: Some(0.03),
            ..NO_COSTS
        },
    },
];

/// Key-store entries that belong to no provider (listed for the UI only).
const AUXILIARY_KEYS: &[(&str, &str, &str)] = &[("notion", "Notion", "NOTION_API_KEY")];

// ─────────────────────────────────────────────
// Matching functions
// ─────────────────────────────────────────────

/// Find a provider spec by exact registry name.
pub fn find_by_name(name: &str) -> Option<&'static ProviderSpec> {
    PROVIDERS.iter().find(|spec| spec.name == name)
}

/// Find a provider spec by matching keywords against a model name.
///
/// Returns the first match in registry order.
pub fn find_by_model(model: &str) -> Option<&'static ProviderSpec> {
    let model_lower = model.to_lowercase();
    PROVIDERS.iter().find(|spec| {
        spec.keywords
            .iter()
            .any(|kw| model_lower.contains(kw))
    })
}

/// Resolve a free-form model string to `(provider, upstream model)`.
///
/// `"mistral/open-mixtral-8x22b"` selects the provider explicitly and strips
/// the prefix; anything else goes through keyword matching and is sent as-is.
pub fn resolve_model_string(model: &str) -> Option<(&'static ProviderSpec, String)> {
    if let Some((prefix, rest)) = model.split_once('/') {
        if let Some(spec) = find_by_name(&prefix.to_lowercase()) {
            if !rest.is_empty() {
                return Some((spec, rest.to_string()));
            }
        }
    }
    find_by_model(model).map(|spec| (spec, model.to_string()))
}

/// Upstream model for a catalog entry: explicit `upstream`, else the
/// provider's default for the entry's task, else the entry id.
pub fn resolve_upstream_model(entry: &ModelEntry, spec: &ProviderSpec) -> String {
    entry
        .upstream
        .clone()
        .or_else(|| spec.default_model(entry.kind).map(String::from))
        .unwrap_or_else(|| entry.id.clone())
}

/// Initial key-store contents: one entry per provider plus auxiliary keys.
///
/// Value precedence: config `apiKey` > conventional env var > empty.
pub fn initial_keys(providers: &ProvidersConfig) -> Vec<ApiKeyEntry> {
    let env_value = |var: &str| std::env::var(var).unwrap_or_default();

    let mut keys: Vec<ApiKeyEntry> = AUXILIARY_KEYS
        .iter()
        .map(|(id, name, env)| ApiKeyEntry {
            id: id.to_string(),
            name: name.to_string(),
            value: env_value(env),
        })
        .collect();

    for spec in PROVIDERS {
        let value = providers
            .get_by_name(spec.name)
            .filter(|c| c.is_configured())
            .map(|c| c.api_key.clone())
            .unwrap_or_else(|| env_value(spec.env_key));
        keys.push(ApiKeyEntry {
            id: spec.key_id.to_string(),
            name: spec.display_name.to_string(),
            value,
        });
    }

    keys
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
