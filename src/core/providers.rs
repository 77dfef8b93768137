use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Anthropic,
    Openai,
    Google,
    Mistral,
    Groq,
    Deepseek,
    Xai,
    Openrouter,
    Ollama,
}

impl Provider {
    pub fn from_id(id: &str) -> Option<Self> {
        match id.to_lowercase().as_str() {
            "anthropic" => Some(Self::Anthropic),
            "openai" => Some(Self::Openai),
            "google" | "gemini" => Some(Self::Google),
            "mistral" => Some(Self::Mistral),
            "groq" => Some(Self::Groq),
            "deepseek" => Some(Self::Deepseek),
            "xai" | "x-ai" => Some(Self::Xai),
            "openrouter" => Some(Self::Openrouter),
            "ollama" => Some(Self::Ollama),
            _ => None,
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Openai => "openai",
            Self::Google => "google",
            Self::Mistral => "mistral",
            Self::Groq => "groq",
            Self::Deepseek => "deepseek",
            Self::Xai => "xai",
            Self::Openrouter => "openrouter",
            Self::Ollama => "ollama",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Anthropic => "Anthropic",
            Self::Openai => "OpenAI",
            Self::Google => "Google",
            Self::Mistral => "Mistral",
            Self::Groq => "Groq",
            Self::Deepseek => "DeepSeek",
            Self::Xai => "xAI",
            Self::Openrouter => "OpenRouter",
            Self::Ollama => "Ollama",
        }
    }

    /// Whether the provider needs an API key to be usable. Ollama talks to
    /// a local daemon and authenticates nothing.
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, Self::Ollama)
    }

    pub fn all() -> &'static [Provider] {
        &[
            Self::Anthropic,
            Self::Openai,
            Self::Google,
            Self::Mistral,
            Self::Groq,
            Self::Deepseek,
            Self::Xai,
            Self::Openrouter,
            Self::Ollama,
        ]
    }
}

// ── Model registry ────────────────────────────────────────────────────

/// A known model id plus the aliases it ships under.
pub struct KnownModel {
    pub provider: Provider,
    pub id: &'static str,
    pub aliases: &'static [&'static str],
}

/// Built-in model registry. Lookup is by exact id or alias; custom models
/// are expected to miss here and are only flagged, never rejected.
static MODEL_REGISTRY: &[KnownModel] = &[
    KnownModel {
        provider: Provider::Anthropic,
        id: "claude-haiku-4-5",
        aliases: &["claude-haiku-4-5-20251001", "haiku"],
    },
    KnownModel {
        provider: Provider::Anthropic,
        id: "claude-sonnet-4-5",
        aliases: &["claude-sonnet-4-5-20250929", "sonnet"],
    },
    KnownModel {
        provider: Provider::Anthropic,
        id: "claude-opus-4-5",
        aliases: &["claude-opus-4-5-20251101", "opus"],
    },
    KnownModel {
        provider: Provider::Anthropic,
        id: "claude-opus-4-6",
        aliases: &[],
    },
    KnownModel {
        provider: Provider::Openai,
        id: "gpt-5",
        aliases: &["gpt-5-latest"],
    },
    KnownModel {
        provider: Provider::Openai,
        id: "gpt-5-codex",
        aliases: &[],
    },
    KnownModel {
        provider: Provider::Openai,
        id: "gpt-5.1",
        aliases: &[],
    },
    KnownModel {
        provider: Provider::Openai,
        id: "o4-mini",
        aliases: &[],
    },
    KnownModel {
        provider: Provider::Google,
        id: "gemini-2.5-pro",
        aliases: &["gemini-2.5-pro-latest"],
    },
    KnownModel {
        provider: Provider::Google,
        id: "gemini-2.5-flash",
        aliases: &["gemini-2.5-flash-latest"],
    },
    KnownModel {
        provider: Provider::Mistral,
        id: "mistral-large-latest",
        aliases: &["mistral-large"],
    },
    KnownModel {
        provider: Provider::Groq,
        id: "llama-3.3-70b-versatile",
        aliases: &[],
    },
    KnownModel {
        provider: Provider::Deepseek,
        id: "deepseek-chat",
        aliases: &["deepseek-v3"],
    },
    KnownModel {
        provider: Provider::Deepseek,
        id: "deepseek-reasoner",
        aliases: &["deepseek-r1"],
    },
    KnownModel {
        provider: Provider::Xai,
        id: "grok-4",
        aliases: &["grok-4-latest"],
    },
];

/// Look up a model by id or alias. When the provider is known the search
/// is scoped to it; unknown providers match against the whole registry.
pub fn lookup_model(provider: Option<Provider>, model_id: &str) -> Option<&'static KnownModel> {
    MODEL_REGISTRY
        .iter()
        .filter(|m| provider.map_or(true, |p| m.provider == p))
        .find(|m| m.id == model_id || m.aliases.contains(&model_id))
}

// ── Provider runtime config (providers.jsonc) ─────────────────────────

/// One provider's section of providers.jsonc. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl ProviderSettings {
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Parse the providers.jsonc credential map. JSONC (comments, trailing
/// commas) is accepted via json5. A missing or malformed file reads as
/// "no configuration at all" -- None, which the health checker downgrades
/// to warnings rather than failures.
pub fn load_provider_settings(path: &Path) -> Option<HashMap<String, ProviderSettings>> {
    let content = std::fs::read_to_string(path).ok()?;
    match json5::from_str(&content) {
        Ok(map) => Some(map),
        Err(e) => {
            eprintln!(
                "warning: ignoring malformed provider config {}: {}",
                path.display(),
                e
            );
            None
        }
    }
}
