use serde::{Deserialize, Serialize};

/// Verdict of one health rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
    Skip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub status: CheckStatus,
    pub message: String,
}

impl CheckResult {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Pass,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Warn,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Fail,
            message: message.into(),
        }
    }

    pub fn skip(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Skip,
            message: message.into(),
        }
    }
}

/// Rolled-up status across all five checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthChecks {
    pub authentication: CheckResult,
    pub model_exists: CheckResult,
    pub token_limits: CheckResult,
    pub pricing: CheckResult,
    pub connectivity: CheckResult,
}

impl HealthChecks {
    pub fn iter(&self) -> [(&'static str, &CheckResult); 5] {
        [
            ("authentication", &self.authentication),
            ("model exists", &self.model_exists),
            ("token limits", &self.token_limits),
            ("pricing", &self.pricing),
            ("connectivity", &self.connectivity),
        ]
    }

    /// error iff any fail, else warning iff any warn, else healthy.
    pub fn overall(&self) -> OverallStatus {
        let statuses = self.iter().map(|(_, c)| c.status);
        if statuses.iter().any(|s| *s == CheckStatus::Fail) {
            OverallStatus::Error
        } else if statuses.iter().any(|s| *s == CheckStatus::Warn) {
            OverallStatus::Warning
        } else {
            OverallStatus::Healthy
        }
    }
}

/// Ephemeral result of checking one (provider, model) pair. Cached in
/// memory only, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub provider: String,
    pub model_id: String,
    pub checks: HealthChecks,
    pub overall: OverallStatus,
}

// ── Custom model metadata ─────────────────────────────────────────────

/// Custom token limits attached to a preset entry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenLimits {
    pub max_input_tokens: Option<u64>,
    pub max_output_tokens: Option<u64>,
}

/// Custom per-million-token pricing attached to a preset entry.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomPricing {
    #[serde(rename = "inputCostPerMTok")]
    pub input_cost_per_mtok: Option<f64>,
    #[serde(rename = "outputCostPerMTok")]
    pub output_cost_per_mtok: Option<f64>,
}

/// The slice of a preset entry's metadata the health checker understands.
/// Anything else in the metadata blob is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelOverrides {
    pub limits: Option<TokenLimits>,
    pub pricing: Option<CustomPricing>,
}

impl ModelOverrides {
    /// Lenient parse from a preset entry's metadata blob. Unknown fields
    /// and wrong-typed sections read as absent rather than erroring.
    pub fn from_metadata(metadata: &serde_json::Value) -> Self {
        serde_json::from_value(metadata.clone()).unwrap_or_default()
    }
}
