use std::collections::HashMap;
use std::path::PathBuf;

use crate::core::models::health::{
    CheckResult, HealthChecks, HealthReport, ModelOverrides,
};
use crate::core::providers::{self, Provider, ProviderSettings};

/// Rule-based health evaluation for (provider, model) pairs.
///
/// All five checks are pure and synchronous; the only I/O is re-reading
/// providers.jsonc at check time. Reports are cached in memory keyed
/// `provider:modelId`, overwritten on every recheck -- no TTL, no
/// eviction, nothing persisted.
pub struct HealthChecker {
    providers_path: PathBuf,
    cache: HashMap<String, HealthReport>,
}

impl HealthChecker {
    pub fn new(providers_path: PathBuf) -> Self {
        Self {
            providers_path,
            cache: HashMap::new(),
        }
    }

    pub fn open_default() -> Self {
        Self::new(crate::core::paths::providers_config_path())
    }

    /// Run all five checks and cache the report.
    pub fn check(
        &mut self,
        provider_id: &str,
        model_id: &str,
        overrides: Option<&ModelOverrides>,
    ) -> HealthReport {
        let config = providers::load_provider_settings(&self.providers_path);
        let section = config.as_ref().and_then(|map| map.get(provider_id));
        let provider = Provider::from_id(provider_id);

        let checks = HealthChecks {
            authentication: check_authentication(provider_id, provider, section),
            model_exists: check_model_exists(provider, model_id),
            token_limits: check_token_limits(overrides),
            pricing: check_pricing(overrides),
            connectivity: check_connectivity(section),
        };
        let overall = checks.overall();

        let report = HealthReport {
            provider: provider_id.to_string(),
            model_id: model_id.to_string(),
            checks,
            overall,
        };
        self.cache
            .insert(format!("{}:{}", provider_id, model_id), report.clone());
        report
    }

    /// Last cached report for a pair, if any.
    pub fn cached(&self, provider_id: &str, model_id: &str) -> Option<&HealthReport> {
        self.cache.get(&format!("{}:{}", provider_id, model_id))
    }
}

fn check_authentication(
    provider_id: &str,
    provider: Option<Provider>,
    section: Option<&ProviderSettings>,
) -> CheckResult {
    let Some(section) = section else {
        return CheckResult::warn(format!(
            "no configuration section for '{}'",
            provider_id
        ));
    };

    match provider {
        Some(p) if p.requires_api_key() => {
            if section.has_api_key() {
                CheckResult::pass(format!("{} credentials configured", p.display_name()))
            } else {
                CheckResult::fail(format!("{} requires an API key", p.display_name()))
            }
        }
        Some(p) => CheckResult::pass(format!("{} needs no credentials", p.display_name())),
        None => {
            if section.has_api_key() {
                CheckResult::pass("API key configured for unknown provider")
            } else {
                CheckResult::warn(format!(
                    "unknown provider '{}' has no API key",
                    provider_id
                ))
            }
        }
    }
}

fn check_model_exists(provider: Option<Provider>, model_id: &str) -> CheckResult {
    match providers::lookup_model(provider, model_id) {
        Some(known) => CheckResult::pass(format!("known model (canonical id: {})", known.id)),
        None => CheckResult::warn("custom model, not in the built-in registry"),
    }
}

fn check_token_limits(overrides: Option<&ModelOverrides>) -> CheckResult {
    let Some(limits) = overrides.and_then(|o| o.limits) else {
        return CheckResult::skip("no custom token limits");
    };

    let input = limits.max_input_tokens;
    let output = limits.max_output_tokens;

    if let Some(input) = input {
        if input < 1000 {
            return CheckResult::warn(format!("input limit {} is suspiciously low", input));
        }
    }
    if let Some(output) = output {
        if output < 100 {
            return CheckResult::warn(format!("output limit {} is suspiciously low", output));
        }
    }
    if let (Some(input), Some(output)) = (input, output) {
        if output > input {
            return CheckResult::warn("output limit exceeds input limit");
        }
    }
    CheckResult::pass("custom token limits look sane")
}

fn check_pricing(overrides: Option<&ModelOverrides>) -> CheckResult {
    let Some(pricing) = overrides.and_then(|o| o.pricing) else {
        return CheckResult::skip("no custom pricing");
    };

    let input = pricing.input_cost_per_mtok;
    let output = pricing.output_cost_per_mtok;

    if input.is_some_and(|c| c < 0.0) || output.is_some_and(|c| c < 0.0) {
        return CheckResult::warn("negative cost configured");
    }
    if let (Some(input), Some(output)) = (input, output) {
        if input > output {
            return CheckResult::warn("input cost exceeds output cost");
        }
    }
    CheckResult::pass("custom pricing looks sane")
}

fn check_connectivity(section: Option<&ProviderSettings>) -> CheckResult {
    let Some(section) = section else {
        return CheckResult::skip("provider not configured");
    };

    match section.base_url.as_deref() {
        None => CheckResult::pass("default endpoint"),
        Some(base_url) => match url::Url::parse(base_url) {
            Ok(_) => CheckResult::pass(format!("custom endpoint {}", base_url)),
            Err(e) => CheckResult::fail(format!("invalid base URL '{}': {}", base_url, e)),
        },
    }
}
