use anyhow::Result;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::render;
use crate::core::health::HealthChecker;
use crate::core::models::health::{HealthReport, ModelOverrides, OverallStatus};
use crate::core::presets::PresetStore;
use crate::core::providers::Provider;

/// Check a single provider/model pair.
pub fn run(provider: &str, model: &str, metadata: Option<&str>, opts: &OutputOptions) -> Result<()> {
    let overrides = match metadata {
        Some(raw) => match serde_json::from_str::<serde_json::Value>(raw) {
            Ok(value) => Some(ModelOverrides::from_metadata(&value)),
            Err(e) => {
                eprintln!("Invalid --metadata JSON: {}", e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    if opts.verbose {
        eprintln!(
            "reading provider config from {}",
            crate::core::paths::providers_config_path().display()
        );
        if Provider::from_id(provider).is_none() {
            let known: Vec<&str> = Provider::all().iter().map(|p| p.id()).collect();
            eprintln!(
                "'{}' is not a built-in provider (known: {})",
                provider,
                known.join(", ")
            );
        }
    }

    let mut checker = HealthChecker::open_default();
    let report = checker.check(provider, model, overrides.as_ref());

    emit(std::slice::from_ref(&report), opts);
    exit_on_error(&[report]);
    Ok(())
}

/// Check every model entry of a saved preset. Duplicate provider/model
/// pairs reuse the checker's cached report instead of re-evaluating.
pub fn run_preset(preset_id: &str, opts: &OutputOptions) -> Result<()> {
    let Some(preset) = PresetStore::open_default().get(preset_id) else {
        eprintln!("Preset not found: {}", preset_id);
        std::process::exit(1);
    };

    let mut checker = HealthChecker::open_default();
    let mut reports = Vec::new();

    for entry in &preset.models {
        if let Some(cached) = checker.cached(&entry.provider, &entry.model_id) {
            reports.push(cached.clone());
            continue;
        }
        let overrides = entry.metadata.as_ref().map(ModelOverrides::from_metadata);
        reports.push(checker.check(&entry.provider, &entry.model_id, overrides.as_ref()));
    }

    emit(&reports, opts);
    exit_on_error(&reports);
    Ok(())
}

fn emit(reports: &[HealthReport], opts: &OutputOptions) {
    match opts.format {
        OutputFormat::Json => {
            if reports.len() == 1 {
                println!("{}", opts.to_json(&reports[0]));
            } else {
                println!("{}", opts.to_json(&reports));
            }
        }
        OutputFormat::Text => {
            let blocks: Vec<String> = reports
                .iter()
                .map(|r| render::render_health(r, opts.use_color))
                .collect();
            println!("{}", blocks.join("\n\n"));
        }
    }
}

/// Shell-friendly: any hard failure exits nonzero, warnings do not.
fn exit_on_error(reports: &[HealthReport]) {
    if reports.iter().any(|r| r.overall == OverallStatus::Error) {
        std::process::exit(1);
    }
}
