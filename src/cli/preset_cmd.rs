use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::render;
use crate::core::models::preset::{ModelEntry, PresetUpdate};
use crate::core::presets::{PresetError, PresetStore};

/// Parse a `provider/model` CLI argument into a model entry.
fn parse_model_arg(arg: &str) -> Option<ModelEntry> {
    let (provider, model_id) = arg.split_once('/')?;
    if provider.is_empty() || model_id.is_empty() {
        return None;
    }
    Some(ModelEntry {
        provider: provider.to_string(),
        model_id: model_id.to_string(),
        metadata: None,
    })
}

fn parse_model_args(args: &[String]) -> Vec<ModelEntry> {
    let mut models = Vec::new();
    for arg in args {
        match parse_model_arg(arg) {
            Some(entry) => models.push(entry),
            None => {
                eprintln!("Invalid model '{}': expected provider/model-id", arg);
                std::process::exit(1);
            }
        }
    }
    models
}

pub fn list(opts: &OutputOptions) -> Result<()> {
    let presets = PresetStore::open_default().list();
    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&presets)),
        OutputFormat::Text => println!("{}", render::render_preset_list(&presets, opts.use_color)),
    }
    Ok(())
}

pub fn show(id: &str, opts: &OutputOptions) -> Result<()> {
    match PresetStore::open_default().get(id) {
        Some(preset) => {
            match opts.format {
                OutputFormat::Json => println!("{}", opts.to_json(&preset)),
                OutputFormat::Text => {
                    println!("{}", render::render_preset(&preset, opts.use_color))
                }
            }
            Ok(())
        }
        None => {
            eprintln!("Preset not found: {}", id);
            std::process::exit(1);
        }
    }
}

pub fn save(
    name: &str,
    models: &[String],
    description: Option<String>,
    opts: &OutputOptions,
) -> Result<()> {
    if models.is_empty() {
        eprintln!("At least one --model provider/model-id is required");
        std::process::exit(1);
    }
    let entries = parse_model_args(models);
    let preset = PresetStore::open_default().save(name, entries, description)?;

    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&preset)),
        OutputFormat::Text => println!("Saved preset '{}' ({})", preset.name, preset.id),
    }
    Ok(())
}

pub fn delete(id: &str, opts: &OutputOptions) -> Result<()> {
    match PresetStore::open_default().delete(id) {
        Ok(()) => {
            if opts.format == OutputFormat::Text {
                println!("Deleted preset {}", id);
            }
            Ok(())
        }
        Err(PresetError::NotFound(_)) => {
            eprintln!("Preset not found: {}", id);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

pub fn update(
    id: &str,
    name: Option<String>,
    description: Option<String>,
    models: Option<Vec<String>>,
    opts: &OutputOptions,
) -> Result<()> {
    let update = PresetUpdate {
        name,
        description,
        models: models.map(|m| parse_model_args(&m)),
    };
    match PresetStore::open_default().update(id, update) {
        Ok(preset) => {
            match opts.format {
                OutputFormat::Json => println!("{}", opts.to_json(&preset)),
                OutputFormat::Text => println!("Updated preset '{}'", preset.name),
            }
            Ok(())
        }
        Err(PresetError::NotFound(_)) => {
            eprintln!("Preset not found: {}", id);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

pub fn export(ids: &[String], output: Option<&Path>, opts: &OutputOptions) -> Result<()> {
    let store = PresetStore::open_default();
    let export = store.export(if ids.is_empty() { None } else { Some(ids) });
    let json = serde_json::to_string_pretty(&export).context("Failed to serialize export")?;

    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if opts.format == OutputFormat::Text {
                println!(
                    "Exported {} preset{} to {}",
                    export.presets.len(),
                    if export.presets.len() == 1 { "" } else { "s" },
                    path.display()
                );
            }
        }
        None => println!("{}", json),
    }
    Ok(())
}

pub fn import(path: &Path, opts: &OutputOptions) -> Result<()> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    match PresetStore::open_default().import(&json) {
        Ok(report) => {
            match opts.format {
                OutputFormat::Json => println!("{}", opts.to_json(&report)),
                OutputFormat::Text => {
                    println!(
                        "Imported {} preset{}",
                        report.imported.len(),
                        if report.imported.len() == 1 { "" } else { "s" }
                    );
                    if opts.verbose {
                        for preset in &report.imported {
                            eprintln!("  + {} ({})", preset.name, preset.id);
                        }
                    }
                    if report.skipped > 0 {
                        eprintln!(
                            "  {} invalid entr{} skipped",
                            report.skipped,
                            if report.skipped == 1 { "y" } else { "ies" }
                        );
                    }
                }
            }
            Ok(())
        }
        Err(e @ (PresetError::InvalidPayload(_) | PresetError::EmptyImport)) => {
            eprintln!("Import failed: {}", e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_model_arg_happy_path() {
        let entry = parse_model_arg("anthropic/claude-sonnet-4-5").unwrap();
        assert_eq!(entry.provider, "anthropic");
        assert_eq!(entry.model_id, "claude-sonnet-4-5");
        assert!(entry.metadata.is_none());
    }

    #[test]
    fn parse_model_arg_keeps_extra_slashes_in_model_id() {
        let entry = parse_model_arg("openrouter/meta/llama-3").unwrap();
        assert_eq!(entry.provider, "openrouter");
        assert_eq!(entry.model_id, "meta/llama-3");
    }

    #[test]
    fn parse_model_arg_rejects_malformed() {
        assert!(parse_model_arg("no-slash").is_none());
        assert!(parse_model_arg("/model").is_none());
        assert!(parse_model_arg("provider/").is_none());
    }
}
