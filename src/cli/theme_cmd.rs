use anyhow::{Context, Result};
use std::path::Path;

use crate::cli::output::{OutputFormat, OutputOptions};
use crate::cli::render;
use crate::core::themes::ThemeManager;

pub fn list(opts: &OutputOptions) -> Result<()> {
    let themes = ThemeManager::open_default().list();
    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&themes)),
        OutputFormat::Text => println!("{}", render::render_themes(&themes, opts.use_color)),
    }
    Ok(())
}

pub fn import(path: &Path, opts: &OutputOptions) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let outcome = ThemeManager::open_default().import_vsix(&bytes)?;

    match opts.format {
        OutputFormat::Json => println!("{}", opts.to_json(&outcome)),
        OutputFormat::Text => {
            for id in &outcome.imported {
                println!("Imported theme {}", id);
            }
            for error in &outcome.errors {
                eprintln!("  {}", error);
            }
            if outcome.imported.is_empty() {
                eprintln!("No themes imported from {}", path.display());
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

pub fn delete(id: &str, opts: &OutputOptions) -> Result<()> {
    let deleted = ThemeManager::open_default().delete(id)?;
    match opts.format {
        OutputFormat::Json => {
            println!("{}", opts.to_json(&serde_json::json!({ "deleted": deleted })))
        }
        OutputFormat::Text => {
            if deleted {
                println!("Deleted theme {}", id);
            } else {
                eprintln!("Theme '{}' was not deleted (built-in or unknown)", id);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

pub fn icon(theme_id: &str, icon_path: &str, opts: &OutputOptions) -> Result<()> {
    match ThemeManager::open_default().icon_file(theme_id, icon_path) {
        Some(path) => {
            match opts.format {
                OutputFormat::Json => {
                    println!("{}", opts.to_json(&serde_json::json!({ "path": path })))
                }
                OutputFormat::Text => println!("{}", path.display()),
            }
            Ok(())
        }
        None => {
            eprintln!("Icon not found: {} in theme {}", icon_path, theme_id);
            std::process::exit(1);
        }
    }
}
