use anyhow::{Context, Result};
use std::io::{Cursor, Read};
use std::path::{Component, Path, PathBuf};

use crate::core::models::theme::{
    ImportOutcome, InstalledTheme, ThemeRegistryFile, VsixManifest,
};
use crate::core::store;

/// Synthetic always-present theme. Never persisted, never deletable.
pub const BUILTIN_THEME_ID: &str = "builtin.default";

/// Manages VS Code-compatible icon themes: a JSON registry plus one
/// extracted directory per imported theme under the icon-themes root.
pub struct ThemeManager {
    themes_root: PathBuf,
    registry_path: PathBuf,
}

impl ThemeManager {
    pub fn new(themes_root: PathBuf, registry_path: PathBuf) -> Self {
        Self {
            themes_root,
            registry_path,
        }
    }

    pub fn open_default() -> Self {
        Self::new(
            crate::core::paths::themes_root(),
            crate::core::paths::theme_registry_path(),
        )
    }

    fn builtin() -> InstalledTheme {
        InstalledTheme {
            id: BUILTIN_THEME_ID.to_string(),
            label: "Default Icons".to_string(),
            theme_dir: String::new(),
            theme_json_path: String::new(),
            is_builtin: true,
        }
    }

    /// All themes, the built-in entry first.
    pub fn list(&self) -> Vec<InstalledTheme> {
        let mut themes = vec![Self::builtin()];
        themes.extend(store::load::<ThemeRegistryFile>(&self.registry_path).themes);
        themes
    }

    pub fn get(&self, id: &str) -> Option<InstalledTheme> {
        self.list().into_iter().find(|t| t.id == id)
    }

    /// Import icon themes from a base64-encoded VSIX archive (the transport
    /// encoding used across the app's IPC boundary).
    pub fn import_vsix_base64(&self, data: &str) -> Result<ImportOutcome> {
        use base64::Engine;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data.trim())
            .context("Failed to decode base64 VSIX payload")?;
        self.import_vsix(&bytes)
    }

    /// Import every icon theme contributed by a VSIX archive.
    ///
    /// Archive-level problems (unreadable zip, missing manifest, nothing
    /// contributed) and per-theme problems are collected as error strings;
    /// partial success is normal. Only registry persistence failures are
    /// hard errors.
    pub fn import_vsix(&self, bytes: &[u8]) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome::default();

        let mut archive = match zip::ZipArchive::new(Cursor::new(bytes)) {
            Ok(archive) => archive,
            Err(e) => {
                outcome.errors.push(format!("unreadable archive: {}", e));
                return Ok(outcome);
            }
        };

        // VSIX packages nest the extension under extension/; bare zips of
        // an extension folder put package.json at the root.
        let (manifest_raw, prefix) = match read_manifest(&mut archive) {
            Some(found) => found,
            None => {
                outcome.errors.push("no package.json manifest found".to_string());
                return Ok(outcome);
            }
        };

        let manifest: VsixManifest = match serde_json::from_str(&manifest_raw) {
            Ok(m) => m,
            Err(e) => {
                outcome.errors.push(format!("invalid manifest: {}", e));
                return Ok(outcome);
            }
        };

        if manifest.contributes.icon_themes.is_empty() {
            outcome
                .errors
                .push("extension contributes no icon themes".to_string());
            return Ok(outcome);
        }

        let publisher = manifest.publisher.as_deref().unwrap_or("unknown");
        let extension = manifest.name.as_deref().unwrap_or("extension");

        let mut registry = store::load::<ThemeRegistryFile>(&self.registry_path);
        let mut registry_dirty = false;

        for contributed in &manifest.contributes.icon_themes {
            let Some(contributed_id) = contributed.id.as_deref() else {
                outcome
                    .errors
                    .push("contributed icon theme has no id".to_string());
                continue;
            };
            let theme_id = sanitize_id(&format!("{}.{}.{}", publisher, extension, contributed_id));
            let theme_dir = self.themes_root.join(&theme_id);

            // A reimport replaces the previous installation wholesale.
            if theme_dir.exists() {
                if let Err(e) = std::fs::remove_dir_all(&theme_dir) {
                    outcome
                        .errors
                        .push(format!("{}: could not clear old directory: {}", theme_id, e));
                    continue;
                }
            }

            if let Err(e) = extract_prefixed(&mut archive, prefix, &theme_dir, &mut outcome.errors)
            {
                outcome
                    .errors
                    .push(format!("{}: extraction failed: {}", theme_id, e));
                let _ = std::fs::remove_dir_all(&theme_dir);
                continue;
            }

            // The manifest declares where its theme JSON lives; a theme
            // whose manifest never landed is unusable.
            let declared = contributed.path.as_deref().unwrap_or("");
            let declared = declared.strip_prefix("./").unwrap_or(declared);
            let manifest_ok = resolve_within(&theme_dir, declared)
                .map(|p| p.is_file())
                .unwrap_or(false);
            if declared.is_empty() || !manifest_ok {
                outcome.errors.push(format!(
                    "{}: declared theme file '{}' missing after extraction",
                    theme_id, declared
                ));
                let _ = std::fs::remove_dir_all(&theme_dir);
                continue;
            }

            let label = contributed
                .label
                .clone()
                .unwrap_or_else(|| contributed_id.to_string());

            registry.themes.retain(|t| t.id != theme_id);
            registry.themes.push(InstalledTheme {
                id: theme_id.clone(),
                label,
                theme_dir: theme_id.clone(),
                theme_json_path: format!("{}/{}", theme_id, declared),
                is_builtin: false,
            });
            registry_dirty = true;
            outcome.imported.push(theme_id);
        }

        if registry_dirty {
            store::save(&self.registry_path, &registry)?;
        }
        Ok(outcome)
    }

    /// Remove a theme from the registry and best-effort delete its
    /// directory. The built-in theme and unknown ids are no-ops returning
    /// false. Directory deletion failure does not roll back the registry.
    pub fn delete(&self, id: &str) -> Result<bool> {
        if id == BUILTIN_THEME_ID {
            return Ok(false);
        }

        let mut registry = store::load::<ThemeRegistryFile>(&self.registry_path);
        let before = registry.themes.len();
        registry.themes.retain(|t| t.id != id);
        if registry.themes.len() == before {
            return Ok(false);
        }
        if registry.active_theme.as_deref() == Some(id) {
            registry.active_theme = Some(BUILTIN_THEME_ID.to_string());
        }
        store::save(&self.registry_path, &registry)?;

        let dir = self.themes_root.join(id);
        if dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                eprintln!("warning: could not remove {}: {}", dir.display(), e);
            }
        }
        Ok(true)
    }

    /// Resolve an icon path inside a theme's directory. Returns None for
    /// an unknown theme, the built-in theme (its assets are not on disk
    /// here), a path escaping the theme directory, or a missing file.
    pub fn icon_file(&self, theme_id: &str, icon_path: &str) -> Option<PathBuf> {
        let theme = self.get(theme_id)?;
        if theme.is_builtin {
            return None;
        }
        let root = self.themes_root.join(&theme.theme_dir);
        let resolved = resolve_within(&root, icon_path)?;
        resolved.is_file().then_some(resolved)
    }
}

/// Find the extension manifest and the archive prefix it sits under.
fn read_manifest<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
) -> Option<(String, &'static str)> {
    for (name, prefix) in [("extension/package.json", "extension/"), ("package.json", "")] {
        if let Ok(mut file) = archive.by_name(name) {
            let mut raw = String::new();
            if file.read_to_string(&mut raw).is_ok() {
                return Some((raw, prefix));
            }
        }
    }
    None
}

/// Extract every archive entry under `prefix` into `dest`. Entries whose
/// resolved target would escape `dest` are skipped and reported, never
/// written.
fn extract_prefixed<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    prefix: &str,
    dest: &Path,
    errors: &mut Vec<String>,
) -> Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .with_context(|| format!("Failed to read archive entry {}", i))?;
        let name = entry.name().to_string();

        let Some(rel) = name.strip_prefix(prefix) else {
            continue;
        };
        if rel.is_empty() {
            continue;
        }

        // Both guards matter: enclosed_name rejects hostile entry names
        // outright, resolve_within pins the target under the theme dir.
        let Some(target) = entry
            .enclosed_name()
            .and_then(|_| resolve_within(dest, rel))
        else {
            errors.push(format!("skipped unsafe archive entry '{}'", name));
            continue;
        };

        if entry.is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
            continue;
        }

        if let Some(parent) = target.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let mut out = std::fs::File::create(&target)
            .with_context(|| format!("Failed to create {}", target.display()))?;
        std::io::copy(&mut entry, &mut out)
            .with_context(|| format!("Failed to write {}", target.display()))?;
    }
    Ok(())
}

/// Lexically resolve `rel` under `root`, refusing absolute paths and any
/// `..` that would climb out. Works on paths that do not exist yet, which
/// canonicalize-based guards cannot.
fn resolve_within(root: &Path, rel: &str) -> Option<PathBuf> {
    let mut stack: Vec<std::ffi::OsString> = Vec::new();
    for component in Path::new(rel).components() {
        match component {
            Component::Normal(part) => stack.push(part.to_os_string()),
            Component::CurDir => {}
            Component::ParentDir => {
                stack.pop()?;
            }
            Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    let mut path = root.to_path_buf();
    for part in stack {
        path.push(part);
    }
    Some(path)
}

/// Stable theme id: lowercase, with anything outside [a-z0-9.-] mapped
/// to '-'.
fn sanitize_id(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
