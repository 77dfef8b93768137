use serde::{Deserialize, Serialize};

use crate::core::store::VersionedFile;

/// A registered icon theme. `theme_dir` and `theme_json_path` are relative
/// to the icon-themes root so the data dir can be relocated wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstalledTheme {
    pub id: String,
    pub label: String,
    pub theme_dir: String,
    pub theme_json_path: String,
    #[serde(default)]
    pub is_builtin: bool,
}

/// On-disk layout of icon-themes.json. The built-in theme is synthesized
/// at read time and never stored here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeRegistryFile {
    pub version: u32,
    pub themes: Vec<InstalledTheme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_theme: Option<String>,
}

impl VersionedFile for ThemeRegistryFile {
    const VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }

    fn empty() -> Self {
        Self {
            version: Self::VERSION,
            themes: Vec::new(),
            active_theme: None,
        }
    }
}

/// Result of one VSIX import call. Partial success is normal: some
/// contributed themes can land while others are rejected.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    pub imported: Vec<String>,
    pub errors: Vec<String>,
}

// ── VSIX manifest (package.json) ──────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct VsixManifest {
    pub publisher: Option<String>,
    pub name: Option<String>,
    #[serde(default)]
    pub contributes: VsixContributes,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VsixContributes {
    #[serde(rename = "iconThemes", default)]
    pub icon_themes: Vec<ContributedTheme>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ContributedTheme {
    pub id: Option<String>,
    pub label: Option<String>,
    pub path: Option<String>,
}
