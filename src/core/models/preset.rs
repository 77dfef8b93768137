use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::store::VersionedFile;

/// One provider/model pair inside a preset. `metadata` is free-form JSON
/// carried through unchanged (custom limits, pricing, endpoint overrides).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub provider: String,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// A named, saved snapshot of model configuration entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub models: Vec<ModelEntry>,
}

/// On-disk layout of model-presets.json.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetFile {
    pub version: u32,
    pub presets: Vec<Preset>,
}

impl VersionedFile for PresetFile {
    const VERSION: u32 = 1;

    fn version(&self) -> u32 {
        self.version
    }

    fn empty() -> Self {
        Self {
            version: Self::VERSION,
            presets: Vec::new(),
        }
    }
}

/// Partial update applied by `PresetStore::update`. Absent fields are left
/// untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub models: Option<Vec<ModelEntry>>,
}

/// Export document: the same wrapper the store file uses, so an exported
/// file can be imported wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PresetExport {
    pub version: u32,
    pub presets: Vec<Preset>,
}

/// Outcome of an import: what landed, and how many entries were dropped.
#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub imported: Vec<Preset>,
    pub skipped: usize,
}
