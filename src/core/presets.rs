use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

use crate::core::models::preset::{
    ImportReport, ModelEntry, Preset, PresetExport, PresetFile, PresetUpdate,
};
use crate::core::store::{self, VersionedFile};

#[derive(Error, Debug)]
pub enum PresetError {
    #[error("Preset not found: {0}")]
    NotFound(String),
    #[error("Invalid import payload: {0}")]
    InvalidPayload(String),
    #[error("Import contained no valid presets")]
    EmptyImport,
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// CRUD over model-presets.json. Every call is a full read-modify-write
/// cycle; concurrent callers race and the last atomic rename wins.
pub struct PresetStore {
    path: PathBuf,
}

impl PresetStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Store rooted at the default data dir.
    pub fn open_default() -> Self {
        Self::new(crate::core::paths::presets_path())
    }

    pub fn list(&self) -> Vec<Preset> {
        store::load::<PresetFile>(&self.path).presets
    }

    pub fn get(&self, id: &str) -> Option<Preset> {
        self.list().into_iter().find(|p| p.id == id)
    }

    /// Create and persist a new preset. `created_at` and `updated_at` are
    /// stamped equal.
    pub fn save(
        &self,
        name: &str,
        models: Vec<ModelEntry>,
        description: Option<String>,
    ) -> Result<Preset, PresetError> {
        let now = Utc::now();
        let preset = Preset {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description,
            created_at: now,
            updated_at: now,
            models,
        };

        let mut file = store::load::<PresetFile>(&self.path);
        file.presets.push(preset.clone());
        store::save(&self.path, &file)?;
        Ok(preset)
    }

    pub fn delete(&self, id: &str) -> Result<(), PresetError> {
        let mut file = store::load::<PresetFile>(&self.path);
        let before = file.presets.len();
        file.presets.retain(|p| p.id != id);
        if file.presets.len() == before {
            return Err(PresetError::NotFound(id.to_string()));
        }
        store::save(&self.path, &file)?;
        Ok(())
    }

    /// Merge the provided fields into an existing preset and bump its
    /// `updated_at` stamp.
    pub fn update(&self, id: &str, update: PresetUpdate) -> Result<Preset, PresetError> {
        let mut file = store::load::<PresetFile>(&self.path);
        let preset = file
            .presets
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;

        if let Some(name) = update.name {
            preset.name = name;
        }
        if let Some(description) = update.description {
            preset.description = Some(description);
        }
        if let Some(models) = update.models {
            preset.models = models;
        }
        preset.updated_at = Utc::now();

        let updated = preset.clone();
        store::save(&self.path, &file)?;
        Ok(updated)
    }

    /// Export either the id-filtered subset or the full set. Unknown ids
    /// are ignored; the result can legitimately be empty.
    pub fn export(&self, ids: Option<&[String]>) -> PresetExport {
        let presets = self.list();
        let presets = match ids {
            Some(ids) => presets
                .into_iter()
                .filter(|p| ids.iter().any(|id| *id == p.id))
                .collect(),
            None => presets,
        };
        PresetExport {
            version: PresetFile::VERSION,
            presets,
        }
    }

    /// Import presets from an export document (or a bare preset array).
    ///
    /// Validation is per entry: a preset needs a string `name` and an array
    /// `models`; model rows need string `provider` and `modelId`. Malformed
    /// entries and rows are skipped, not fatal. Every surviving preset gets
    /// a fresh id so imports never collide with existing presets. Fails
    /// only on unparsable JSON or when zero entries validate.
    pub fn import(&self, json: &str) -> Result<ImportReport, PresetError> {
        let value: serde_json::Value = serde_json::from_str(json)
            .map_err(|e| PresetError::InvalidPayload(e.to_string()))?;

        let raw_presets = match &value {
            serde_json::Value::Array(items) => items.as_slice(),
            serde_json::Value::Object(map) => map
                .get("presets")
                .and_then(|p| p.as_array())
                .map(|a| a.as_slice())
                .ok_or_else(|| {
                    PresetError::InvalidPayload("missing 'presets' array".to_string())
                })?,
            _ => {
                return Err(PresetError::InvalidPayload(
                    "expected an object or array".to_string(),
                ))
            }
        };

        let now = Utc::now();
        let mut imported = Vec::new();
        let mut skipped = 0usize;

        for raw in raw_presets {
            match validate_preset(raw, now) {
                Some(preset) => imported.push(preset),
                None => skipped += 1,
            }
        }

        if imported.is_empty() {
            return Err(PresetError::EmptyImport);
        }

        let mut file = store::load::<PresetFile>(&self.path);
        file.presets.extend(imported.iter().cloned());
        store::save(&self.path, &file)?;

        Ok(ImportReport { imported, skipped })
    }
}

/// Validate one raw import entry, returning the rebuilt preset with a
/// fresh id. Timestamps are preserved when parseable, defaulting to `now`.
fn validate_preset(raw: &serde_json::Value, now: DateTime<Utc>) -> Option<Preset> {
    let name = raw.get("name")?.as_str()?;
    let models_raw = raw.get("models")?.as_array()?;

    let models: Vec<ModelEntry> = models_raw
        .iter()
        .filter_map(|m| {
            let provider = m.get("provider")?.as_str()?;
            let model_id = m.get("modelId")?.as_str()?;
            Some(ModelEntry {
                provider: provider.to_string(),
                model_id: model_id.to_string(),
                metadata: m.get("metadata").cloned(),
            })
        })
        .collect();

    let timestamp = |key: &str| -> DateTime<Utc> {
        raw.get(key)
            .and_then(|v| v.as_str())
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now)
    };

    Some(Preset {
        id: uuid::Uuid::new_v4().to_string(),
        name: name.to_string(),
        description: raw
            .get("description")
            .and_then(|v| v.as_str())
            .map(String::from),
        created_at: timestamp("createdAt"),
        updated_at: timestamp("updatedAt"),
        models,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store(dir: &TempDir) -> PresetStore {
        PresetStore::new(dir.path().join("model-presets.json"))
    }

    fn sample_models() -> Vec<ModelEntry> {
        vec![
            ModelEntry {
                provider: "anthropic".into(),
                model_id: "claude-sonnet-4-5".into(),
                metadata: None,
            },
            ModelEntry {
                provider: "openai".into(),
                model_id: "gpt-5".into(),
                metadata: Some(serde_json::json!({"limits": {"maxInputTokens": 200000}})),
            },
        ]
    }

    #[test]
    fn list_empty_store() {
        let dir = TempDir::new().unwrap();
        assert!(test_store(&dir).list().is_empty());
    }

    #[test]
    fn save_then_get_roundtrips() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let saved = store
            .save("Coding", sample_models(), Some("daily driver".into()))
            .unwrap();

        let fetched = store.get(&saved.id).unwrap();
        assert_eq!(fetched, saved);
        assert_eq!(fetched.name, "Coding");
        assert_eq!(fetched.models, sample_models());
        assert_eq!(fetched.created_at, fetched.updated_at);
    }

    #[test]
    fn save_generates_unique_ids() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let a = store.save("A", sample_models(), None).unwrap();
        let b = store.save("B", sample_models(), None).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn get_unknown_id_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(test_store(&dir).get("nope").is_none());
    }

    #[test]
    fn delete_removes_and_persists() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let saved = store.save("Doomed", sample_models(), None).unwrap();
        store.delete(&saved.id).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn delete_unknown_id_errors() {
        let dir = TempDir::new().unwrap();
        let err = test_store(&dir).delete("nope").unwrap_err();
        assert!(matches!(err, PresetError::NotFound(_)));
    }

    #[test]
    fn update_merges_and_bumps_updated_at() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let saved = store.save("Old name", sample_models(), None).unwrap();

        let updated = store
            .update(
                &saved.id,
                PresetUpdate {
                    name: Some("New name".into()),
                    description: Some("now described".into()),
                    models: None,
                },
            )
            .unwrap();

        assert_eq!(updated.name, "New name");
        assert_eq!(updated.description.as_deref(), Some("now described"));
        assert_eq!(updated.models, saved.models);
        assert_eq!(updated.created_at, saved.created_at);
        assert!(updated.updated_at >= saved.updated_at);
    }

    #[test]
    fn update_unknown_id_errors() {
        let dir = TempDir::new().unwrap();
        let err = test_store(&dir)
            .update("nope", PresetUpdate::default())
            .unwrap_err();
        assert!(matches!(err, PresetError::NotFound(_)));
    }

    #[test]
    fn export_full_set_is_version_wrapped() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        store.save("A", sample_models(), None).unwrap();
        store.save("B", sample_models(), None).unwrap();

        let export = store.export(None);
        assert_eq!(export.version, 1);
        assert_eq!(export.presets.len(), 2);
    }

    #[test]
    fn export_filters_by_id_ignoring_unknown() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let a = store.save("A", sample_models(), None).unwrap();
        store.save("B", sample_models(), None).unwrap();

        let export = store.export(Some(&[a.id.clone(), "bogus".to_string()]));
        assert_eq!(export.presets.len(), 1);
        assert_eq!(export.presets[0].id, a.id);
    }

    #[test]
    fn export_then_import_roundtrips_with_fresh_ids() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let original = store
            .save("Roundtrip", sample_models(), Some("desc".into()))
            .unwrap();

        let json = serde_json::to_string(&store.export(None)).unwrap();
        let report = store.import(&json).unwrap();

        assert_eq!(report.skipped, 0);
        assert_eq!(report.imported.len(), 1);
        let copy = &report.imported[0];
        assert_ne!(copy.id, original.id);
        assert_eq!(copy.name, original.name);
        assert_eq!(copy.description, original.description);
        assert_eq!(copy.models, original.models);
        assert_eq!(store.list().len(), 2);
    }

    #[test]
    fn import_accepts_bare_array() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let json = r#"[{"name": "Solo", "models": [{"provider": "openai", "modelId": "gpt-5"}]}]"#;
        let report = store.import(json).unwrap();
        assert_eq!(report.imported.len(), 1);
        assert_eq!(report.imported[0].models[0].model_id, "gpt-5");
    }

    #[test]
    fn import_skips_malformed_entries() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let json = r#"{
            "version": 1,
            "presets": [
                {"name": "Good", "models": [{"provider": "openai", "modelId": "gpt-5"}]},
                {"name": 42, "models": []},
                {"models": [{"provider": "openai", "modelId": "gpt-5"}]},
                {"name": "No models key"}
            ]
        }"#;
        let report = store.import(json).unwrap();
        assert_eq!(report.imported.len(), 1);
        assert_eq!(report.skipped, 3);
        assert_eq!(report.imported[0].name, "Good");
    }

    #[test]
    fn import_drops_malformed_model_rows() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let json = r#"[{
            "name": "Mixed",
            "models": [
                {"provider": "openai", "modelId": "gpt-5"},
                {"provider": "openai"},
                {"modelId": "no-provider"},
                {"provider": 5, "modelId": "gpt-5"}
            ]
        }]"#;
        let report = store.import(json).unwrap();
        assert_eq!(report.imported[0].models.len(), 1);
    }

    #[test]
    fn import_preserves_metadata_verbatim() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let json = r#"[{
            "name": "Meta",
            "models": [{
                "provider": "anthropic",
                "modelId": "custom-model",
                "metadata": {"pricing": {"inputCostPerMTok": 3.0}, "vendorNote": "hi"}
            }]
        }]"#;
        let report = store.import(json).unwrap();
        let meta = report.imported[0].models[0].metadata.as_ref().unwrap();
        assert_eq!(meta["vendorNote"], "hi");
        assert_eq!(meta["pricing"]["inputCostPerMTok"], 3.0);
    }

    #[test]
    fn import_all_invalid_fails() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let json = r#"{"version": 1, "presets": [{"name": 1, "models": []}, {"nope": true}]}"#;
        let err = store.import(json).unwrap_err();
        assert!(matches!(err, PresetError::EmptyImport));
        assert!(store.list().is_empty());
    }

    #[test]
    fn import_unparsable_json_fails() {
        let dir = TempDir::new().unwrap();
        let err = test_store(&dir).import("{oops").unwrap_err();
        assert!(matches!(err, PresetError::InvalidPayload(_)));
    }

    #[test]
    fn import_preserves_parseable_timestamps() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let json = r#"[{
            "name": "Dated",
            "createdAt": "2025-03-01T10:00:00Z",
            "updatedAt": "2025-04-01T10:00:00Z",
            "models": [{"provider": "openai", "modelId": "gpt-5"}]
        }]"#;
        let report = store.import(json).unwrap();
        let p = &report.imported[0];
        assert_eq!(p.created_at.to_rfc3339(), "2025-03-01T10:00:00+00:00");
        assert_eq!(p.updated_at.to_rfc3339(), "2025-04-01T10:00:00+00:00");
    }
}
