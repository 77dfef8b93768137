use std::path::PathBuf;

/// Root directory for persisted app state, respecting AIDESK_HOME and
/// XDG_DATA_HOME in that order.
pub fn data_dir() -> PathBuf {
    if let Ok(home) = std::env::var("AIDESK_HOME") {
        return PathBuf::from(home);
    }
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join(".local")
                .join("share")
        })
        .join("aidesk")
}

/// Config directory, respecting XDG_CONFIG_HOME.
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("~"))
                .join(".config")
        })
        .join("aidesk")
}

pub fn presets_path() -> PathBuf {
    data_dir().join("model-presets.json")
}

pub fn cost_history_path() -> PathBuf {
    data_dir().join("cost-history.json")
}

pub fn theme_registry_path() -> PathBuf {
    data_dir().join("icon-themes.json")
}

pub fn themes_root() -> PathBuf {
    data_dir().join("icon-themes")
}

/// Provider credential/config map. JSONC, read-only from this crate.
pub fn providers_config_path() -> PathBuf {
    config_dir().join("providers.jsonc")
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test so parallel runs never race on the env var.
    #[test]
    fn aidesk_home_overrides_and_anchors_store_paths() {
        std::env::set_var("AIDESK_HOME", "/tmp/test_aidesk_home");
        let dir = data_dir();
        let presets = presets_path();
        let costs = cost_history_path();
        let registry = theme_registry_path();
        let themes = themes_root();
        std::env::remove_var("AIDESK_HOME");

        assert_eq!(dir, PathBuf::from("/tmp/test_aidesk_home"));
        assert_eq!(presets, PathBuf::from("/tmp/test_aidesk_home/model-presets.json"));
        assert_eq!(costs, PathBuf::from("/tmp/test_aidesk_home/cost-history.json"));
        assert_eq!(registry, PathBuf::from("/tmp/test_aidesk_home/icon-themes.json"));
        assert_eq!(themes, PathBuf::from("/tmp/test_aidesk_home/icon-themes"));
    }

    #[test]
    fn config_dir_uses_xdg_when_set() {
        std::env::set_var("XDG_CONFIG_HOME", "/tmp/test_xdg_config");
        let path = providers_config_path();
        std::env::remove_var("XDG_CONFIG_HOME");
        assert_eq!(path, PathBuf::from("/tmp/test_xdg_config/aidesk/providers.jsonc"));
    }
}
