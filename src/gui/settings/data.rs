use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    analysis::ModelSize,
    core::models::MAX_KEYWORDS,
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const MAX_PARALLELISM: usize = 16;

fn default_keyword_count() -> usize {
    MAX_KEYWORDS
}

fn default_parallelism() -> usize {
    std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1).min(4)
}

fn default_dark_mode() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsData {
    #[serde(default)]
    pub model_size: ModelSize,
    #[serde(default = "default_keyword_count")]
    pub keyword_count: usize,
    #[serde(default = "default_parallelism")]
    pub max_parallelism: usize,
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
    #[serde(default)]
    pub last_export_dir: Option<PathBuf>,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            model_size: ModelSize::default(),
            keyword_count: default_keyword_count(),
            max_parallelism: default_parallelism(),
            dark_mode: default_dark_mode(),
            last_export_dir: None,
        }
    }
}

impl SettingsData {
    /// Pulls hand-edited values back into their valid ranges.
    pub fn sanitized(mut self) -> Self {
        self.keyword_count = self.keyword_count.clamp(1, MAX_KEYWORDS);
        self.max_parallelism = self.max_parallelism.clamp(1, MAX_PARALLELISM);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: SettingsData = serde_json::from_str(r#"{ "dark_mode": false }"#).unwrap();
        assert!(!settings.dark_mode);
        assert_eq!(settings.keyword_count, MAX_KEYWORDS);
        assert_eq!(settings.model_size, ModelSize::Base);
        assert!(settings.max_parallelism >= 1);
        assert!(settings.last_export_dir.is_none());
    }

    #[test]
    fn test_sanitized_clamps_values() {
        let settings =
            SettingsData { keyword_count: 40, max_parallelism: 0, ..SettingsData::default() }
                .sanitized();
        assert_eq!(settings.keyword_count, MAX_KEYWORDS);
        assert_eq!(settings.max_parallelism, 1);

        let settings = SettingsData { keyword_count: 0, ..SettingsData::default() }.sanitized();
        assert_eq!(settings.keyword_count, 1);
    }

    #[test]
    fn test_round_trip_through_json() {
        let settings = SettingsData {
            model_size: ModelSize::Large,
            last_export_dir: Some(PathBuf::from("/tmp/exports")),
            ..SettingsData::default()
        };
        let json = serde_json::to_string(&settings).unwrap();
        let loaded: SettingsData = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, settings);
    }
}
