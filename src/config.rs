use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    pub search_debounce_ms: u64,
    pub default_page_size: usize,
    pub page_size_options: Vec<usize>,
    pub fetch_latency_ms: u64,
    pub register_save_latency_ms: u64,
    pub settings_save_latency_ms: u64,
    pub saved_indicator_ms: u64,
    pub export_dir: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            search_debounce_ms: 300,
            default_page_size: 10,
            page_size_options: vec![5, 10, 25, 50, 100],
            fetch_latency_ms: 300,
            register_save_latency_ms: 600,
            settings_save_latency_ms: 800,
            saved_indicator_ms: 2_000,
            export_dir: None,
        }
    }
}

impl DashboardConfig {
    /// Reads a JSON config file and layers it over the defaults. A missing
    /// file yields the defaults.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "no dashboard config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let update: serde_json::Value = serde_json::from_str(&raw)?;
        Self::default().merged(update)
    }

    pub fn merged(&self, update: serde_json::Value) -> AppResult<Self> {
        let mut merged = serde_json::to_value(self)?;
        merge_json(&mut merged, update);
        let config: DashboardConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.page_size_options.is_empty() || self.page_size_options.contains(&0) {
            return Err(AppError::Validation(
                "pageSizeOptions must be non-empty and positive".to_string(),
            ));
        }
        if !self.page_size_options.contains(&self.default_page_size) {
            return Err(AppError::Validation(format!(
                "defaultPageSize {} is not one of pageSizeOptions",
                self.default_page_size
            )));
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn saved_indicator(&self) -> Duration {
        Duration::from_millis(self.saved_indicator_ms)
    }
}

pub(crate) fn merge_json(target: &mut serde_json::Value, update: serde_json::Value) {
    match (target, update) {
        (serde_json::Value::Object(target_map), serde_json::Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_json(target_map.entry(key).or_insert(serde_json::Value::Null), value);
            }
        }
        (target, update) => {
            *target = update;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DashboardConfig;
    use crate::errors::AppError;
    use serde_json::json;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = DashboardConfig::load(&dir.path().join("dashboard.json")).expect("config");
        assert_eq!(config, DashboardConfig::default());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, r#"{"searchDebounceMs": 150, "defaultPageSize": 25}"#).expect("write config");
        let config = DashboardConfig::load(&path).expect("config");
        assert_eq!(config.search_debounce_ms, 150);
        assert_eq!(config.default_page_size, 25);
        assert_eq!(config.page_size_options, vec![5, 10, 25, 50, 100]);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("dashboard.json");
        std::fs::write(&path, "{not json").expect("write config");
        assert!(DashboardConfig::load(&path).is_err());
    }

    #[test]
    fn default_page_size_must_be_offered() {
        let err = DashboardConfig::default()
            .merged(json!({"defaultPageSize": 7}))
            .expect_err("7 is not an option");
        assert!(matches!(err, AppError::Validation(_)));
    }
}
