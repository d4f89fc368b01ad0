use crate::error::{Result, SimError};
use crate::settings::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current on-disk format version
pub const CONFIG_VERSION: u32 = 1;

/// Complete application configuration for export/import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Version field for future compatibility
    pub version: u32,
    /// All simulation settings
    pub settings: SimulationSettings,
}

impl AppConfig {
    pub fn new(settings: SimulationSettings) -> Self {
        Self {
            version: CONFIG_VERSION,
            settings,
        }
    }

    /// Export config to a JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| SimError::config(format!("failed to write {}", path.display()), e))?;
        log::info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Import config from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SimError::config(format!("failed to read {}", path.display()), e))?;
        let config: AppConfig = serde_json::from_str(&content)?;
        if config.version > CONFIG_VERSION {
            log::warn!(
                "{} has version {}, newer than supported {}",
                path.display(),
                config.version,
                CONFIG_VERSION
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_file_save_and_load() {
        let config = AppConfig::new(SimulationSettings {
            width: 640,
            height: 480,
            particle_count: 300,
            initial_radius: 6,
            speed: 7,
            tick_interval_ms: 30,
            min_radius: 3,
            max_radius: 20,
            radius_step: 2,
            seed: Some(2024),
        });

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_settings_fields_fall_back() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"{ "version": 1, "settings": { "particle_count": 42 } }"#,
        )
        .unwrap();

        let loaded = AppConfig::load_from_file(temp_file.path()).unwrap();
        assert_eq!(loaded.settings.particle_count, 42);
        assert_eq!(loaded.settings.max_radius, 50);
    }

    #[test]
    fn test_invalid_config_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "not valid json").unwrap();

        let result = AppConfig::load_from_file(temp_file.path());
        assert!(matches!(result, Err(SimError::Json(_))));
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::load_from_file(Path::new("/nonexistent/path/config.json"));
        assert!(matches!(result, Err(SimError::Config { .. })));
    }
}
