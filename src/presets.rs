use crate::error::{Result, SimError};
use crate::settings::SimulationSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named preset containing simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: SimulationSettings,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: SimulationSettings,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl PresetManager {
    pub fn new() -> Self {
        let mut manager = Self::builtin_only();
        manager.load_user_presets();
        manager
    }

    /// Manager without touching the user's config directory
    pub fn builtin_only() -> Self {
        Self {
            builtin: builtin_presets(),
            user: Vec::new(),
        }
    }

    /// Get the presets directory path
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("collision-simulator").join("presets"))
    }

    /// Load user presets from disk
    fn load_user_presets(&mut self) {
        let Some(dir) = Self::presets_dir() else {
            return;
        };
        let Ok(entries) = fs::read_dir(&dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.extension().is_some_and(|e| e == "json") {
                continue;
            }
            match fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|content| {
                    serde_json::from_str::<Preset>(&content).map_err(|e| e.to_string())
                }) {
                Ok(preset) => self.user.push(preset),
                Err(e) => log::warn!("Skipping preset {}: {}", path.display(), e),
            }
        }
        log::debug!("Loaded {} user presets", self.user.len());
    }

    /// Save a preset to disk
    pub fn save_preset(&mut self, preset: Preset) -> Result<PathBuf> {
        let dir = Self::presets_dir()
            .ok_or_else(|| SimError::Preset("could not determine config directory".to_string()))?;

        fs::create_dir_all(&dir)
            .map_err(|e| SimError::config("failed to create presets directory", e))?;

        let path = dir.join(format!("{}.json", sanitize_file_name(&preset.name)));
        let json = serde_json::to_string_pretty(&preset)?;
        fs::write(&path, json)
            .map_err(|e| SimError::config(format!("failed to write {}", path.display()), e))?;

        match self.user.iter_mut().find(|p| p.name == preset.name) {
            Some(existing) => *existing = preset,
            None => self.user.push(preset),
        }

        Ok(path)
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets().find(|p| p.name.eq_ignore_ascii_case(name))
    }
}

fn builtin_presets() -> Vec<Preset> {
    vec![
        Preset::new(
            "Classic",
            "1500 small particles in a 1200x850 box",
            SimulationSettings::default(),
        ),
        Preset::new(
            "Sparse",
            "A few particles with long free paths",
            SimulationSettings {
                particle_count: 150,
                ..Default::default()
            },
        ),
        Preset::new(
            "Crowded",
            "Dense gas that meanders constantly",
            SimulationSettings {
                particle_count: 3000,
                initial_radius: 6,
                ..Default::default()
            },
        ),
        Preset::new(
            "Giants",
            "Large particles in a small population",
            SimulationSettings {
                particle_count: 60,
                initial_radius: 30,
                ..Default::default()
            },
        ),
        Preset::new(
            "Slow Motion",
            "Short steps at a relaxed tick rate",
            SimulationSettings {
                speed: 4,
                tick_interval_ms: 120,
                ..Default::default()
            },
        ),
    ]
}

/// Keep alphanumerics, '-' and '_'; everything else becomes '_'
fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_presets_are_valid() {
        let manager = PresetManager::builtin_only();
        assert_eq!(manager.builtin.len(), 5);
        for preset in manager.all_presets() {
            assert!(
                preset.settings.validate().is_ok(),
                "preset {} is invalid",
                preset.name
            );
        }
    }

    #[test]
    fn test_find_ignores_case() {
        let manager = PresetManager::builtin_only();
        let preset = manager.find("slow motion").unwrap();
        assert_eq!(preset.settings.speed, 4);
        assert!(manager.find("nope").is_none());
    }

    #[test]
    fn test_classic_matches_defaults() {
        let manager = PresetManager::builtin_only();
        assert_eq!(
            manager.find("Classic").unwrap().settings,
            SimulationSettings::default()
        );
        assert_eq!(manager.all_presets().next().unwrap().name, "Classic");
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("Slow Motion"), "Slow_Motion");
        assert_eq!(sanitize_file_name("a/b\\c-d_e"), "a_b_c-d_e");
    }
}
