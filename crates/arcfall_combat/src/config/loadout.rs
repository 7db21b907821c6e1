//! Class loadouts (Wizard / Fighter / Archer / кастомные из RON)
//!
//! Loadout = class stats + список способностей, по одной на слот.
//! Применяется при attach контроллера к бойцу.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::{AbilityConfig, Slot};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read loadout file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse loadout: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid loadout {class}: {reason}")]
    Invalid { class: String, reason: String },
}

/// Статы класса, которые контроллер применяет к бойцу при attach
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassStats {
    pub max_health: f32,
    pub run_speed: f32,
    pub jump_velocity: f32,
}

impl Default for ClassStats {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            run_speed: 8.0,
            jump_velocity: 12.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassLoadout {
    pub class: String,
    #[serde(default)]
    pub stats: ClassStats,
    pub abilities: Vec<AbilityConfig>,
}

impl ClassLoadout {
    pub fn ability(&self, slot: Slot) -> Option<&AbilityConfig> {
        self.abilities.iter().find(|ability| ability.slot == slot)
    }

    /// Парсит loadout из RON и проверяет уникальность слотов
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let loadout: ClassLoadout = ron::from_str(source)?;
        loadout.validate()?;
        Ok(loadout)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let loadout = Self::from_ron_str(&source)?;
        crate::log_info(&format!(
            "Loaded loadout '{}' ({} abilities) from {}",
            loadout.class,
            loadout.abilities.len(),
            path.display()
        ));
        Ok(loadout)
    }

    /// Структурные ошибки — Err; деградирующие значения — только warning в лог
    pub fn validate(&self) -> Result<(), ConfigError> {
        for slot in Slot::ALL {
            let count = self.abilities.iter().filter(|a| a.slot == slot).count();
            if count > 1 {
                return Err(ConfigError::Invalid {
                    class: self.class.clone(),
                    reason: format!("{} abilities bound to slot {}", count, slot.as_str()),
                });
            }
        }

        for ability in &self.abilities {
            for warning in ability.lint() {
                crate::log_warning(&format!("[{}] {}", self.class, warning));
            }
        }

        Ok(())
    }
}
