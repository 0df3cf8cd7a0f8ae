//! Configuration System
//!
//! Loads tuning parameters from `force_tuning.toml`: simulation pacing,
//! appearance-copy timings, meditation ritual scoring, and one
//! [`ProgressionConfig`] per pawn archetype.

use bevy_ecs::prelude::*;
use force_events::{TICKS_PER_DAY, TICKS_PER_HOUR, TICKS_PER_YEAR};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::progression::{ProgressionConfig, CHECK_INTERVAL};

/// Default tuning file path
pub const DEFAULT_TUNING_PATH: &str = "force_tuning.toml";

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("no archetypes configured")]
    NoArchetypes,
}

/// Top-level configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub ritual: RitualConfig,
    #[serde(default = "default_archetypes")]
    pub archetypes: BTreeMap<String, ProgressionConfig>,
}

/// Simulation pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub default_ticks: u64,
    /// Ticks between two progression checks of the same pawn
    pub check_interval: u32,
    pub pawn_count: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            default_ticks: TICKS_PER_YEAR,
            check_interval: CHECK_INTERVAL,
            pawn_count: 24,
        }
    }
}

/// Appearance-copy job timings
#[derive(Resource, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Ticks spent focusing before the copy takes hold
    pub channel_ticks: u32,
    /// How long a copied appearance lasts
    pub copy_duration_ticks: u64,
    /// Minimum Force level able to copy another pawn
    pub min_level: u32,
    /// Mean days between copy attempts for an eligible pawn
    pub mean_days_between_copies: f32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            channel_ticks: TICKS_PER_HOUR as u32,
            copy_duration_ticks: TICKS_PER_DAY * 2,
            min_level: 3,
            mean_days_between_copies: 10.0,
        }
    }
}

/// Meditation ritual schedule and quality factors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RitualConfig {
    pub interval_ticks: u64,
    pub min_participants: usize,
    pub base_quality: f32,
    pub per_participant: f32,
    pub participant_cap: f32,
    pub per_mean_level: f32,
    pub level_cap: f32,
    pub leader_bonus: f32,
}

impl Default for RitualConfig {
    fn default() -> Self {
        Self {
            interval_ticks: TICKS_PER_DAY * 15,
            min_participants: 2,
            base_quality: 0.2,
            per_participant: 0.05,
            participant_cap: 0.3,
            per_mean_level: 0.03,
            level_cap: 0.3,
            leader_bonus: 0.15,
        }
    }
}

fn default_archetypes() -> BTreeMap<String, ProgressionConfig> {
    let mut archetypes = BTreeMap::new();
    archetypes.insert(
        "latent_colonist".to_string(),
        ProgressionConfig {
            mean_time_to_activate_sensitivity_years: 30.0,
            mean_time_between_level_ups_years: 2.0,
            maximum_level: 10,
            cap_at_maximum: true,
        },
    );
    archetypes.insert(
        "jedi_initiate".to_string(),
        ProgressionConfig {
            mean_time_to_activate_sensitivity_years: 8.0,
            mean_time_between_level_ups_years: 0.5,
            maximum_level: 20,
            cap_at_maximum: true,
        },
    );
    archetypes.insert(
        "sith_acolyte".to_string(),
        ProgressionConfig {
            mean_time_to_activate_sensitivity_years: 6.0,
            mean_time_between_level_ups_years: 0.4,
            maximum_level: 25,
            cap_at_maximum: false,
        },
    );
    archetypes
}

impl Default for Config {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            appearance: AppearanceConfig::default(),
            ritual: RitualConfig::default(),
            archetypes: default_archetypes(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        if config.archetypes.is_empty() {
            return Err(ConfigError::NoArchetypes);
        }
        Ok(config)
    }

    /// Load configuration from a path, or use defaults if it cannot be read
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(path.as_ref()).unwrap_or_else(|e| {
            tracing::warn!(
                "Could not load {}: {}. Using defaults.",
                path.as_ref().display(),
                e
            );
            Self::default()
        })
    }

    /// Serialize as pretty TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Builds the archetype registry resource from this config.
    pub fn archetype_registry(&self) -> ArchetypeRegistry {
        ArchetypeRegistry::new(self.archetypes.clone())
    }
}

/// Progression tuning per archetype id
#[derive(Resource, Debug, Clone, Default)]
pub struct ArchetypeRegistry {
    archetypes: BTreeMap<String, ProgressionConfig>,
}

impl ArchetypeRegistry {
    /// Degenerate entries are kept (they fire on every check) but logged.
    pub fn new(archetypes: BTreeMap<String, ProgressionConfig>) -> Self {
        for (id, config) in &archetypes {
            if config.is_degenerate() {
                tracing::warn!(
                    "Archetype '{}' has a non-positive mean time; its checks will always fire",
                    id
                );
            }
        }
        Self { archetypes }
    }

    pub fn get(&self, id: &str) -> Option<&ProgressionConfig> {
        self.archetypes.get(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.archetypes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}
