//! Demo settings
//!
//! Read from `~/.config/shinobi/settings.toml`, or from a path given on the
//! command line. Missing fields keep their defaults.

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use shinobi_core::{ConfigError, TimeConfig};
use shinobi_game::{CharacterConfig, ProjectileConfig};
use shinobi_physics::PhysicsConfig;
use tracing::{info, warn};

/// All demo settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub time: TimeConfig,
    pub physics: PhysicsSettings,
    pub character: CharacterConfig,
    pub projectile: ProjectileConfig,
    /// When false the ranged attack only plays its animation
    pub projectiles_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            time: TimeConfig::default(),
            physics: PhysicsSettings::default(),
            character: CharacterConfig::default(),
            projectile: ProjectileConfig::default(),
            projectiles_enabled: true,
        }
    }
}

impl Settings {
    fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("shinobi").join("settings.toml"))
    }

    /// Load from `path`, or the default location when `None`. Falls back to defaults.
    pub fn load(path: Option<&Path>) -> Self {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::settings_path() {
                Some(path) => path,
                None => {
                    warn!("Could not determine config directory");
                    return Self::default();
                }
            },
        };

        if !path.exists() {
            info!("No settings file at {:?}, using defaults", path);
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match Self::parse(&content) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    warn!("Failed to parse settings: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read settings file: {}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Values the demo loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time.validate()
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Physics world parameters, stepping at the simulation's fixed timestep
    pub fn physics_config(&self) -> PhysicsConfig {
        PhysicsConfig {
            gravity: self.physics.gravity,
            timestep: self.time.fixed_timestep,
        }
    }

    pub fn projectile_template(&self) -> Option<ProjectileConfig> {
        self.projectiles_enabled.then(|| self.projectile.clone())
    }
}

/// Physics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: Vec2,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
        }
    }
}
