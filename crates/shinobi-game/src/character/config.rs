//! Character tuning and reference points

use glam::Vec2;
use serde::{Deserialize, Serialize};
use shinobi_core::{ConfigError, LayerMask};

/// Character configuration. Offsets are local to the body origin, written for
/// a right-facing character; they mirror with facing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    /// Walking speed in units per second
    pub walk_speed: f32,
    /// Running speed in units per second (run modifier held)
    pub run_speed: f32,
    /// Upward impulse applied on jump
    pub jump_impulse: f32,
    /// Radius of the melee hit circle
    pub attack_radius: f32,
    /// Center of the melee hit circle
    pub attack_origin: Option<Vec2>,
    /// Where projectiles are spawned
    pub shoot_origin: Option<Vec2>,
    /// Center of the ground probe (the feet)
    pub ground_probe: Option<Vec2>,
    /// Radius of the ground probe
    pub ground_probe_radius: f32,
    /// Layers that count as ground
    pub ground_layers: LayerMask,
    /// Layers melee attacks can hit
    pub enemy_layers: LayerMask,
    /// Half size of the body collider
    pub body_half_extents: Vec2,
    /// Body mass; the jump changes vertical speed by `jump_impulse / mass`
    pub mass: f32,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            walk_speed: 4.0,
            run_speed: 8.0,
            jump_impulse: 12.0,
            attack_radius: 0.5,
            attack_origin: Some(Vec2::new(0.7, 0.1)),
            shoot_origin: Some(Vec2::new(0.6, 0.3)),
            ground_probe: Some(Vec2::new(0.0, -0.9)),
            ground_probe_radius: 0.2,
            ground_layers: LayerMask::GROUND,
            enemy_layers: LayerMask::ENEMY,
            body_half_extents: Vec2::new(0.4, 0.9),
            mass: 1.0,
        }
    }
}

impl CharacterConfig {
    /// Speed for the current run modifier state
    pub fn speed(&self, running: bool) -> f32 {
        if running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    /// Check everything the per-frame update relies on
    pub fn validate(&self) -> Result<ValidCharacterConfig, ConfigError> {
        let attack_origin = self
            .attack_origin
            .ok_or(ConfigError::MissingReference("attack_origin"))?;
        let shoot_origin = self
            .shoot_origin
            .ok_or(ConfigError::MissingReference("shoot_origin"))?;
        let ground_probe = self
            .ground_probe
            .ok_or(ConfigError::MissingReference("ground_probe"))?;

        ConfigError::check_non_negative("walk_speed", self.walk_speed)?;
        ConfigError::check_non_negative("run_speed", self.run_speed)?;
        ConfigError::check_non_negative("jump_impulse", self.jump_impulse)?;
        ConfigError::check_positive("attack_radius", self.attack_radius)?;
        ConfigError::check_positive("ground_probe_radius", self.ground_probe_radius)?;
        ConfigError::check_positive("mass", self.mass)?;
        ConfigError::check_positive("body_half_extents.x", self.body_half_extents.x)?;
        ConfigError::check_positive("body_half_extents.y", self.body_half_extents.y)?;

        Ok(ValidCharacterConfig {
            config: self.clone(),
            attack_origin,
            shoot_origin,
            ground_probe,
        })
    }
}

/// A checked configuration with its reference points resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ValidCharacterConfig {
    config: CharacterConfig,
    pub(crate) attack_origin: Vec2,
    pub(crate) shoot_origin: Vec2,
    pub(crate) ground_probe: Vec2,
}

impl ValidCharacterConfig {
    pub fn config(&self) -> &CharacterConfig {
        &self.config
    }
}
