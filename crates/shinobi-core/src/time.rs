//! Frame timing
//!
//! Clamps raw frame deltas, applies time scale and pause, and feeds a
//! fixed-step accumulator so simulation ticks do not depend on render rate.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Configuration for game time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Simulation seconds per real second
    pub time_scale: f32,
    /// Fixed timestep for simulation ticks (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

impl TimeConfig {
    /// Reject settings under which fixed steps never run or never stop
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("time.time_scale", self.time_scale)?;
        ConfigError::check_positive("time.fixed_timestep", self.fixed_timestep)?;
        ConfigError::check_positive("time.max_delta_time", self.max_delta_time)?;
        Ok(())
    }
}

/// Game time tracking
#[derive(Debug, Clone, Default)]
pub struct GameTime {
    pub config: TimeConfig,
    /// Scaled time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    pub unscaled_delta_time: f32,
    pub frame_count: u64,
    pub paused: bool,
    fixed_accumulator: f32,
}

impl GameTime {
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Advance by the raw delta measured since the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.clamp(0.0, self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Drain the accumulator and return how many fixed ticks to run this frame
    pub fn fixed_steps(&mut self) -> u32 {
        if self.config.fixed_timestep.is_nan() || self.config.fixed_timestep <= 0.0 {
            return 0;
        }
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// Interpolation factor between the last two fixed ticks
    pub fn fixed_interpolation(&self) -> f32 {
        self.fixed_accumulator / self.config.fixed_timestep
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed)
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(TimeConfig::default().validate().is_ok());

        for config in [
            TimeConfig {
                fixed_timestep: 0.0,
                ..Default::default()
            },
            TimeConfig {
                fixed_timestep: f32::NAN,
                ..Default::default()
            },
            TimeConfig {
                time_scale: 0.0,
                ..Default::default()
            },
            TimeConfig {
                time_scale: -1.0,
                ..Default::default()
            },
            TimeConfig {
                max_delta_time: 0.0,
                ..Default::default()
            },
        ] {
            assert!(config.validate().is_err(), "{:?}", config);
        }
    }

    #[test]
    fn test_zero_timestep_runs_no_steps() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.0,
            ..Default::default()
        });
        time.update(0.02);
        assert_eq!(time.fixed_steps(), 0);
    }

    #[test]
    fn test_game_time() {
        let mut time = GameTime::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);

        time.pause();
        time.update(0.016);
        assert_eq!(time.delta_time, 0.0);
    }

    #[test]
    fn test_delta_clamped() {
        let mut time = GameTime::default();
        time.update(3.0);
        assert_eq!(time.delta_time, 0.25);
        time.update(-1.0);
        assert_eq!(time.delta_time, 0.0);
    }

    #[test]
    fn test_fixed_steps_accumulate() {
        let mut time = GameTime::new(TimeConfig {
            fixed_timestep: 0.01,
            ..Default::default()
        });
        time.update(0.035);
        assert_eq!(time.fixed_steps(), 3);
        assert!(time.fixed_interpolation() > 0.0);
        time.update(0.006);
        assert_eq!(time.fixed_steps(), 1);
    }
}
