//! Projectile flight, range limit and impact resolution
//!
//! A projectile flies along its own local right axis at constant speed. It is
//! destroyed when it gets farther than `max_distance` from where it was
//! spawned, when it touches an enemy (taking the enemy with it) or when it
//! touches ground. Everything else it passes through.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use shinobi_core::{ConfigError, Entity, LayerMask, Tag, Transform2D};
use shinobi_physics::{Overlap, SpatialQuery};
use tracing::debug;

use crate::commands::{ProjectileSpawn, WorldCommands};

/// Projectile template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Units per second along local right
    pub speed: f32,
    /// Distance from the spawn point at which the projectile expires
    pub max_distance: f32,
    /// Collider radius used for impact checks
    pub radius: f32,
    /// Layers checked for impacts
    pub hit_layers: LayerMask,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 15.0,
            max_distance: 15.0,
            radius: 0.15,
            hit_layers: LayerMask::ALL,
        }
    }
}

impl ProjectileConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::check_positive("projectile.speed", self.speed)?;
        ConfigError::check_positive("projectile.max_distance", self.max_distance)?;
        ConfigError::check_positive("projectile.radius", self.radius)?;
        Ok(())
    }
}

/// Where a projectile stands after an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileStatus {
    Flying,
    /// Went past its maximum distance
    Expired,
    /// Touched an enemy; both are destroyed
    HitEnemy(Entity),
    /// Absorbed by terrain
    HitGround(Entity),
}

impl ProjectileStatus {
    pub fn is_finished(self) -> bool {
        self != ProjectileStatus::Flying
    }
}

pub struct ProjectileController {
    entity: Entity,
    config: ProjectileConfig,
    transform: Transform2D,
    origin: Vec2,
    status: ProjectileStatus,
}

impl ProjectileController {
    pub fn new(entity: Entity, config: ProjectileConfig, spawn: &ProjectileSpawn) -> Self {
        Self {
            entity,
            config,
            transform: Transform2D::from_position_scale(spawn.position, spawn.scale),
            origin: spawn.position,
            status: ProjectileStatus::Flying,
        }
    }

    /// Entity this controller moves and destroys
    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Template the projectile was spawned from
    pub fn config(&self) -> &ProjectileConfig {
        &self.config
    }

    /// Current world position
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Spawn point, used for the range check
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Position and flight direction
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// Result of the last update
    pub fn status(&self) -> ProjectileStatus {
        self.status
    }

    /// Straight-line distance from the spawn point
    pub fn travelled(&self) -> f32 {
        self.origin.distance(self.transform.position)
    }

    /// Move, check range, then resolve contacts. A finished projectile does nothing.
    ///
    /// The first Enemy or Ground contact finishes the projectile, so each
    /// contact is resolved at most once without tracking overlap history.
    pub fn update(
        &mut self,
        dt: f32,
        world: &dyn SpatialQuery,
        commands: &mut WorldCommands,
    ) -> ProjectileStatus {
        if self.status.is_finished() {
            return self.status;
        }

        let step = self.transform.right() * self.config.speed * dt;
        self.transform.translate(step);

        if self.travelled() > self.config.max_distance {
            debug!(entity = %self.entity, travelled = self.travelled(), "projectile expired");
            commands.destroy(self.entity);
            self.status = ProjectileStatus::Expired;
            return self.status;
        }

        let overlaps: Vec<Overlap> = world
            .overlap_circle(self.transform.position, self.config.radius, self.config.hit_layers)
            .into_iter()
            .filter(|o| o.entity != self.entity)
            .collect();

        for overlap in overlaps {
            if self.on_collision_enter(overlap, commands).is_finished() {
                break;
            }
        }

        self.status
    }

    /// Resolve first contact with another entity
    pub fn on_collision_enter(&mut self, other: Overlap, commands: &mut WorldCommands) -> ProjectileStatus {
        if self.status.is_finished() {
            return self.status;
        }

        match other.tag {
            Tag::Enemy => {
                debug!(entity = %self.entity, enemy = %other.entity, "projectile hit enemy");
                commands.destroy(other.entity);
                commands.destroy(self.entity);
                self.status = ProjectileStatus::HitEnemy(other.entity);
            }
            Tag::Ground => {
                debug!(entity = %self.entity, "projectile hit ground");
                commands.destroy(self.entity);
                self.status = ProjectileStatus::HitGround(other.entity);
            }
            Tag::Other => {}
        }
        self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shinobi_core::Layer;

    const DT: f32 = 1.0 / 60.0;

    /// Circles with tags
    #[derive(Default)]
    struct Field(Vec<(Entity, Tag, Vec2, f32)>);

    impl SpatialQuery for Field {
        fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> Vec<Overlap> {
            self.0
                .iter()
                .filter(|(_, tag, _, _)| match tag {
                    Tag::Enemy => layers.contains(Layer::Enemy),
                    Tag::Ground => layers.contains(Layer::Ground),
                    Tag::Other => layers.contains(Layer::Character),
                })
                .filter(|(_, _, p, r)| p.distance(center) <= radius + r)
                .map(|(entity, tag, _, _)| Overlap {
                    entity: *entity,
                    tag: *tag,
                })
                .collect()
        }
    }

    fn projectile(scale_x: f32) -> ProjectileController {
        ProjectileController::new(
            Entity::from_raw(100, 0),
            ProjectileConfig {
                radius: 0.05,
                ..Default::default()
            },
            &ProjectileSpawn {
                position: Vec2::ZERO,
                scale: Vec2::new(scale_x, 1.0),
            },
        )
    }

    #[test]
    fn test_default_template() {
        let config = ProjectileConfig::default();
        assert_eq!(config.speed, 15.0);
        assert_eq!(config.max_distance, 15.0);
        assert!(config.validate().is_ok());
        assert!(ProjectileConfig {
            speed: 0.0,
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_flies_straight_in_scale_direction() {
        let world = Field::default();
        let mut commands = WorldCommands::new();

        let mut right = projectile(1.0);
        let mut left = projectile(-2.0);
        let mut last = 0.0;
        for _ in 0..10 {
            right.update(DT, &world, &mut commands);
            left.update(DT, &world, &mut commands);
            assert_eq!(right.position().y, 0.0);
            assert!(right.travelled() >= last);
            last = right.travelled();
        }
        assert!((right.position().x - 2.5).abs() < 1e-4);
        assert!((left.position().x + 2.5).abs() < 1e-4);
        assert!(commands.is_empty());
    }

    #[test]
    fn test_expires_after_max_distance() {
        let world = Field::default();
        let mut commands = WorldCommands::new();
        let mut dart = projectile(1.0);

        for _ in 0..59 {
            assert_eq!(dart.update(DT, &world, &mut commands), ProjectileStatus::Flying);
        }
        let mut frames = 59;
        while !dart.status().is_finished() && frames < 61 {
            dart.update(DT, &world, &mut commands);
            frames += 1;
        }

        assert_eq!(dart.status(), ProjectileStatus::Expired);
        assert_eq!(commands.destroyed(), &[dart.entity()]);
    }

    #[test]
    fn test_enemy_hit_destroys_both() {
        let enemy = Entity::from_raw(7, 0);
        let world = Field(vec![(enemy, Tag::Enemy, Vec2::new(2.0, 0.0), 0.0)]);
        let mut commands = WorldCommands::new();
        let mut dart = projectile(1.0);

        let mut frames = 0;
        while !dart.status().is_finished() {
            dart.update(DT, &world, &mut commands);
            frames += 1;
            assert!(frames < 60);
        }

        // 2 units at 15 u/s: the eighth tick at 1/60 s (t = 0.133 s)
        assert_eq!(frames, 8);
        assert_eq!(dart.status(), ProjectileStatus::HitEnemy(enemy));
        assert_eq!(commands.destroyed(), &[enemy, dart.entity()]);

        // A finished projectile stays put
        let position = dart.position();
        dart.update(DT, &world, &mut commands);
        assert_eq!(dart.position(), position);
        assert_eq!(commands.destroyed().len(), 2);
    }

    #[test]
    fn test_ground_absorbs() {
        let wall = Entity::from_raw(8, 0);
        let world = Field(vec![(wall, Tag::Ground, Vec2::new(1.0, 0.0), 0.5)]);
        let mut commands = WorldCommands::new();
        let mut dart = projectile(1.0);

        while !dart.status().is_finished() {
            dart.update(DT, &world, &mut commands);
        }

        assert_eq!(dart.status(), ProjectileStatus::HitGround(wall));
        assert_eq!(commands.destroyed(), &[dart.entity()]);
    }

    #[test]
    fn test_passes_through_other() {
        let bystander = Entity::from_raw(9, 0);
        let enemy = Entity::from_raw(10, 0);
        let world = Field(vec![
            (bystander, Tag::Other, Vec2::new(1.0, 0.0), 0.5),
            (enemy, Tag::Enemy, Vec2::new(3.0, 0.0), 0.0),
        ]);
        let mut commands = WorldCommands::new();
        let mut dart = projectile(1.0);

        while !dart.status().is_finished() {
            dart.update(DT, &world, &mut commands);
        }

        assert_eq!(dart.status(), ProjectileStatus::HitEnemy(enemy));
        assert!(!commands.is_destroy_queued(bystander));
    }

    #[test]
    fn test_spawned_inside_ground_absorbed_first_update() {
        let wall = Entity::from_raw(11, 0);
        let world = Field(vec![(wall, Tag::Ground, Vec2::ZERO, 1.0)]);
        let mut commands = WorldCommands::new();
        let mut dart = projectile(1.0);

        assert_eq!(dart.update(DT, &world, &mut commands), ProjectileStatus::HitGround(wall));
        assert_eq!(commands.destroyed(), &[dart.entity()]);
    }

    #[test]
    fn test_enemy_first_in_query_order_wins() {
        let enemy = Entity::from_raw(12, 0);
        let wall = Entity::from_raw(13, 0);
        let world = Field(vec![
            (enemy, Tag::Enemy, Vec2::new(0.3, 0.0), 0.1),
            (wall, Tag::Ground, Vec2::new(0.3, 0.0), 0.1),
        ]);
        let mut commands = WorldCommands::new();
        let mut dart = projectile(1.0);

        assert_eq!(dart.update(DT, &world, &mut commands), ProjectileStatus::HitEnemy(enemy));
        assert_eq!(commands.destroyed(), &[enemy, dart.entity()]);
    }

    #[test]
    fn test_ignores_itself() {
        let mut dart = projectile(1.0);
        let own = dart.entity();
        let world = Field(vec![(own, Tag::Ground, Vec2::ZERO, 100.0)]);
        let mut commands = WorldCommands::new();

        assert_eq!(dart.update(DT, &world, &mut commands), ProjectileStatus::Flying);
    }
}
