//! Reference game loop
//!
//! Owns the physics world, the character, live projectiles and the entity
//! registry, and runs one fixed tick at a time:
//!
//! 1. character update (reads input, queries the world, writes its body)
//! 2. projectile updates (flight, range, impacts)
//! 3. queued destructions, then queued spawns
//! 4. physics step

use std::collections::HashMap;

use glam::Vec2;
use shinobi_core::{ConfigError, Entity, EntityAllocator, Layer, Tag, Transform2D};
use shinobi_physics::{ColliderSpec, PhysicsConfig, PhysicsWorld, Shape2D};
use tracing::{debug, info, warn};

use crate::animation::Animator;
use crate::character::{CharacterConfig, CharacterController, CharacterReport};
use crate::commands::{ProjectileSpawn, WorldCommands};
use crate::debug::{DebugOverlay, GizmoColor};
use crate::input::InputState;
use crate::projectile::{ProjectileConfig, ProjectileController, ProjectileStatus};

/// Why a ranged attack produced no projectile
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpawnError {
    #[error("no projectile template configured")]
    MissingTemplate,
}

/// Everything that changed during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Absent once the character entity has been destroyed
    pub character: Option<CharacterReport>,
    /// Enemy entities destroyed this tick
    pub killed: Vec<Entity>,
    pub spawned: Vec<Entity>,
    pub expired: Vec<Entity>,
    /// Projectiles that ended on an enemy or on ground
    pub impacts: Vec<(Entity, ProjectileStatus)>,
    pub spawn_failures: u32,
}

pub struct Simulation {
    physics: PhysicsWorld,
    entities: EntityAllocator,
    tags: HashMap<Entity, Tag>,
    character: Option<(Entity, CharacterController)>,
    projectiles: Vec<ProjectileController>,
    projectile_template: Option<ProjectileConfig>,
    commands: WorldCommands,
    frame: u64,
}

impl Simulation {
    pub fn new(physics: PhysicsConfig) -> Self {
        Self {
            physics: PhysicsWorld::with_config(physics),
            entities: EntityAllocator::new(),
            tags: HashMap::new(),
            character: None,
            projectiles: Vec::new(),
            projectile_template: None,
            commands: WorldCommands::new(),
            frame: 0,
        }
    }

    /// Set the template ranged attacks instantiate. `None` makes them animation-only.
    pub fn set_projectile_template(&mut self, template: Option<ProjectileConfig>) -> Result<(), ConfigError> {
        if let Some(template) = &template {
            template.validate()?;
        }
        self.projectile_template = template;
        Ok(())
    }

    /// Underlying physics world
    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    /// Number of ticks run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Character controller, if the character is alive
    pub fn character(&self) -> Option<&CharacterController> {
        self.character.as_ref().map(|(_, c)| c)
    }

    /// Character entity, if the character is alive
    pub fn character_entity(&self) -> Option<Entity> {
        self.character.as_ref().map(|(e, _)| *e)
    }

    /// Live projectiles in spawn order
    pub fn projectiles(&self) -> &[ProjectileController] {
        &self.projectiles
    }

    /// Whether `entity` is still registered
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.entities.is_alive(entity)
    }

    /// Tag of a live entity
    pub fn tag(&self, entity: Entity) -> Option<Tag> {
        self.tags.get(&entity).copied()
    }

    /// Live entities carrying `tag`
    pub fn count_tagged(&self, tag: Tag) -> usize {
        self.tags.values().filter(|t| **t == tag).count()
    }

    /// Add a solid ground or wall block
    pub fn add_ground(&mut self, center: Vec2, half_extents: Vec2) -> Entity {
        let entity = self.register(Tag::Ground);
        let spec = ColliderSpec::new(Shape2D::Box { half_extents }, Tag::Ground, Layer::Ground);
        self.physics.add_static(entity, center, spec);
        entity
    }

    /// Add a stationary enemy hitbox
    pub fn add_enemy(&mut self, center: Vec2, radius: f32) -> Entity {
        let entity = self.register(Tag::Enemy);
        let spec = ColliderSpec::new(Shape2D::Circle { radius }, Tag::Enemy, Layer::Enemy);
        self.physics.add_static(entity, center, spec);
        entity
    }

    /// Create the character. Configuration problems are reported here, not mid-frame.
    pub fn spawn_character(&mut self, config: CharacterConfig, position: Vec2) -> Result<Entity, ConfigError> {
        let spec = ColliderSpec::new(
            Shape2D::Box {
                half_extents: config.body_half_extents,
            },
            Tag::Other,
            Layer::Character,
        );
        let mass = config.mass;
        let controller = CharacterController::new(config, Transform2D::from_position(position))?;

        if let Some((old, _)) = self.character.take() {
            self.despawn(old);
        }

        let entity = self.register(Tag::Other);
        self.physics.add_dynamic(entity, position, spec, mass);
        self.character = Some((entity, controller));
        info!(%entity, x = position.x, y = position.y, "character spawned");
        Ok(entity)
    }

    fn register(&mut self, tag: Tag) -> Entity {
        let entity = self.entities.allocate();
        self.tags.insert(entity, tag);
        entity
    }

    /// Run one fixed tick
    pub fn tick(&mut self, input: &InputState, animator: &mut dyn Animator) -> TickReport {
        let dt = self.physics.config.timestep;
        self.frame += 1;
        let mut report = TickReport::default();

        if let Some((entity, controller)) = self.character.as_mut() {
            if let Some(mut body) = self.physics.read_body(*entity) {
                let character =
                    controller.update(input, &mut body, &self.physics, animator, &mut self.commands);
                self.physics.write_body(*entity, &body);
                report.character = Some(character);
            }
        }

        for projectile in &mut self.projectiles {
            let status = projectile.update(dt, &self.physics, &mut self.commands);
            match status {
                ProjectileStatus::Flying => {
                    self.physics.move_kinematic(projectile.entity(), projectile.position());
                }
                ProjectileStatus::Expired => report.expired.push(projectile.entity()),
                ProjectileStatus::HitEnemy(_) | ProjectileStatus::HitGround(_) => {
                    report.impacts.push((projectile.entity(), status));
                }
            }
        }

        self.apply_commands(&mut report);
        self.physics.step();
        report
    }

    fn apply_commands(&mut self, report: &mut TickReport) {
        let (destroy, spawn) = self.commands.drain();

        for entity in destroy {
            if self.tag(entity) == Some(Tag::Enemy) {
                report.killed.push(entity);
            }
            self.despawn(entity);
        }

        for request in spawn {
            match self.spawn_projectile(&request) {
                Ok(entity) => report.spawned.push(entity),
                Err(err) => {
                    warn!(frame = self.frame, "ranged attack without projectile: {}", err);
                    report.spawn_failures += 1;
                }
            }
        }
    }

    fn spawn_projectile(&mut self, request: &ProjectileSpawn) -> Result<Entity, SpawnError> {
        let template = self
            .projectile_template
            .clone()
            .ok_or(SpawnError::MissingTemplate)?;

        let entity = self.register(Tag::Other);
        let spec = ColliderSpec::new(
            Shape2D::Circle {
                radius: template.radius,
            },
            Tag::Other,
            Layer::Projectile,
        )
        .sensor();
        self.physics.add_kinematic(entity, request.position, spec);
        self.projectiles
            .push(ProjectileController::new(entity, template, request));
        debug!(%entity, x = request.position.x, y = request.position.y, "projectile spawned");
        Ok(entity)
    }

    /// Remove an entity and whatever controller drives it. Stale handles are ignored.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        if !self.entities.deallocate(entity) {
            return false;
        }
        self.physics.remove_entity(entity);
        self.tags.remove(&entity);
        self.projectiles.retain(|p| p.entity() != entity);
        if self.character_entity() == Some(entity) {
            self.character = None;
            info!(%entity, "character removed");
        }
        true
    }

    /// Character gizmos plus one circle per live projectile
    pub fn draw_debug(&self, overlay: &mut dyn DebugOverlay) {
        if let Some(character) = self.character() {
            character.draw_gizmos(overlay);
        }
        for projectile in &self.projectiles {
            overlay.draw_circle(projectile.position(), projectile.config().radius, GizmoColor::YELLOW);
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}
