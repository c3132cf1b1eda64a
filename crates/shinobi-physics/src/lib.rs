//! Shinobi Physics - 2D physics simulation using rapier2d
//!
//! Provides the physics world, collision-layer filtered overlap queries, and
//! the buffered rigid body adapter controllers drive.

mod body;
mod query;

pub use body::{Body, BodyState};
pub use query::{Overlap, SpatialQuery};

use std::collections::HashMap;

use glam::Vec2;
use nalgebra::Vector2;
use rapier2d::prelude::*;
use shinobi_core::{Entity, Layer, LayerMask, Tag};
use tracing::debug;

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec2,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::new(0.0, -9.81),
            timestep: 1.0 / 60.0,
        }
    }
}

/// Collider geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape2D {
    Circle { radius: f32 },
    Box { half_extents: Vec2 },
}

/// Everything needed to attach a collider to an entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderSpec {
    pub shape: Shape2D,
    pub tag: Tag,
    pub layer: Layer,
    /// Sensors report overlaps but produce no contact forces
    pub sensor: bool,
}

impl ColliderSpec {
    pub fn new(shape: Shape2D, tag: Tag, layer: Layer) -> Self {
        Self {
            shape,
            tag,
            layer,
            sensor: false,
        }
    }

    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    fn build(&self, position: Vec2, entity: Entity) -> ColliderBuilder {
        let builder = match self.shape {
            Shape2D::Circle { radius } => ColliderBuilder::ball(radius),
            Shape2D::Box { half_extents } => ColliderBuilder::cuboid(half_extents.x, half_extents.y),
        };
        builder
            .translation(to_vector(position))
            .sensor(self.sensor)
            .collision_groups(InteractionGroups::new(
                Group::from_bits_truncate(self.layer.bit()),
                Group::ALL,
            ))
            .user_data(pack_user_data(entity, self.tag))
    }
}

#[derive(Debug, Clone, Copy)]
struct EntityRecord {
    body: Option<RigidBodyHandle>,
    collider: ColliderHandle,
    mass: f32,
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    pub config: PhysicsConfig,

    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,

    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    entities: HashMap<Entity, EntityRecord>,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            entities: HashMap::new(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self) {
        let gravity = to_vector(self.config.gravity);

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        self.refresh_queries();
    }

    /// Rebuild the query acceleration structure after colliders changed
    pub fn refresh_queries(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a fixed collider (ground, walls, enemy hitboxes)
    pub fn add_static(&mut self, entity: Entity, position: Vec2, spec: ColliderSpec) -> ColliderHandle {
        let collider = spec.build(position, entity).build();
        let handle = self.collider_set.insert(collider);
        self.entities.insert(
            entity,
            EntityRecord {
                body: None,
                collider: handle,
                mass: 0.0,
            },
        );
        self.refresh_queries();
        handle
    }

    /// Add a gravity-driven body that never rotates (characters)
    pub fn add_dynamic(
        &mut self,
        entity: Entity,
        position: Vec2,
        spec: ColliderSpec,
        mass: f32,
    ) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(to_vector(position))
            .lock_rotations()
            .build();
        let collider = spec
            .build(Vec2::ZERO, entity)
            .mass(mass)
            .friction(0.0) // Slide along walls instead of sticking to them
            .friction_combine_rule(CoefficientCombineRule::Min)
            .restitution(0.0)
            .build();
        self.insert_body(entity, rigid_body, collider, mass)
    }

    /// Add a body moved only by its controller, unaffected by gravity (projectiles)
    pub fn add_kinematic(&mut self, entity: Entity, position: Vec2, spec: ColliderSpec) -> RigidBodyHandle {
        let rigid_body = RigidBodyBuilder::kinematic_position_based()
            .translation(to_vector(position))
            .gravity_scale(0.0)
            .build();
        let collider = spec.build(Vec2::ZERO, entity).build();
        self.insert_body(entity, rigid_body, collider, 0.0)
    }

    fn insert_body(
        &mut self,
        entity: Entity,
        rigid_body: RigidBody,
        collider: Collider,
        mass: f32,
    ) -> RigidBodyHandle {
        let body = self.rigid_body_set.insert(rigid_body);
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);
        self.entities.insert(
            entity,
            EntityRecord {
                body: Some(body),
                collider,
                mass,
            },
        );
        self.refresh_queries();
        body
    }

    /// Remove an entity's body and collider. Returns `false` if it was not present.
    pub fn remove_entity(&mut self, entity: Entity) -> bool {
        let Some(record) = self.entities.remove(&entity) else {
            return false;
        };

        match record.body {
            Some(body) => {
                self.rigid_body_set.remove(
                    body,
                    &mut self.island_manager,
                    &mut self.collider_set,
                    &mut self.impulse_joint_set,
                    &mut self.multibody_joint_set,
                    true,
                );
            }
            None => {
                self.collider_set.remove(
                    record.collider,
                    &mut self.island_manager,
                    &mut self.rigid_body_set,
                    true,
                );
            }
        }

        self.refresh_queries();
        debug!(%entity, "removed from physics world");
        true
    }

    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains_key(&entity)
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// World position of an entity's collider
    pub fn position(&self, entity: Entity) -> Option<Vec2> {
        let record = self.entities.get(&entity)?;
        let collider = self.collider_set.get(record.collider)?;
        Some(from_vector(collider.translation()))
    }

    /// Snapshot a body for a controller to work on
    pub fn read_body(&self, entity: Entity) -> Option<BodyState> {
        let record = self.entities.get(&entity)?;
        let body = self.rigid_body_set.get(record.body?)?;
        Some(BodyState::new(
            from_vector(body.translation()),
            from_vector(body.linvel()),
            record.mass,
        ))
    }

    /// Write a controller's velocity back to its body
    pub fn write_body(&mut self, entity: Entity, state: &BodyState) {
        let Some(handle) = self.entities.get(&entity).and_then(|r| r.body) else {
            return;
        };
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(to_vector(state.velocity), true);
        }
    }

    /// Move a kinematic body to `position` over the next step
    pub fn move_kinematic(&mut self, entity: Entity, position: Vec2) {
        let Some(handle) = self.entities.get(&entity).and_then(|r| r.body) else {
            return;
        };
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_next_kinematic_translation(to_vector(position));
        }
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl SpatialQuery for PhysicsWorld {
    fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> Vec<Overlap> {
        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(center.x, center.y);
        let filter = QueryFilter::default().groups(InteractionGroups::new(
            Group::ALL,
            Group::from_bits_truncate(layers.0),
        ));

        let mut found: Vec<Overlap> = Vec::new();
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape,
            filter,
            |handle| {
                if let Some(collider) = self.collider_set.get(handle) {
                    let overlap = unpack_user_data(collider.user_data);
                    if !found.iter().any(|o| o.entity == overlap.entity) {
                        found.push(overlap);
                    }
                }
                true
            },
        );
        found
    }
}

fn to_vector(v: Vec2) -> Vector2<f32> {
    Vector2::new(v.x, v.y)
}

fn from_vector(v: &Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Entity bits in the low 64, tag in the next 8.
fn pack_user_data(entity: Entity, tag: Tag) -> u128 {
    entity.to_bits() as u128 | ((tag.as_u8() as u128) << 64)
}

fn unpack_user_data(data: u128) -> Overlap {
    Overlap {
        entity: Entity::from_bits(data as u64),
        tag: Tag::from_u8((data >> 64) as u8),
    }
}
