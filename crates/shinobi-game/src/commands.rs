//! Deferred world changes
//!
//! Controllers never create or destroy entities while a frame is running.
//! They queue requests here and the game loop applies them once every
//! controller has finished, so an overlap result is never invalidated by the
//! destruction it triggers.

use glam::Vec2;
use shinobi_core::Entity;
use tracing::trace;

/// Request to instantiate a projectile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub position: Vec2,
    /// Visual scale copied from the shooter; the sign of `x` is the flight direction.
    /// There is no rotation: orientation comes from scale alone.
    pub scale: Vec2,
}

/// Queue of spawns and destructions for the current frame
#[derive(Debug, Default)]
pub struct WorldCommands {
    destroy: Vec<Entity>,
    spawn: Vec<ProjectileSpawn>,
}

impl WorldCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an entity for destruction. Repeats within a frame are dropped.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if self.destroy.contains(&entity) {
            return false;
        }
        trace!(%entity, "destroy queued");
        self.destroy.push(entity);
        true
    }

    pub fn is_destroy_queued(&self, entity: Entity) -> bool {
        self.destroy.contains(&entity)
    }

    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) {
        self.spawn.push(spawn);
    }

    pub fn destroyed(&self) -> &[Entity] {
        &self.destroy
    }

    pub fn spawns(&self) -> &[ProjectileSpawn] {
        &self.spawn
    }

    pub fn is_empty(&self) -> bool {
        self.destroy.is_empty() && self.spawn.is_empty()
    }

    /// Take everything queued, in request order, leaving the buffer empty
    pub fn drain(&mut self) -> (Vec<Entity>, Vec<ProjectileSpawn>) {
        (std::mem::take(&mut self.destroy), std::mem::take(&mut self.spawn))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destroy_is_deduplicated() {
        let mut commands = WorldCommands::new();
        let enemy = Entity::from_raw(4, 0);
        assert!(commands.destroy(enemy));
        assert!(!commands.destroy(enemy));
        assert!(commands.destroy(Entity::from_raw(4, 1)));
        assert_eq!(commands.destroyed().len(), 2);
    }

    #[test]
    fn test_drain_empties_buffer() {
        let mut commands = WorldCommands::new();
        commands.destroy(Entity::from_raw(1, 0));
        commands.spawn_projectile(ProjectileSpawn {
            position: Vec2::new(1.0, 0.5),
            scale: Vec2::ONE,
        });

        let (destroy, spawn) = commands.drain();
        assert_eq!(destroy.len(), 1);
        assert_eq!(spawn.len(), 1);
        assert!(commands.is_empty());
    }
}
