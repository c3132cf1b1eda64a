//! Melee attack variants and the hit check they share

use glam::Vec2;
use shinobi_core::{Entity, LayerMask};
use shinobi_physics::SpatialQuery;
use tracing::debug;

use crate::animation::params;
use crate::commands::WorldCommands;
use crate::input::InputAction;

/// The three melee variants. They differ only in animation; the hit check is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeleeAttack {
    Fast,
    Strong,
    Special,
}

impl MeleeAttack {
    /// Evaluation order when several attack keys go down in the same frame
    pub const ALL: [MeleeAttack; 3] = [MeleeAttack::Fast, MeleeAttack::Strong, MeleeAttack::Special];

    pub fn action(self) -> InputAction {
        match self {
            MeleeAttack::Fast => InputAction::AttackFast,
            MeleeAttack::Strong => InputAction::AttackStrong,
            MeleeAttack::Special => InputAction::AttackSpecial,
        }
    }

    pub fn trigger(self) -> &'static str {
        match self {
            MeleeAttack::Fast => params::ATTACK_FAST,
            MeleeAttack::Strong => params::ATTACK_STRONG,
            MeleeAttack::Special => params::ATTACK_SPECIAL,
        }
    }
}

/// One instantaneous hit check: every entity on `layers` overlapping the
/// circle is queued for destruction. Returns the entities newly queued.
pub fn strike(
    world: &dyn SpatialQuery,
    commands: &mut WorldCommands,
    center: Vec2,
    radius: f32,
    layers: LayerMask,
) -> Vec<Entity> {
    let hits = world.overlap_circle(center, radius, layers);
    let mut killed = Vec::with_capacity(hits.len());
    for hit in hits {
        if commands.destroy(hit.entity) {
            debug!(entity = %hit.entity, x = center.x, y = center.y, "melee hit");
            killed.push(hit.entity);
        }
    }
    killed
}

#[cfg(test)]
mod tests {
    use super::*;
    use shinobi_core::{Layer, Tag};
    use shinobi_physics::Overlap;

    struct Dummies(Vec<(Entity, Vec2)>);

    impl SpatialQuery for Dummies {
        fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> Vec<Overlap> {
            if !layers.contains(Layer::Enemy) {
                return Vec::new();
            }
            self.0
                .iter()
                .filter(|(_, p)| p.distance(center) <= radius)
                .map(|(entity, _)| Overlap {
                    entity: *entity,
                    tag: Tag::Enemy,
                })
                .collect()
        }
    }

    #[test]
    fn test_strike_destroys_everything_in_radius() {
        let near = Entity::from_raw(1, 0);
        let edge = Entity::from_raw(2, 0);
        let far = Entity::from_raw(3, 0);
        let world = Dummies(vec![
            (near, Vec2::new(0.1, 0.0)),
            (edge, Vec2::new(0.0, 0.5)),
            (far, Vec2::new(0.6, 0.0)),
        ]);
        let mut commands = WorldCommands::new();

        let killed = strike(&world, &mut commands, Vec2::ZERO, 0.5, LayerMask::ENEMY);
        assert_eq!(killed, vec![near, edge]);
        assert!(!commands.is_destroy_queued(far));
    }

    #[test]
    fn test_second_strike_same_frame_reports_no_duplicates() {
        let enemy = Entity::from_raw(1, 0);
        let world = Dummies(vec![(enemy, Vec2::ZERO)]);
        let mut commands = WorldCommands::new();

        assert_eq!(strike(&world, &mut commands, Vec2::ZERO, 0.5, LayerMask::ENEMY), vec![enemy]);
        assert!(strike(&world, &mut commands, Vec2::ZERO, 0.5, LayerMask::ENEMY).is_empty());
        assert_eq!(commands.destroyed(), &[enemy]);
    }

    #[test]
    fn test_variants_map_to_distinct_triggers() {
        let triggers: Vec<_> = MeleeAttack::ALL.iter().map(|a| a.trigger()).collect();
        assert_eq!(triggers, vec!["Attack1", "Attack2", "Attack3"]);
    }
}
