//! Spatial query collaborator

use glam::Vec2;
use shinobi_core::{Entity, LayerMask, Tag};

/// One entity found by an overlap query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overlap {
    pub entity: Entity,
    pub tag: Tag,
}

/// Point-in-time overlap tests.
///
/// Results are owned snapshots; callers may destroy what they find without
/// invalidating the query that found it.
pub trait SpatialQuery {
    /// Every entity on `layers` whose collider intersects the circle.
    /// Each entity appears at most once.
    fn overlap_circle(&self, center: Vec2, radius: f32, layers: LayerMask) -> Vec<Overlap>;

    /// Whether anything on `layers` intersects the circle.
    fn any_overlap(&self, center: Vec2, radius: f32, layers: LayerMask) -> bool {
        !self.overlap_circle(center, radius, layers).is_empty()
    }
}
