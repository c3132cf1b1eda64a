//! Core types used throughout the combat core

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Horizontal orientation of a character or projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing for a horizontal input axis. Zero axis has no facing.
    pub fn from_axis(axis: f32) -> Option<Self> {
        if axis > 0.0 {
            Some(Facing::Right)
        } else if axis < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    /// +1.0 for right, -1.0 for left
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Mirror a right-facing local offset to this facing.
    pub fn mirror(self, offset: Vec2) -> Vec2 {
        Vec2::new(offset.x * self.sign(), offset.y)
    }
}

/// Capability tag attached to every collidable entity.
///
/// Tags are compared by equality; the core never looks past the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tag {
    Enemy,
    Ground,
    #[default]
    Other,
}

impl Tag {
    pub fn as_u8(self) -> u8 {
        match self {
            Tag::Enemy => 1,
            Tag::Ground => 2,
            Tag::Other => 0,
        }
    }

    /// Unknown values decode as `Other`.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => Tag::Enemy,
            2 => Tag::Ground,
            _ => Tag::Other,
        }
    }
}

/// Collision layers used to filter spatial queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layer {
    Ground,
    Enemy,
    Character,
    Projectile,
}

impl Layer {
    pub const fn bit(self) -> u32 {
        match self {
            Layer::Ground => 1 << 0,
            Layer::Enemy => 1 << 1,
            Layer::Character => 1 << 2,
            Layer::Projectile => 1 << 3,
        }
    }
}

/// Set of collision layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const NONE: LayerMask = LayerMask(0);
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const GROUND: LayerMask = LayerMask(Layer::Ground.bit());
    pub const ENEMY: LayerMask = LayerMask(Layer::Enemy.bit());

    pub fn contains(self, layer: Layer) -> bool {
        self.0 & layer.bit() != 0
    }

    pub fn with(self, layer: Layer) -> Self {
        LayerMask(self.0 | layer.bit())
    }

    pub fn without(self, layer: Layer) -> Self {
        LayerMask(self.0 & !layer.bit())
    }
}

impl From<Layer> for LayerMask {
    fn from(layer: Layer) -> Self {
        LayerMask(layer.bit())
    }
}

/// 2D transform: position and visual scale.
///
/// The sign of `scale.x` carries the horizontal mirroring of the visuals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            scale: Vec2::ONE,
        }
    }
}

impl Transform2D {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform with position and scale
    pub fn from_position_scale(position: Vec2, scale: Vec2) -> Self {
        Self { position, scale }
    }

    /// Facing implied by the sign of the horizontal scale
    pub fn facing(&self) -> Facing {
        if self.scale.x < 0.0 {
            Facing::Left
        } else {
            Facing::Right
        }
    }

    /// Point scale.x toward `facing`, keeping its magnitude.
    pub fn face(&mut self, facing: Facing) {
        self.scale.x = self.scale.x.abs() * facing.sign();
    }

    /// Local +X in world space (only the scale sign matters, there is no rotation)
    pub fn right(&self) -> Vec2 {
        Vec2::new(self.facing().sign(), 0.0)
    }

    /// Translate by the given offset
    pub fn translate(&mut self, offset: Vec2) {
        self.position += offset;
    }

    /// World position of a right-facing local offset
    pub fn point(&self, local_offset: Vec2) -> Vec2 {
        self.position + self.facing().mirror(local_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_facing_from_axis() {
        assert_eq!(Facing::from_axis(1.0), Some(Facing::Right));
        assert_eq!(Facing::from_axis(-0.5), Some(Facing::Left));
        assert_eq!(Facing::from_axis(0.0), None);
    }

    #[test]
    fn test_face_preserves_scale_magnitude() {
        let mut transform = Transform2D::from_position_scale(Vec2::ZERO, Vec2::new(2.5, 3.0));
        transform.face(Facing::Left);
        assert_eq!(transform.scale, Vec2::new(-2.5, 3.0));
        transform.face(Facing::Left);
        assert_eq!(transform.scale, Vec2::new(-2.5, 3.0));
        transform.face(Facing::Right);
        assert_eq!(transform.scale, Vec2::new(2.5, 3.0));
    }

    #[test]
    fn test_point_mirrors_with_facing() {
        let mut transform = Transform2D::from_position(Vec2::new(10.0, 1.0));
        let offset = Vec2::new(0.8, 0.2);
        assert_eq!(transform.point(offset), Vec2::new(10.8, 1.2));
        transform.face(Facing::Left);
        assert_eq!(transform.point(offset), Vec2::new(9.2, 1.2));
        assert_eq!(transform.right(), Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_tag_round_trip_and_unknown() {
        assert_eq!(Tag::from_u8(Tag::Enemy.as_u8()), Tag::Enemy);
        assert_eq!(Tag::from_u8(200), Tag::Other);
    }

    #[test]
    fn test_layer_mask() {
        let mask = LayerMask::GROUND.with(Layer::Enemy);
        assert!(mask.contains(Layer::Ground));
        assert!(mask.contains(Layer::Enemy));
        assert!(!mask.contains(Layer::Projectile));
        assert!(!mask.without(Layer::Ground).contains(Layer::Ground));
    }
}
