//! Rigid body collaborator

use glam::Vec2;

/// The slice of a rigid body a controller is allowed to touch.
///
/// Controllers express intent only: a desired velocity and one-shot impulses.
/// Integration, gravity and contacts stay with the physics backend.
pub trait Body {
    fn position(&self) -> Vec2;
    fn velocity(&self) -> Vec2;
    fn set_velocity(&mut self, velocity: Vec2);
    /// Instantaneous change of momentum.
    fn apply_impulse(&mut self, impulse: Vec2);
}

/// Buffered copy of a rigid body's state for one frame.
///
/// Read from the physics world before a controller runs and written back
/// afterwards, so the controller never borrows the world mutably while it is
/// also running spatial queries against it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyState {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Zero means immovable: impulses are ignored.
    pub mass: f32,
}

impl BodyState {
    pub fn new(position: Vec2, velocity: Vec2, mass: f32) -> Self {
        Self {
            position,
            velocity,
            mass,
        }
    }
}

impl Body for BodyState {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn velocity(&self) -> Vec2 {
        self.velocity
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    fn apply_impulse(&mut self, impulse: Vec2) {
        if self.mass > 0.0 {
            self.velocity += impulse / self.mass;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impulse_scales_by_mass() {
        let mut body = BodyState::new(Vec2::ZERO, Vec2::new(3.0, 0.0), 2.0);
        body.apply_impulse(Vec2::new(0.0, 12.0));
        assert_eq!(body.velocity, Vec2::new(3.0, 6.0));
    }

    #[test]
    fn test_massless_body_ignores_impulse() {
        let mut body = BodyState::new(Vec2::ZERO, Vec2::ZERO, 0.0);
        body.apply_impulse(Vec2::new(0.0, 12.0));
        assert_eq!(body.velocity, Vec2::ZERO);
    }
}
