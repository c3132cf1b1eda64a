//! Debug overlay hooks
//!
//! Wireframe hints for an editor or dev overlay. Nothing here affects gameplay.

use glam::Vec2;

/// RGB color for a gizmo
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoColor(pub f32, pub f32, pub f32);

impl GizmoColor {
    pub const RED: GizmoColor = GizmoColor(1.0, 0.0, 0.0);
    pub const BLUE: GizmoColor = GizmoColor(0.0, 0.0, 1.0);
    pub const YELLOW: GizmoColor = GizmoColor(1.0, 1.0, 0.0);
}

/// A wire circle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gizmo {
    pub center: Vec2,
    pub radius: f32,
    pub color: GizmoColor,
}

/// Receiver for debug wireframes
pub trait DebugOverlay {
    fn draw_circle(&mut self, _center: Vec2, _radius: f32, _color: GizmoColor) {}
}

/// Overlay that collects gizmos instead of drawing them
#[derive(Debug, Clone, Default)]
pub struct GizmoBuffer {
    pub gizmos: Vec<Gizmo>,
}

impl DebugOverlay for GizmoBuffer {
    fn draw_circle(&mut self, center: Vec2, radius: f32, color: GizmoColor) {
        self.gizmos.push(Gizmo {
            center,
            radius,
            color,
        });
    }
}
