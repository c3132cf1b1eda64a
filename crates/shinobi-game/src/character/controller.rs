//! Character controller: ground check, defense, locomotion, jump and combat

use glam::Vec2;
use shinobi_core::{ConfigError, Entity, Facing, Transform2D};
use shinobi_physics::{Body, SpatialQuery};
use tracing::debug;

use crate::animation::{params, Animator};
use crate::commands::{ProjectileSpawn, WorldCommands};
use crate::debug::{DebugOverlay, Gizmo, GizmoColor};
use crate::input::{InputAction, InputState};

use super::combat::{strike, MeleeAttack};
use super::{CharacterConfig, ValidCharacterConfig};

/// What happened during one character update
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterReport {
    pub grounded: bool,
    pub defending: bool,
    pub jumped: bool,
    /// Melee attacks fired this frame, in evaluation order
    pub attacks: Vec<MeleeAttack>,
    /// Entities newly queued for destruction by melee
    pub kills: Vec<Entity>,
    pub shots: u32,
}

/// Per-frame state machine for the player character
pub struct CharacterController {
    settings: ValidCharacterConfig,
    transform: Transform2D,
    grounded: bool,
    defending: bool,
}

impl CharacterController {
    /// Build a controller. Fails if any reference point or tuning value is unusable.
    pub fn new(config: CharacterConfig, transform: Transform2D) -> Result<Self, ConfigError> {
        let settings = config.validate()?;
        Ok(Self {
            settings,
            transform,
            grounded: false,
            defending: false,
        })
    }

    /// Tuning values the controller was built with
    pub fn config(&self) -> &CharacterConfig {
        self.settings.config()
    }

    /// Position and facing as of the last update
    pub fn transform(&self) -> &Transform2D {
        &self.transform
    }

    /// Body position read at the start of the last update
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    /// Current facing, from the sign of the transform's x scale
    pub fn facing(&self) -> Facing {
        self.transform.facing()
    }

    /// Ground probe result from the last update
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// Whether the last update took the defense branch
    pub fn is_defending(&self) -> bool {
        self.defending
    }

    /// World-space center of the melee hit circle
    pub fn attack_point(&self) -> Vec2 {
        self.transform.point(self.settings.attack_origin)
    }

    /// World-space projectile spawn point
    pub fn shoot_point(&self) -> Vec2 {
        self.transform.point(self.settings.shoot_origin)
    }

    /// World-space center of the ground probe
    pub fn ground_probe_point(&self) -> Vec2 {
        self.transform.point(self.settings.ground_probe)
    }

    /// Run one frame. Branches are evaluated in priority order; a defending
    /// frame stops after the defense branch.
    pub fn update(
        &mut self,
        input: &InputState,
        body: &mut dyn Body,
        world: &dyn SpatialQuery,
        animator: &mut dyn Animator,
        commands: &mut WorldCommands,
    ) -> CharacterReport {
        self.transform.position = body.position();

        // Ground check
        let config = self.settings.config();
        self.grounded = world.any_overlap(
            self.ground_probe_point(),
            config.ground_probe_radius,
            config.ground_layers,
        );

        let mut report = CharacterReport {
            grounded: self.grounded,
            ..Default::default()
        };

        // Defense: holds the character in place and skips everything else
        if input.is_held(InputAction::Defend) && self.grounded {
            self.defending = true;
            body.set_velocity(Vec2::new(0.0, body.velocity().y));
            animator.set_bool(params::DEFEND, true);
            report.defending = true;
            return report;
        }
        self.defending = false;
        animator.set_bool(params::DEFEND, false);

        // Locomotion
        let axis = Self::horizontal_axis(input);
        let speed = self.config().speed(input.is_held(InputAction::Run));
        body.set_velocity(Vec2::new(axis * speed, body.velocity().y));
        if let Some(facing) = Facing::from_axis(axis) {
            self.transform.face(facing);
        }

        if input.is_just_pressed(InputAction::Jump) && self.grounded {
            self.jump(body, animator);
            report.jumped = true;
        }

        // Every attack edge fires on its own, even several in one frame
        for attack in MeleeAttack::ALL {
            if input.is_just_pressed(attack.action()) {
                let kills = self.melee(attack, world, animator, commands);
                report.attacks.push(attack);
                report.kills.extend(kills);
            }
        }
        if input.is_just_pressed(InputAction::Shoot) {
            self.shoot(animator, commands);
            report.shots += 1;
        }

        animator.set_float(params::SPEED, (axis * speed).abs());
        animator.set_bool(params::GROUNDED, self.grounded);

        report
    }

    /// Right wins when both directions are held
    fn horizontal_axis(input: &InputState) -> f32 {
        if input.is_held(InputAction::MoveRight) {
            1.0
        } else if input.is_held(InputAction::MoveLeft) {
            -1.0
        } else {
            0.0
        }
    }

    fn jump(&self, body: &mut dyn Body, animator: &mut dyn Animator) {
        let velocity = body.velocity();
        body.set_velocity(Vec2::new(velocity.x, 0.0));
        body.apply_impulse(Vec2::new(0.0, self.config().jump_impulse));
        animator.set_trigger(params::JUMP);
        debug!(x = self.transform.position.x, y = self.transform.position.y, "jump");
    }

    fn melee(
        &self,
        attack: MeleeAttack,
        world: &dyn SpatialQuery,
        animator: &mut dyn Animator,
        commands: &mut WorldCommands,
    ) -> Vec<Entity> {
        animator.set_trigger(attack.trigger());
        let config = self.config();
        strike(
            world,
            commands,
            self.attack_point(),
            config.attack_radius,
            config.enemy_layers,
        )
    }

    fn shoot(&self, animator: &mut dyn Animator, commands: &mut WorldCommands) {
        animator.set_trigger(params::SHOOT);
        commands.spawn_projectile(ProjectileSpawn {
            position: self.shoot_point(),
            scale: self.transform.scale,
        });
    }

    /// Attack circle (red) and ground probe (blue)
    pub fn gizmos(&self) -> [Gizmo; 2] {
        let config = self.config();
        [
            Gizmo {
                center: self.attack_point(),
                radius: config.attack_radius,
                color: GizmoColor::RED,
            },
            Gizmo {
                center: self.ground_probe_point(),
                radius: config.ground_probe_radius,
                color: GizmoColor::BLUE,
            },
        ]
    }

    pub fn draw_gizmos(&self, overlay: &mut dyn DebugOverlay) {
        for gizmo in self.gizmos() {
            overlay.draw_circle(gizmo.center, gizmo.radius, gizmo.color);
        }
    }
}
