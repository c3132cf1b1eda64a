//! Shinobi Game - Character control and combat
//!
//! Provides input handling, the character and projectile controllers, and the
//! reference simulation loop that wires them to the physics world.

pub mod animation;
pub mod character;
pub mod commands;
pub mod debug;
pub mod input;
pub mod projectile;
pub mod simulation;

pub use animation::{AnimationEvent, AnimationLog, Animator, NullAnimator};
pub use character::{CharacterConfig, CharacterController, CharacterReport, MeleeAttack};
pub use commands::{ProjectileSpawn, WorldCommands};
pub use debug::{DebugOverlay, Gizmo, GizmoBuffer, GizmoColor};
pub use input::{InputAction, InputBindings, InputHandler, InputState};
pub use projectile::{ProjectileConfig, ProjectileController, ProjectileStatus};
pub use simulation::{Simulation, SpawnError, TickReport};
