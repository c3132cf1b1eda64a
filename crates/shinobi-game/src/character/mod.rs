//! Player character
//!
//! Ground detection, defense stance, walk/run, jump, three melee attacks and
//! one ranged attack, evaluated once per frame.

mod combat;
mod config;
mod controller;

pub use combat::{strike, MeleeAttack};
pub use config::{CharacterConfig, ValidCharacterConfig};
pub use controller::{CharacterController, CharacterReport};
