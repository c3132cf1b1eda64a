//! Animation collaborator
//!
//! The animation-state player lives outside this crate. Controllers only push
//! named parameters at it; every method defaults to a no-op so a character
//! without an animator needs no special casing.

use tracing::trace;

/// Parameter names understood by the character's animation graph
pub mod params {
    /// bool: blocking stance
    pub const DEFEND: &str = "Defend";
    /// bool: standing on ground
    pub const GROUNDED: &str = "Grounded";
    /// float: |horizontal input × selected speed|
    pub const SPEED: &str = "Speed";
    /// trigger: jump started
    pub const JUMP: &str = "Jump";
    pub const ATTACK_FAST: &str = "Attack1";
    pub const ATTACK_STRONG: &str = "Attack2";
    pub const ATTACK_SPECIAL: &str = "Attack3";
    pub const SHOOT: &str = "Shoot";
}

/// Receiver for animation parameters
pub trait Animator {
    fn set_bool(&mut self, _name: &'static str, _value: bool) {}
    fn set_float(&mut self, _name: &'static str, _value: f32) {}
    fn set_trigger(&mut self, _name: &'static str) {}
}

/// Animator that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnimator;

impl Animator for NullAnimator {}

/// One parameter change sent to an animator
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    Bool(&'static str, bool),
    Float(&'static str, f32),
    Trigger(&'static str),
}

/// Animator that records every event, in order
#[derive(Debug, Clone, Default)]
pub struct AnimationLog {
    pub events: Vec<AnimationEvent>,
}

impl AnimationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Triggers fired since the last clear, in order
    pub fn triggers(&self) -> Vec<&'static str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AnimationEvent::Trigger(name) => Some(*name),
                _ => None,
            })
            .collect()
    }

    /// Last value written to a bool parameter
    pub fn last_bool(&self, name: &str) -> Option<bool> {
        self.events.iter().rev().find_map(|e| match e {
            AnimationEvent::Bool(n, v) if *n == name => Some(*v),
            _ => None,
        })
    }

    /// Last value written to a float parameter
    pub fn last_float(&self, name: &str) -> Option<f32> {
        self.events.iter().rev().find_map(|e| match e {
            AnimationEvent::Float(n, v) if *n == name => Some(*v),
            _ => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl Animator for AnimationLog {
    fn set_bool(&mut self, name: &'static str, value: bool) {
        self.events.push(AnimationEvent::Bool(name, value));
    }

    fn set_float(&mut self, name: &'static str, value: f32) {
        self.events.push(AnimationEvent::Float(name, value));
    }

    fn set_trigger(&mut self, name: &'static str) {
        trace!(trigger = name, "animation trigger");
        self.events.push(AnimationEvent::Trigger(name));
    }
}
