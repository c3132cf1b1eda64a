//! Shinobi Core - Core types and utilities for the Shinobi combat core
//!
//! This crate provides the foundational types shared by physics and gameplay:
//! - Mathematical primitives (re-exported from glam)
//! - Generational entity handles
//! - Facing direction, capability tags, and collision layers
//! - Frame timing with a fixed-step accumulator
//! - Configuration errors

pub mod entity;
pub mod error;
pub mod time;
pub mod types;

pub use entity::{Entity, EntityAllocator};
pub use error::ConfigError;
pub use glam::Vec2;
pub use time::{GameTime, TimeConfig};
pub use types::{Facing, Layer, LayerMask, Tag, Transform2D};
