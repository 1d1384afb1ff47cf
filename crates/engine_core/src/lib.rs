//! Core types shared across the Nighthaul systems:
//! - Transform and direction utilities
//! - Frame time management

pub mod time;
pub mod transform;

pub use time::*;
pub use transform::*;

// Re-export commonly used types
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
