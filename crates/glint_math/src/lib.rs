// Re-export glam for convenience
pub use glam::*;

// Glint math types
mod aabb;
mod interval;
mod ray;
pub mod sampling;
pub mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;
pub use sampling::{gen_f32, random_in_hemisphere, random_in_unit_ball};
pub use vector::{reflect, refract, safe_normalize, NORMALIZE_EPSILON};
