//! Glint Renderer - progressive recursive ray tracing
//!
//! Every pixel keeps its own path tree between frames, so each frame adds
//! one more sample per pixel and the image converges while it is on screen.
//!
//! - Two interchangeable geometry backends behind [`Hittable`]: analytic
//!   spheres and triangle meshes
//! - Diffuse Monte-Carlo bounces, mirror reflection and refraction with a
//!   simple Fresnel-like blend
//! - Row-parallel frames on a rayon pool, deterministic per seed

mod camera;
pub mod demo;
mod error;
mod hittable;
mod integrator;
mod mesh;
mod scene;
mod sphere;
mod triangle;

pub use camera::Camera;
pub use error::{SceneError, SceneResult};
pub use hittable::{HitRecord, Hittable, HIT_EPSILON};
pub use integrator::{Estimator, Integrator, PathNode, SurfaceSample};
pub use mesh::{Mesh, TriangleGroup};
pub use scene::{FrameStats, RenderConfig, RenderControl, Scene};
pub use sphere::{Sphere, SphereSet};
pub use triangle::{Triangle, TriangleHit};

/// Re-export common math and color types
pub use glint_core::{ChannelOrder, Color4, Material, SurfaceKind, Texture};
pub use glint_math::{Aabb, Interval, Ray, Vec2, Vec3};
