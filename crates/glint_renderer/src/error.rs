//! Errors raised while building a scene or handing it a pixel buffer.
//!
//! Intersection queries never fail; everything here is a construction-time
//! or call-site problem that the caller has to fix.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Sphere radius must be positive and finite, got {0}")]
    InvalidRadius(f32),

    #[error("Non-finite {0} in scene data")]
    NonFinite(&'static str),

    #[error("Degenerate triangle {0:?}: vertices are collinear")]
    DegenerateTriangle([glint_math::Vec3; 3]),

    #[error("Triangle group {0:?} has no triangles")]
    EmptyGroup(String),

    #[error("Degenerate camera: {0}")]
    DegenerateCamera(&'static str),

    #[error("Image size must be non-zero, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Row stride of {stride} bytes is shorter than a {width} pixel row")]
    StrideTooShort { stride: usize, width: u32 },

    #[error("Pixel buffer holds {got} bytes, frame needs {needed}")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("Failed to build render thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Texture(#[from] glint_core::TextureError),

    #[error(transparent)]
    Material(#[from] glint_core::MaterialError),
}

pub type SceneResult<T> = Result<T, SceneError>;
