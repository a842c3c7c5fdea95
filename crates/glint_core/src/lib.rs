//! Glint Core - color, texture and material types shared by the tracer.
//!
//! This crate provides:
//!
//! - **Color model**: `Color4`, a reflectance color that carries a luminance
//!   scalar along a light path, and its composition operators
//! - **Textures**: decoded 8-bit texel buffers, loaded with the `image` crate
//! - **Materials**: surface classification (emission / diffuse / specular)
//!   over a flat color or a tiled texture
//!
//! # Example
//!
//! ```ignore
//! use glint_core::{Color4, Material, SurfaceKind, Texture};
//!
//! let lamp = Material::flat("lamp", SurfaceKind::Emission, Color4::WHITE, 2.0);
//! let checker = Texture::open("checker.png")?;
//! let floor = Material::textured("floor", SurfaceKind::Diffuse, checker, [4.0, 4.0].into())?;
//! ```

pub mod color;
pub mod material;
pub mod texture;

// Re-export commonly used types
pub use color::{ChannelOrder, Color4};
pub use material::{Albedo, Material, MaterialError, MaterialResult, SurfaceKind};
pub use texture::{Texture, TextureError, TextureResult};
