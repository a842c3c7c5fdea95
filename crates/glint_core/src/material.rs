//! Surface materials.
//!
//! A material decides what the integrator does at a hit (stop at a light,
//! scatter diffusely, or mirror/refract) and what color the surface has at a
//! given texture coordinate.

use std::sync::Arc;

use glint_math::Vec2;
use thiserror::Error;

use crate::{color::Color4, texture::Texture};

/// Errors that can occur when building a material.
#[derive(Error, Debug, PartialEq)]
pub enum MaterialError {
    #[error("Material {name}: texture tiling must be positive and finite, got ({x}, {y})")]
    InvalidTiling { name: String, x: f32, y: f32 },
}

pub type MaterialResult<T> = Result<T, MaterialError>;

/// How a surface interacts with light.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Light source; paths end here.
    Emission,
    /// Monte-Carlo scattered over the hemisphere.
    Diffuse,
    /// Mirror reflection, optionally blended with refraction.
    Specular,
}

/// Where a material's color comes from.
#[derive(Debug, Clone)]
pub enum Albedo {
    Flat(Color4),
    /// Texture repeated `tiling.x` times across U and `tiling.y` times across V.
    Textured { texture: Arc<Texture>, tiling: Vec2 },
}

/// A surface material.
#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub kind: SurfaceKind,
    pub albedo: Albedo,
    /// Luminance stamped onto every color this material returns
    pub emission: f32,
    pub reflectivity: f32,
    /// Refraction ratio handed to Snell's law; 0 disables refraction
    pub refractivity: f32,
}

impl Material {
    /// Default reflectivity for materials that don't set one.
    pub const DEFAULT_REFLECTIVITY: f32 = 0.8;

    /// Material with a single flat color.
    pub fn flat(name: impl Into<String>, kind: SurfaceKind, color: Color4, emission: f32) -> Self {
        Self {
            name: name.into(),
            kind,
            albedo: Albedo::Flat(color),
            emission,
            reflectivity: Self::DEFAULT_REFLECTIVITY,
            refractivity: 0.0,
        }
    }

    /// Material colored by a tiled texture.
    pub fn textured(
        name: impl Into<String>,
        kind: SurfaceKind,
        texture: impl Into<Arc<Texture>>,
        tiling: Vec2,
    ) -> MaterialResult<Self> {
        let name = name.into();
        if !(tiling.is_finite() && tiling.x > 0.0 && tiling.y > 0.0) {
            return Err(MaterialError::InvalidTiling {
                name,
                x: tiling.x,
                y: tiling.y,
            });
        }

        Ok(Self {
            name,
            kind,
            albedo: Albedo::Textured {
                texture: texture.into(),
                tiling,
            },
            emission: 0.0,
            reflectivity: Self::DEFAULT_REFLECTIVITY,
            refractivity: 0.0,
        })
    }

    pub fn with_emission(mut self, emission: f32) -> Self {
        self.emission = emission;
        self
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_refractivity(mut self, refractivity: f32) -> Self {
        self.refractivity = refractivity;
        self
    }

    pub fn is_emissive(&self) -> bool {
        self.kind == SurfaceKind::Emission
    }

    /// Surface color at texture coordinates `(u, v)`, stamped with this
    /// material's emission luminance.
    ///
    /// UVs are clamped to `[0, 1]` first, since interpolated coordinates can
    /// overshoot slightly at triangle edges.
    pub fn color_at(&self, u: f32, v: f32) -> Color4 {
        let color = match &self.albedo {
            Albedo::Flat(color) => *color,
            Albedo::Textured { texture, tiling } => {
                let u = u.clamp(0.0, 1.0);
                let v = v.clamp(0.0, 1.0);
                let x = (u * texture.width() as f32 * tiling.x) as u32;
                let y = (v * texture.height() as f32 * tiling.y) as u32;
                Color4::from_rgb8(texture.texel(x, y))
            }
        };

        color.with_luminance(self.emission)
    }

    /// [`Material::color_at`] taking a UV vector.
    pub fn color_at_uv(&self, uv: Vec2) -> Color4 {
        self.color_at(uv.x, uv.y)
    }
}
