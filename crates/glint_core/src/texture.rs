//! Decoded texture images.
//!
//! A texture owns its 8-bit texel buffer for as long as any material holds
//! it. Buffers handed over by an external loader may be stored in bitmap
//! (BGR) order; lookups always return logical RGB.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::color::ChannelOrder;

/// Errors that can occur while building or loading a texture.
#[derive(Error, Debug)]
pub enum TextureError {
    #[error("Failed to load texture {path}: {source}")]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture has zero size ({width}x{height})")]
    Empty { width: u32, height: u32 },

    #[error("Texture is {width}x{height} but holds {texels} texels")]
    SizeMismatch { width: u32, height: u32, texels: usize },
}

pub type TextureResult<T> = Result<T, TextureError>;

/// An immutable, decoded texture.
#[derive(Clone, Debug)]
pub struct Texture {
    width: u32,
    height: u32,
    /// Row-major texel triples in `order`
    texels: Vec<[u8; 3]>,
    order: ChannelOrder,
}

impl Texture {
    /// Wrap an already decoded texel buffer.
    pub fn from_raw(
        width: u32,
        height: u32,
        texels: Vec<[u8; 3]>,
        order: ChannelOrder,
    ) -> TextureResult<Self> {
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { width, height });
        }
        if texels.len() != width as usize * height as usize {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                texels: texels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            texels,
            order,
        })
    }

    /// Decode an image file. Any format the `image` crate understands is
    /// accepted; alpha is dropped.
    pub fn open(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)
            .map_err(|source| TextureError::Load {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgb8();
        let (width, height) = rgb.dimensions();

        let texels = bytemuck::cast_slice::<u8, [u8; 3]>(rgb.as_raw()).to_vec();
        let texture = Self::from_raw(width, height, texels, ChannelOrder::Rgb)?;

        log::debug!(
            "Loaded texture: {} ({}x{}, {:.1} KB)",
            path.display(),
            width,
            height,
            texture.size_bytes() as f32 / 1024.0
        );

        Ok(texture)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Texel at integer coordinates in logical RGB order.
    ///
    /// Coordinates wrap around the texture size.
    pub fn texel(&self, x: u32, y: u32) -> [u8; 3] {
        let x = x % self.width;
        let y = y % self.height;
        let idx = (y * self.width + x) as usize;
        self.order.swizzle(self.texels[idx])
    }

    /// Get total size in bytes.
    pub fn size_bytes(&self) -> usize {
        self.texels.len() * std::mem::size_of::<[u8; 3]>()
    }
}
