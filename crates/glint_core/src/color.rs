//! Reflectance-plus-luminance color model.
//!
//! A [`Color4`] is what travels back along a light path: `r`, `g`, `b` are the
//! reflectance of the surfaces seen so far (in `[0, 1]`) and `l` is the light
//! intensity that survived. Luminance is only turned into visible brightness
//! by [`Color4::to_rgb8`], at the pixel buffer boundary.

use std::ops::{Add, AddAssign, Div, Mul};

/// Byte order of 8-bit color triples in an external buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelOrder {
    #[default]
    Rgb,
    /// Bitmap-style storage (B, G, R).
    Bgr,
}

impl ChannelOrder {
    /// Reorder a triple between this order and logical RGB.
    ///
    /// Both conversions are the same permutation, so this works in either
    /// direction.
    #[inline]
    pub fn swizzle(self, [a, b, c]: [u8; 3]) -> [u8; 3] {
        match self {
            ChannelOrder::Rgb => [a, b, c],
            ChannelOrder::Bgr => [c, b, a],
        }
    }
}

/// Reflectance channels plus a luminance scalar.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Color4 {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub l: f32,
}

impl Color4 {
    pub const BLACK: Color4 = Color4::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Color4 = Color4::new(1.0, 1.0, 1.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, l: f32) -> Self {
        Self { r, g, b, l }
    }

    /// Reflectance only, luminance 0.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 0.0)
    }

    /// Convert 8-bit channels to `[0, 1]` reflectance, luminance 0.
    pub fn from_rgb8([r, g, b]: [u8; 3]) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Same reflectance with luminance replaced by `l`.
    #[inline]
    pub fn with_luminance(self, l: f32) -> Self {
        Self { l, ..self }
    }

    /// Mean reflectance: how much of the incoming light this color returns.
    #[inline]
    pub fn reflect_ratio(&self) -> f32 {
        (self.r + self.g + self.b) / 3.0
    }

    /// Light `incoming` leaving a surface of color `surface`.
    ///
    /// RGB is the component-wise product; luminance is `incoming.l` attenuated
    /// by the surface's mean reflectance. Not symmetric: the luminance of
    /// `surface` is ignored.
    #[inline]
    pub fn mix(surface: Color4, incoming: Color4) -> Color4 {
        Color4::new(
            surface.r * incoming.r,
            surface.g * incoming.g,
            surface.b * incoming.b,
            incoming.l * surface.reflect_ratio(),
        )
    }

    /// Display conversion: RGB scaled by luminance clamped to `[0, 1]`, then
    /// each channel clamped and truncated to a byte.
    pub fn to_rgb8(&self) -> [u8; 3] {
        let l = self.l.clamp(0.0, 1.0);
        [
            channel_to_u8(self.r * l),
            channel_to_u8(self.g * l),
            channel_to_u8(self.b * l),
        ]
    }

    /// Grayscale preview of the luminance alone.
    pub fn luminance_to_gray8(&self) -> [u8; 3] {
        let l = channel_to_u8(self.l);
        [l, l, l]
    }
}

#[inline]
fn channel_to_u8(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0) as u8
}

impl Add for Color4 {
    type Output = Color4;

    fn add(self, rhs: Color4) -> Color4 {
        Color4::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b, self.l + rhs.l)
    }
}

impl AddAssign for Color4 {
    fn add_assign(&mut self, rhs: Color4) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Color4 {
    type Output = Color4;

    fn mul(self, f: f32) -> Color4 {
        Color4::new(self.r * f, self.g * f, self.b * f, self.l * f)
    }
}

impl Div<f32> for Color4 {
    type Output = Color4;

    fn div(self, f: f32) -> Color4 {
        Color4::new(self.r / f, self.g / f, self.b / f, self.l / f)
    }
}
