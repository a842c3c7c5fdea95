//! Stochastic direction sampling.
//!
//! All samplers draw from a caller-owned `&mut dyn RngCore`, so each render
//! worker can own an independently seeded generator.

use std::f32::consts::PI;

use rand::{Rng, RngCore};

use crate::{vector::safe_normalize, Vec3};

/// Uniform float in `[0, 1)`.
#[inline]
pub fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}

/// Uniformly distributed point strictly inside the unit ball.
pub fn random_in_unit_ball(rng: &mut dyn RngCore) -> Vec3 {
    // Rejection sampling from the enclosing cube
    loop {
        let p = Vec3::new(
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
            gen_f32(rng) * 2.0 - 1.0,
        );
        if p.length_squared() < 1.0 {
            return p;
        }
    }
}

/// Cosine-weighted unit direction in the hemisphere around `normal`.
///
/// `normal` must be unit length.
pub fn random_in_hemisphere(normal: Vec3, rng: &mut dyn RngCore) -> Vec3 {
    let (u, v) = orthonormal_basis(normal);

    let r1 = 2.0 * PI * gen_f32(rng);
    let r2 = gen_f32(rng);
    let r2s = r2.sqrt();

    safe_normalize(u * (r1.cos() * r2s) + v * (r1.sin() * r2s) + normal * (1.0 - r2).sqrt())
}

/// Two unit tangents completing `normal` to a right-handed basis.
///
/// The reference axis is Y unless the normal is nearly parallel to it, in
/// which case X is used so the cross product stays well conditioned.
fn orthonormal_basis(normal: Vec3) -> (Vec3, Vec3) {
    let reference = if normal.y.abs() > 0.9 { Vec3::X } else { Vec3::Y };
    let u = safe_normalize(reference.cross(normal));
    let v = normal.cross(u);
    (u, v)
}
