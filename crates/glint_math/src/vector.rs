//! Vector helpers that glam doesn't provide with the semantics the tracer
//! needs: a guarded normalize, mirror reflection and Snell refraction.

use crate::Vec3;

/// Vectors shorter than this normalize to zero instead of blowing up.
pub const NORMALIZE_EPSILON: f32 = 1e-5;

/// Normalize `v`, returning `Vec3::ZERO` when its length is at or below
/// [`NORMALIZE_EPSILON`].
#[inline]
pub fn safe_normalize(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > NORMALIZE_EPSILON {
        v / len
    } else {
        Vec3::ZERO
    }
}

/// Reflect a vector about a normal: `d - 2(n·d)n`.
#[inline]
pub fn reflect(d: Vec3, n: Vec3) -> Vec3 {
    d - 2.0 * n.dot(d) * n
}

/// Discriminant of Snell's law for incoming direction `d`, surface normal `n`
/// and refraction ratio `eta`: `1 - eta²(1 - (n·d)²)`.
///
/// Non-positive means total internal reflection.
#[inline]
pub fn refraction_discriminant(d: Vec3, n: Vec3, eta: f32) -> f32 {
    let cos = n.dot(d);
    let sin2 = 1.0 - cos * cos;
    1.0 - eta * eta * sin2
}

/// Refract unit direction `d` through a surface with unit normal `n`.
///
/// Returns `None` on total internal reflection (discriminant `<= 0`),
/// otherwise the unit refracted direction.
pub fn refract(d: Vec3, n: Vec3, eta: f32) -> Option<Vec3> {
    let k = refraction_discriminant(d, n, eta);
    if k <= 0.0 {
        return None;
    }

    let cos = n.dot(d);
    Some(safe_normalize((d - n * cos) * eta - n * k.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Direction hitting a +Y facing surface at `sin_theta` from the normal.
    fn incoming(sin_theta: f32) -> Vec3 {
        let cos_theta = (1.0 - sin_theta * sin_theta).sqrt();
        Vec3::new(sin_theta, -cos_theta, 0.0)
    }

    #[test]
    fn test_safe_normalize() {
        let v = safe_normalize(Vec3::new(3.0, 0.0, 4.0));
        assert!((v.length() - 1.0).abs() < 1e-6);
        assert_eq!(safe_normalize(Vec3::ZERO), Vec3::ZERO);
        assert_eq!(safe_normalize(Vec3::splat(1e-6)), Vec3::ZERO);
        assert!(!safe_normalize(Vec3::splat(1e-6)).is_nan());
    }

    #[test]
    fn test_reflect() {
        let d = Vec3::new(1.0, -1.0, 0.0).normalize();
        let r = reflect(d, Vec3::Y);
        assert!((r - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);

        // Normal incidence bounces straight back.
        assert_eq!(reflect(-Vec3::Y, Vec3::Y), Vec3::Y);
    }

    #[test]
    fn test_refract_normal_incidence_passes_straight() {
        let t = refract(-Vec3::Y, Vec3::Y, 1.5).expect("normal incidence refracts");
        assert!((t - (-Vec3::Y)).length() < 1e-6);
    }

    #[test]
    fn test_refract_obeys_snell() {
        let eta = 1.0 / 1.5;
        let d = incoming(0.5);
        let t = refract(d, Vec3::Y, eta).expect("entering a denser medium never reflects totally");

        assert!((t.length() - 1.0).abs() < 1e-5);
        assert!(t.y < 0.0, "refracted ray continues through the surface");
        assert!((t.x - 0.5 * eta).abs() < 1e-5, "sin(theta_t) = eta * sin(theta_i)");
    }

    #[test]
    fn test_refract_near_critical_angle() {
        let eta = 1.5;
        let critical = 1.0 / eta;

        let below = incoming(critical * (1.0 - 1e-3));
        let k = refraction_discriminant(below, Vec3::Y, eta);
        assert!(k > 0.0 && k < 1e-2, "discriminant just above zero: {k}");
        let t = refract(below, Vec3::Y, eta).expect("just inside the critical angle");
        assert!((t.length() - 1.0).abs() < 1e-4);
        assert!(t.y < 0.0);

        let above = incoming(critical * (1.0 + 1e-3));
        assert!(refraction_discriminant(above, Vec3::Y, eta) <= 0.0);
        assert!(refract(above, Vec3::Y, eta).is_none());
    }

    #[test]
    fn test_refract_fails_exactly_on_non_positive_discriminant() {
        for eta in [0.75, 1.0, 1.33, 2.0] {
            for step in 0..=100 {
                let d = incoming(step as f32 / 100.0);
                let k = refraction_discriminant(d, Vec3::Y, eta);
                match refract(d, Vec3::Y, eta) {
                    Some(t) => {
                        assert!(k > 0.0);
                        assert!((t.length() - 1.0).abs() < 1e-4, "eta {eta} step {step}");
                    }
                    None => assert!(k <= 0.0, "eta {eta} step {step}"),
                }
            }
        }
    }
}
