//! Hittable trait and HitRecord for ray-object intersection.
//!
//! Both geometry backends (analytic spheres and triangle meshes) implement
//! [`Hittable`], so the integrator never knows which one it is tracing.

use glint_core::{Albedo, Color4, Material, SurfaceKind};
use glint_math::{Aabb, Interval, Ray, Vec3};

/// Minimum accepted hit distance. Keeps a ray leaving a surface from
/// re-hitting that same surface.
pub const HIT_EPSILON: f32 = 1e-4;

/// Placeholder material for HitRecord::default().
static UNLIT: Material = Material {
    name: String::new(),
    kind: SurfaceKind::Diffuse,
    albedo: Albedo::Flat(Color4::BLACK),
    emission: 0.0,
    reflectivity: 0.0,
    refractivity: 0.0,
};

/// Record of a ray-object intersection.
#[derive(Clone, Debug)]
pub struct HitRecord<'a> {
    /// Point of intersection
    pub p: Vec3,
    /// Shading normal (always points against the ray)
    pub normal: Vec3,
    /// Parameter t where the intersection occurs
    pub t: f32,
    /// Surface color at the hit, already stamped with the material's emission
    pub color: Color4,
    /// Material at the intersection point
    pub material: &'a Material,
    /// Refraction ratio of the object that was hit
    pub refractivity: f32,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
}

impl<'a> Default for HitRecord<'a> {
    fn default() -> Self {
        Self {
            p: Vec3::ZERO,
            normal: Vec3::ZERO,
            t: 0.0,
            color: Color4::BLACK,
            material: &UNLIT,
            refractivity: 0.0,
            front_face: false,
        }
    }
}

impl<'a> HitRecord<'a> {
    /// Set the face normal based on ray direction and outward normal.
    ///
    /// The normal is always stored pointing against the ray direction,
    /// so we need to track whether we hit the front or back face.
    pub fn set_face_normal(&mut self, ray: &Ray, outward_normal: Vec3) {
        self.front_face = ray.direction().dot(outward_normal) < 0.0;

        self.normal = if self.front_face {
            outward_normal
        } else {
            -outward_normal
        };
    }
}

/// Scene surface query: anything a ray can hit.
pub trait Hittable: Send + Sync {
    /// Find the nearest hit with `t` inside `ray_t`.
    ///
    /// Returns true and fills in `rec` on a hit. On a miss `rec` is left
    /// untouched.
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool;

    /// Get the axis-aligned bounding box of this object.
    fn bounding_box(&self) -> Aabb;
}
