//! Analytic spheres: the implicit geometry backend.

use std::f32::consts::PI;
use std::sync::Arc;

use glint_core::Material;
use glint_math::{Aabb, Interval, Ray, Vec3};

use crate::{
    error::{SceneError, SceneResult},
    hittable::{HitRecord, Hittable, HIT_EPSILON},
};

/// A sphere primitive.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    material: Arc<Material>,
    reflectivity: f32,
    refractivity: f32,
    bbox: Aabb,
}

impl Sphere {
    /// Create a new sphere. Reflectivity and refractivity start out as the
    /// material's.
    pub fn new(center: Vec3, radius: f32, material: impl Into<Arc<Material>>) -> SceneResult<Self> {
        if !center.is_finite() {
            return Err(SceneError::NonFinite("sphere center"));
        }
        if !(radius.is_finite() && radius > 0.0) {
            return Err(SceneError::InvalidRadius(radius));
        }

        let material = material.into();
        let rvec = Vec3::splat(radius);

        Ok(Self {
            center,
            radius,
            reflectivity: material.reflectivity,
            refractivity: material.refractivity,
            material,
            bbox: Aabb::from_points(center - rvec, center + rvec),
        })
    }

    pub fn with_reflectivity(mut self, reflectivity: f32) -> Self {
        self.reflectivity = reflectivity;
        self
    }

    pub fn with_refractivity(mut self, refractivity: f32) -> Self {
        self.refractivity = refractivity;
        self
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn reflectivity(&self) -> f32 {
        self.reflectivity
    }

    pub fn refractivity(&self) -> f32 {
        self.refractivity
    }

    /// Distance to the nearest intersection in front of the ray origin.
    pub fn intersect(&self, ray: &Ray) -> Option<f32> {
        self.intersect_in(ray, Interval::beyond(HIT_EPSILON))
    }

    /// Nearest root strictly inside `ray_t`.
    fn intersect_in(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let to_center = self.center - ray.origin();
        let tca = to_center.dot(ray.direction());

        // Squared distance from the center to the ray line. Measured on the
        // perpendicular itself so the huge wall spheres keep their precision.
        let perp = to_center - ray.direction() * tca;
        let d2 = perp.length_squared();
        let r2 = self.radius * self.radius;
        if d2 > r2 {
            return None;
        }

        let thc = (r2 - d2).sqrt();
        [tca - thc, tca + thc]
            .into_iter()
            .find(|&t| ray_t.surrounds(t))
    }

    /// Get the UV coordinates for a point on the unit sphere.
    fn get_sphere_uv(p: Vec3) -> (f32, f32) {
        // theta: angle down from +Y, phi: angle around Y from +X
        let theta = (-p.y).clamp(-1.0, 1.0).acos();
        let phi = (-p.z).atan2(p.x) + PI;

        (phi / (2.0 * PI), theta / PI)
    }
}

impl Hittable for Sphere {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let Some(t) = self.intersect_in(ray, ray_t) else {
            return false;
        };

        rec.t = t;
        rec.p = ray.at(t);
        let outward_normal = (rec.p - self.center) / self.radius;
        rec.set_face_normal(ray, outward_normal);

        let (u, v) = Self::get_sphere_uv(outward_normal);
        rec.color = self.material.color_at(u, v);
        rec.material = &self.material;
        rec.refractivity = self.refractivity;

        true
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

/// A flat list of spheres, tested one by one.
#[derive(Debug, Clone)]
pub struct SphereSet {
    spheres: Vec<Sphere>,
    bbox: Aabb,
}

impl SphereSet {
    pub fn new() -> Self {
        Self {
            spheres: Vec::new(),
            bbox: Aabb::EMPTY,
        }
    }

    pub fn add(&mut self, sphere: Sphere) {
        self.bbox = Aabb::surrounding(&self.bbox, &sphere.bounding_box());
        self.spheres.push(sphere);
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }
}

impl Default for SphereSet {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Sphere> for SphereSet {
    fn from_iter<I: IntoIterator<Item = Sphere>>(iter: I) -> Self {
        let mut set = Self::new();
        for sphere in iter {
            set.add(sphere);
        }
        set
    }
}

impl Hittable for SphereSet {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for sphere in &self.spheres {
            if sphere.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_core::{Color4, SurfaceKind};

    fn gray() -> Material {
        Material::flat("gray", SurfaceKind::Diffuse, Color4::rgb(0.5, 0.5, 0.5), 0.0)
    }

    #[test]
    fn test_sphere_hit() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray()).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0));

        assert!((sphere.intersect(&ray).unwrap() - 0.5).abs() < 1e-5);

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::beyond(HIT_EPSILON), &mut rec));
        assert!((rec.t - 0.5).abs() < 0.001);
        assert!((rec.normal - Vec3::Z).length() < 1e-5);
        assert_eq!(rec.color, Color4::rgb(0.5, 0.5, 0.5));
    }

    #[test]
    fn test_sphere_miss_leaves_record_untouched() {
        let sphere = Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, gray()).unwrap();

        // Ray pointing away from sphere
        let ray = Ray::new(Vec3::ZERO, Vec3::Y);
        let mut rec = HitRecord::default();
        rec.t = 42.0;

        assert_eq!(sphere.intersect(&ray), None);
        assert!(!sphere.hit(&ray, Interval::beyond(HIT_EPSILON), &mut rec));
        assert_eq!(rec.t, 42.0);
    }

    #[test]
    fn test_ray_from_inside_hits_far_side() {
        let sphere = Sphere::new(Vec3::ZERO, 2.0, gray()).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        let t = sphere.intersect(&ray).unwrap();
        assert!((t - 2.0).abs() < 1e-5);

        let mut rec = HitRecord::default();
        assert!(sphere.hit(&ray, Interval::beyond(HIT_EPSILON), &mut rec));
        assert!(!rec.front_face);
        assert!((rec.normal + Vec3::X).length() < 1e-5);
    }

    #[test]
    fn test_ray_leaving_surface_does_not_self_hit() {
        let sphere = Sphere::new(Vec3::ZERO, 1.0, gray()).unwrap();
        let ray = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, 1.0, 0.0));

        assert_eq!(sphere.intersect(&ray), None);
    }

    #[test]
    fn test_huge_sphere_keeps_precision() {
        // Wall-sized sphere whose surface sits at z = 70
        let wall = Sphere::new(Vec3::new(0.0, 0.0, 1e5 + 70.0), 1e5, gray()).unwrap();
        let ray = Ray::new(Vec3::ZERO, Vec3::Z);

        let t = wall.intersect(&ray).unwrap();
        assert!((t - 70.0).abs() < 0.05, "t = {t}");
    }

    #[test]
    fn test_invalid_spheres_are_rejected() {
        assert!(matches!(
            Sphere::new(Vec3::ZERO, 0.0, gray()),
            Err(SceneError::InvalidRadius(_))
        ));
        assert!(matches!(
            Sphere::new(Vec3::ZERO, f32::INFINITY, gray()),
            Err(SceneError::InvalidRadius(_))
        ));
        assert!(matches!(
            Sphere::new(Vec3::new(f32::NAN, 0.0, 0.0), 1.0, gray()),
            Err(SceneError::NonFinite(_))
        ));
    }

    #[test]
    fn test_optical_properties_default_to_material() {
        let glass = gray().with_reflectivity(1.0).with_refractivity(1.33);
        let sphere = Sphere::new(Vec3::ZERO, 1.0, glass).unwrap();
        assert_eq!(sphere.reflectivity(), 1.0);
        assert_eq!(sphere.refractivity(), 1.33);

        let sphere = sphere.with_refractivity(1.5);
        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        assert!(sphere.hit(&ray, Interval::beyond(HIT_EPSILON), &mut rec));
        assert_eq!(rec.refractivity, 1.5);
    }

    #[test]
    fn test_textured_sphere_samples_uv() {
        use glint_core::{ChannelOrder, Texture};
        use glint_math::Vec2;

        // Left half red, right half blue along U
        let tex = Texture::from_raw(2, 1, vec![[255, 0, 0], [0, 0, 255]], ChannelOrder::Rgb).unwrap();
        let mat = Material::textured("split", SurfaceKind::Diffuse, tex, Vec2::ONE).unwrap();
        let sphere = Sphere::new(Vec3::ZERO, 1.0, mat).unwrap();

        // Hit at +X: phi = atan2(0, 1) + pi = pi, u = 0.5 -> second texel
        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::new(5.0, 0.0, 0.0), -Vec3::X);
        assert!(sphere.hit(&ray, Interval::beyond(HIT_EPSILON), &mut rec));
        assert_eq!(rec.color, Color4::rgb(0.0, 0.0, 1.0));

        // Hit at +Z: phi = atan2(-1, 0) + pi = pi/2, u = 0.25 -> first texel
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), -Vec3::Z);
        assert!(sphere.hit(&ray, Interval::beyond(HIT_EPSILON), &mut rec));
        assert_eq!(rec.color, Color4::rgb(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_sphere_set_finds_nearest() {
        let near = Material::flat("near", SurfaceKind::Diffuse, Color4::rgb(1.0, 0.0, 0.0), 0.0);
        let far = Material::flat("far", SurfaceKind::Diffuse, Color4::rgb(0.0, 1.0, 0.0), 0.0);

        let set: SphereSet = [
            Sphere::new(Vec3::new(0.0, 0.0, -10.0), 1.0, far).unwrap(),
            Sphere::new(Vec3::new(0.0, 0.0, -3.0), 1.0, near).unwrap(),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);

        let mut rec = HitRecord::default();
        let ray = Ray::new(Vec3::ZERO, -Vec3::Z);
        assert!(set.hit(&ray, Interval::beyond(HIT_EPSILON), &mut rec));
        assert!((rec.t - 2.0).abs() < 1e-4);
        assert_eq!(rec.material.name, "near");

        let bbox = set.bounding_box();
        assert!(bbox.min().z <= -11.0 && bbox.max().z >= -2.0);
    }

    #[test]
    fn test_empty_set_misses() {
        let set = SphereSet::new();
        let mut rec = HitRecord::default();
        assert!(set.is_empty());
        assert!(!set.hit(&Ray::new(Vec3::ZERO, Vec3::X), Interval::beyond(HIT_EPSILON), &mut rec));
    }
}
