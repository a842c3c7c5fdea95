//! Triangle meshes: the explicit geometry backend.
//!
//! A mesh is a list of named triangle groups. Each group shares one material
//! and carries a lazily computed bounding box that rejects rays before any
//! triangle is tested.

use std::sync::{Arc, OnceLock};

use glint_core::Material;
use glint_math::{Aabb, Interval, Ray};

use crate::{
    error::{SceneError, SceneResult},
    hittable::{HitRecord, Hittable},
    triangle::Triangle,
};

/// Triangles sharing one material.
#[derive(Debug)]
pub struct TriangleGroup {
    name: String,
    triangles: Vec<Triangle>,
    material: Arc<Material>,
    reflectivity: f32,
    refractivity: f32,
    bbox: OnceLock<Aabb>,
}

impl TriangleGroup {
    /// Create a group. Reflectivity and refractivity start out as the
    /// material's.
    pub fn new(
        name: impl Into<String>,
        material: impl Into<Arc<Material>>,
        triangles: Vec<Triangle>,
    ) -> SceneResult<Self> {
        let name = name.into();
        if triangles.is_empty() {
            return Err(SceneError::EmptyGroup(name));
        }

        let material = material.into();
        Ok(Self {
            name,
            triangles,
            reflectivity: material.reflectivity,
            refractivity: material.refractivity,
            material,
            bbox: OnceLock::new(),
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

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
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

    /// Bounds of every vertex in the group, computed on first use.
    pub fn bounding_box(&self) -> Aabb {
        *self.bbox.get_or_init(|| {
            Aabb::from_vertices(self.triangles.iter().flat_map(|tri| *tri.vertices()))
        })
    }
}

impl Hittable for TriangleGroup {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        if !self.bounding_box().hit(ray, ray_t) {
            return false;
        }

        let mut closest = None;
        let mut closest_t = ray_t.max;
        for tri in &self.triangles {
            if let Some(hit) = tri.intersect(ray) {
                if hit.t > ray_t.min && hit.t < closest_t {
                    closest_t = hit.t;
                    closest = Some((tri, hit));
                }
            }
        }

        let Some((tri, hit)) = closest else {
            return false;
        };

        rec.t = hit.t;
        rec.p = ray.at(hit.t);
        rec.set_face_normal(ray, tri.normal());
        rec.color = self.material.color_at_uv(tri.uv_at(hit.u, hit.v));
        rec.material = &self.material;
        rec.refractivity = self.refractivity;

        true
    }

    fn bounding_box(&self) -> Aabb {
        TriangleGroup::bounding_box(self)
    }
}

/// A collection of triangle groups.
#[derive(Debug, Default)]
pub struct Mesh {
    groups: Vec<TriangleGroup>,
}

impl Mesh {
    pub fn new(groups: Vec<TriangleGroup>) -> Self {
        Self { groups }
    }

    pub fn add(&mut self, group: TriangleGroup) {
        self.groups.push(group);
    }

    pub fn groups(&self) -> &[TriangleGroup] {
        &self.groups
    }

    /// Find a group by name.
    pub fn group(&self, name: &str) -> Option<&TriangleGroup> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.triangles.len()).sum()
    }
}

impl Hittable for Mesh {
    fn hit<'a>(&'a self, ray: &Ray, ray_t: Interval, rec: &mut HitRecord<'a>) -> bool {
        let mut hit_anything = false;
        let mut closest_so_far = ray_t.max;

        for group in &self.groups {
            if group.hit(ray, ray_t.with_max(closest_so_far), rec) {
                hit_anything = true;
                closest_so_far = rec.t;
            }
        }

        hit_anything
    }

    fn bounding_box(&self) -> Aabb {
        self.groups
            .iter()
            .fold(Aabb::EMPTY, |acc, g| Aabb::surrounding(&acc, &g.bounding_box()))
    }
}
