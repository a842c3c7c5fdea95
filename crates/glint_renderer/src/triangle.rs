//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use glint_math::{Aabb, Ray, Vec2, Vec3};

use crate::error::{SceneError, SceneResult};

/// Determinants below this are treated as a ray parallel to the triangle.
const PARALLEL_EPSILON: f32 = 1e-4;

/// Squared cross-product length below which a triangle has no area.
const AREA_EPSILON: f32 = 1e-12;

/// Ray parameter and barycentrics of a triangle hit.
///
/// The hit point is `v0 + u * (v1 - v0) + v * (v2 - v0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleHit {
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

/// A triangle primitive.
#[derive(Debug, Clone)]
pub struct Triangle {
    vertices: [Vec3; 3],
    normals: [Vec3; 3],
    uvs: [Vec2; 3],
    /// Pre-computed face normal (unit length)
    normal: Vec3,
}

impl Triangle {
    /// Create a flat-shaded triangle; every vertex normal is the face normal.
    pub fn new(vertices: [Vec3; 3], uvs: [Vec2; 3]) -> SceneResult<Self> {
        let normal = Self::face_normal(&vertices)?;
        Self::build(vertices, [normal; 3], uvs, normal)
    }

    /// Create a triangle with per-vertex normals.
    ///
    /// The face normal follows the winding order, flipped if needed so it
    /// agrees with the first vertex normal.
    pub fn with_normals(vertices: [Vec3; 3], normals: [Vec3; 3], uvs: [Vec2; 3]) -> SceneResult<Self> {
        let mut normal = Self::face_normal(&vertices)?;
        if normal.dot(normals[0]) < 0.0 {
            normal = -normal;
        }
        Self::build(vertices, normals, uvs, normal)
    }

    fn face_normal(vertices: &[Vec3; 3]) -> SceneResult<Vec3> {
        if !vertices.iter().all(|v| v.is_finite()) {
            return Err(SceneError::NonFinite("triangle vertex"));
        }

        let [v0, v1, v2] = *vertices;
        let cross = (v1 - v0).cross(v2 - v0);
        if cross.length_squared() < AREA_EPSILON {
            return Err(SceneError::DegenerateTriangle(*vertices));
        }
        Ok(cross.normalize())
    }

    fn build(vertices: [Vec3; 3], normals: [Vec3; 3], uvs: [Vec2; 3], normal: Vec3) -> SceneResult<Self> {
        if !normals.iter().all(|n| n.is_finite()) {
            return Err(SceneError::NonFinite("vertex normal"));
        }
        if !uvs.iter().all(|uv| uv.is_finite()) {
            return Err(SceneError::NonFinite("texture coordinate"));
        }

        Ok(Self {
            vertices,
            normals,
            uvs,
            normal,
        })
    }

    pub fn vertices(&self) -> &[Vec3; 3] {
        &self.vertices
    }

    pub fn vertex_normals(&self) -> &[Vec3; 3] {
        &self.normals
    }

    pub fn uvs(&self) -> &[Vec2; 3] {
        &self.uvs
    }

    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Texture coordinate at barycentrics `(u, v)`.
    pub fn uv_at(&self, u: f32, v: f32) -> Vec2 {
        let [uv0, uv1, uv2] = self.uvs;
        uv0 + (uv1 - uv0) * u + (uv2 - uv0) * v
    }

    pub fn bounding_box(&self) -> Aabb {
        Aabb::from_vertices(self.vertices)
    }

    /// Möller-Trumbore ray-triangle intersection.
    ///
    /// Both faces are hit. Points on an edge or vertex count as inside. The
    /// returned `t` is not range checked; the caller decides what is in front.
    pub fn intersect(&self, ray: &Ray) -> Option<TriangleHit> {
        let [v0, v1, v2] = self.vertices;
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        let p = ray.direction().cross(edge2);
        let mut det = edge1.dot(p);

        // Work with a positive determinant so one threshold covers both faces
        let tvec = if det > 0.0 {
            ray.origin() - v0
        } else {
            det = -det;
            v0 - ray.origin()
        };

        // Ray is parallel to triangle
        if det < PARALLEL_EPSILON {
            return None;
        }

        let u = tvec.dot(p);
        if u < 0.0 || u > det {
            return None;
        }

        let q = tvec.cross(edge1);
        let v = ray.direction().dot(q);
        if v < 0.0 || u + v > det {
            return None;
        }

        let inv_det = 1.0 / det;
        Some(TriangleHit {
            t: edge2.dot(q) * inv_det,
            u: u * inv_det,
            v: v * inv_det,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Right triangle in the z = 0 plane with legs along X and Y.
    fn unit_triangle() -> Triangle {
        Triangle::new(
            [Vec3::ZERO, Vec3::X, Vec3::Y],
            [Vec2::ZERO, Vec2::X, Vec2::Y],
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_hit() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, 1.0), -Vec3::Z);

        let hit = tri.intersect(&ray).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-6);
        assert!((hit.u - 0.25).abs() < 1e-6);
        assert!((hit.v - 0.25).abs() < 1e-6);
        assert!((tri.normal() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_back_face_is_hit_too() {
        let tri = unit_triangle();
        let ray = Ray::new(Vec3::new(0.25, 0.25, -1.0), Vec3::Z);

        let hit = tri.intersect(&ray).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-6);
        assert!((hit.u - 0.25).abs() < 1e-6);
        assert!((hit.v - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_edges_count_as_inside() {
        let tri = unit_triangle();

        // On the hypotenuse: u + v == 1
        let hit = tri.intersect(&Ray::new(Vec3::new(0.5, 0.5, 1.0), -Vec3::Z)).unwrap();
        assert_eq!(hit.u + hit.v, 1.0);

        // On the edge v0-v2: u == 0
        let hit = tri.intersect(&Ray::new(Vec3::new(0.0, 0.5, 1.0), -Vec3::Z)).unwrap();
        assert_eq!(hit.u, 0.0);

        // Exactly at v0
        let hit = tri.intersect(&Ray::new(Vec3::new(0.0, 0.0, 1.0), -Vec3::Z)).unwrap();
        assert_eq!((hit.u, hit.v), (0.0, 0.0));
    }

    #[test]
    fn test_triangle_miss() {
        let tri = unit_triangle();

        // Outside the hypotenuse
        assert!(tri.intersect(&Ray::new(Vec3::new(0.8, 0.8, 1.0), -Vec3::Z)).is_none());
        // Parallel to the plane
        assert!(tri.intersect(&Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::X)).is_none());
    }

    #[test]
    fn test_hit_behind_origin_reports_negative_t() {
        let tri = unit_triangle();
        let hit = tri.intersect(&Ray::new(Vec3::new(0.25, 0.25, 1.0), Vec3::Z)).unwrap();
        assert!((hit.t + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_uv_interpolation() {
        let tri = unit_triangle();
        let hit = tri.intersect(&Ray::new(Vec3::new(0.25, 0.5, 1.0), -Vec3::Z)).unwrap();

        let uv = tri.uv_at(hit.u, hit.v);
        assert!((uv - Vec2::new(0.25, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_face_normal_follows_vertex_normals() {
        let vertices = [Vec3::ZERO, Vec3::X, Vec3::Y];
        let uvs = [Vec2::ZERO; 3];

        let tri = Triangle::with_normals(vertices, [-Vec3::Z; 3], uvs).unwrap();
        assert!((tri.normal() + Vec3::Z).length() < 1e-6);
        assert_eq!(tri.vertex_normals()[0], -Vec3::Z);

        let tri = Triangle::with_normals(vertices, [Vec3::Z; 3], uvs).unwrap();
        assert!((tri.normal() - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_invalid_triangles_are_rejected() {
        let uvs = [Vec2::ZERO; 3];

        let collinear = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        assert!(matches!(
            Triangle::new(collinear, uvs),
            Err(SceneError::DegenerateTriangle(_))
        ));

        let nan = [Vec3::ZERO, Vec3::X, Vec3::new(0.0, f32::NAN, 0.0)];
        assert!(matches!(Triangle::new(nan, uvs), Err(SceneError::NonFinite(_))));

        let bad_uv = [Vec2::ZERO, Vec2::ONE, Vec2::splat(f32::INFINITY)];
        assert!(matches!(
            Triangle::new([Vec3::ZERO, Vec3::X, Vec3::Y], bad_uv),
            Err(SceneError::NonFinite(_))
        ));
    }

    #[test]
    fn test_bounding_box_is_padded() {
        let bbox = unit_triangle().bounding_box();
        assert!(bbox.z.size() > 0.0);
        assert_eq!(bbox.min().x, 0.0);
        assert_eq!(bbox.max().y, 1.0);
    }
}
