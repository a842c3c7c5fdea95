//! Built-in demo room: six wall-sized spheres around a mirror ball, a glass
//! ball, a textured ball and a spherical lamp.

use std::sync::Arc;

use glint_core::{ChannelOrder, Color4, Material, SurfaceKind, Texture};
use glint_math::{Vec2, Vec3};

use crate::{
    camera::Camera,
    error::SceneResult,
    sphere::{Sphere, SphereSet},
};

/// Radius of the wall spheres. Large enough that the visible patch is flat.
const WALL_RADIUS: f32 = 1e5;

/// Build the demo room. `texture` wraps the diffuse ball on the right.
pub fn cornell_spheres(texture: impl Into<Arc<Texture>>) -> SceneResult<SphereSet> {
    let wall = |name: &str, rgb: [u8; 3], kind: SurfaceKind, emission: f32| {
        Material::flat(name, kind, Color4::from_rgb8(rgb), emission).with_reflectivity(0.5)
    };

    // The room spans x in [-60, 60], y in [-33, 50] and z in [-70, 50].
    let walls = [
        (Vec3::new(WALL_RADIUS - 60.0, -40.8, -81.6), wall("left", [173, 216, 230], SurfaceKind::Emission, 1.0)),
        (Vec3::new(-WALL_RADIUS + 60.0, -40.8, -81.6), wall("right", [255, 0, 0], SurfaceKind::Emission, 1.0)),
        (Vec3::new(50.0, -40.8, -WALL_RADIUS + 50.0), wall("back", [224, 255, 255], SurfaceKind::Diffuse, 0.0)),
        (Vec3::new(50.0, -40.8, WALL_RADIUS - 70.0), wall("front", [255, 255, 224], SurfaceKind::Diffuse, 0.0)),
        (Vec3::new(0.0, -WALL_RADIUS + 50.0, -81.6), wall("ceiling", [255, 192, 203], SurfaceKind::Diffuse, 0.0)),
        (Vec3::new(0.0, WALL_RADIUS - 33.0, -81.6), wall("floor", [50, 205, 50], SurfaceKind::Diffuse, 0.0)),
    ];

    let mut set = SphereSet::new();
    for (center, material) in walls {
        set.add(Sphere::new(center, WALL_RADIUS, material)?);
    }

    let mirror = Material::flat("mirror", SurfaceKind::Specular, Color4::from_rgb8([0, 0, 255]), 0.0)
        .with_reflectivity(0.9);
    let glass = Material::flat("glass", SurfaceKind::Specular, Color4::from_rgb8([255, 192, 203]), 0.0)
        .with_reflectivity(1.0)
        .with_refractivity(1.33);
    let textured = Material::textured("textured", SurfaceKind::Diffuse, texture, Vec2::ONE)?
        .with_reflectivity(0.5);
    let lamp = Material::flat("lamp", SurfaceKind::Emission, Color4::WHITE, 2.0).with_reflectivity(0.0);

    set.add(Sphere::new(Vec3::new(-35.0, -16.5, -50.0), 16.5, mirror)?);
    set.add(Sphere::new(Vec3::new(0.0, -16.5, -58.0), 16.5, glass)?);
    set.add(Sphere::new(Vec3::new(35.0, -16.5, -50.0), 16.5, textured)?);
    set.add(Sphere::new(Vec3::new(0.0, 40.0, -81.6), 15.0, lamp)?);

    log::debug!("Built demo room with {} spheres", set.len());
    Ok(set)
}

/// Camera at the room's origin, looking slightly down at the balls.
pub fn cornell_camera(width: u32, height: u32) -> Camera {
    Camera::new()
        .with_resolution(width, height)
        .with_position(Vec3::ZERO, Vec3::new(0.0, -0.15, -1.0), Vec3::Y)
        .with_fov(100.0)
}

/// Square two-tone checkerboard with `cells` squares per side.
pub fn checker_texture(size: u32, cells: u32) -> SceneResult<Texture> {
    let cell = (size / cells.max(1)).max(1);
    let texels = (0..size)
        .flat_map(|y| (0..size).map(move |x| ((x / cell) + (y / cell)) % 2 == 0))
        .map(|light| if light { [230, 230, 230] } else { [40, 40, 160] })
        .collect();

    Ok(Texture::from_raw(size, size, texels, ChannelOrder::Rgb)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hittable::{HitRecord, Hittable, HIT_EPSILON};
    use glint_math::{Interval, Ray};

    fn room() -> SphereSet {
        cornell_spheres(checker_texture(16, 4).unwrap()).unwrap()
    }

    fn first_hit(set: &SphereSet, direction: Vec3) -> (String, f32) {
        let mut rec = HitRecord::default();
        assert!(set.hit(&Ray::new(Vec3::ZERO, direction), Interval::beyond(HIT_EPSILON), &mut rec));
        (rec.material.name.clone(), rec.t)
    }

    #[test]
    fn test_room_layout() {
        let set = room();
        assert_eq!(set.len(), 10);

        let (name, t) = first_hit(&set, -Vec3::X);
        assert_eq!(name, "left");
        assert!((t - 60.0).abs() < 0.1);

        let (name, t) = first_hit(&set, Vec3::X);
        assert_eq!(name, "right");
        assert!((t - 60.0).abs() < 0.1);

        let (name, t) = first_hit(&set, -Vec3::Y);
        assert_eq!(name, "floor");
        assert!((t - 33.0).abs() < 0.1);

        assert_eq!(first_hit(&set, Vec3::Z).0, "back");
    }

    #[test]
    fn test_balls_are_in_view() {
        let set = room();
        let mut camera = cornell_camera(64, 48);
        camera.initialize().unwrap();

        for (x, name) in [(18, "mirror"), (32, "glass"), (45, "textured")] {
            let mut rec = HitRecord::default();
            assert!(set.hit(&camera.primary_ray(x, 27), Interval::beyond(HIT_EPSILON), &mut rec));
            assert_eq!(rec.material.name, name);
        }
    }

    #[test]
    fn test_checker_texture() {
        let tex = checker_texture(8, 2).unwrap();
        assert_eq!((tex.width(), tex.height()), (8, 8));
        assert_eq!(tex.texel(0, 0), tex.texel(4, 4));
        assert_ne!(tex.texel(0, 0), tex.texel(4, 0));
        assert!(checker_texture(0, 2).is_err());
    }
}
