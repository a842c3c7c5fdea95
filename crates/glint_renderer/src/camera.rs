//! Pinhole camera generating one fixed primary ray per pixel.

use glint_math::{Ray, Vec3};

use crate::error::{SceneError, SceneResult};

/// Camera for generating rays into the scene.
#[derive(Clone, Debug)]
pub struct Camera {
    // Image settings
    pub image_width: u32,
    pub image_height: u32,

    // Camera positioning
    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,

    /// Vertical field of view in degrees
    vfov: f32,

    // Cached computed values (set by initialize())
    center: Vec3,
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
    w: Vec3,
}

impl Camera {
    /// Create a new camera with default settings.
    pub fn new() -> Self {
        Self {
            image_width: 640,
            image_height: 480,
            look_from: Vec3::ZERO,
            look_at: Vec3::Z,
            vup: Vec3::Y,
            vfov: 90.0,
            center: Vec3::ZERO,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
            w: -Vec3::Z,
        }
    }

    /// Set image resolution.
    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width;
        self.image_height = height;
        self
    }

    /// Set camera position.
    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    /// Set vertical field of view in degrees.
    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Initialize the camera (must be called before generating rays).
    ///
    /// Fails when the view basis cannot be built: the eye sits on its
    /// target, `vup` is parallel to the view direction, or the field of view
    /// is outside `(0, 180)` degrees.
    pub fn initialize(&mut self) -> SceneResult<()> {
        if !(self.vfov > 0.0 && self.vfov < 180.0) {
            return Err(SceneError::DegenerateCamera("field of view must be within (0, 180) degrees"));
        }

        // Calculate camera basis vectors
        let w = (self.look_from - self.look_at)
            .try_normalize()
            .ok_or(SceneError::DegenerateCamera("look_from and look_at coincide"))?;
        let u = self
            .vup
            .cross(w)
            .try_normalize()
            .ok_or(SceneError::DegenerateCamera("vup is parallel to the view direction"))?;
        let v = w.cross(u);

        self.center = self.look_from;
        self.w = w;

        // Viewport sits one unit in front of the eye
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width =
            viewport_height * (self.image_width as f32 / self.image_height.max(1) as f32);

        // Rows run top to bottom, so the vertical edge points down
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;

        self.pixel_delta_u = viewport_u / self.image_width.max(1) as f32;
        self.pixel_delta_v = viewport_v / self.image_height.max(1) as f32;

        let viewport_upper_left = self.center - self.w - viewport_u / 2.0 - viewport_v / 2.0;
        self.pixel00_loc = viewport_upper_left + 0.5 * (self.pixel_delta_u + self.pixel_delta_v);
        Ok(())
    }

    /// Ray through the center of pixel `(i, j)`, row 0 at the top.
    pub fn primary_ray(&self, i: u32, j: u32) -> Ray {
        let pixel_center =
            self.pixel00_loc + (i as f32) * self.pixel_delta_u + (j as f32) * self.pixel_delta_v;

        Ray::new(self.center, pixel_center - self.center)
    }

    /// Viewing direction (unit length, valid after initialize()).
    pub fn forward(&self) -> Vec3 {
        -self.w
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_initialize() {
        let mut camera = Camera::new()
            .with_resolution(800, 600)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_fov(90.0);

        camera.initialize().unwrap();

        assert_eq!(camera.center, Vec3::ZERO);
        assert!((camera.forward() + Vec3::Z).length() < 0.001);
    }

    #[test]
    fn test_center_ray_points_forward() {
        let mut camera = Camera::new()
            .with_resolution(101, 101)
            .with_position(Vec3::new(1.0, 2.0, 3.0), Vec3::new(1.0, 2.0, 10.0), Vec3::Y)
            .with_fov(60.0);
        camera.initialize().unwrap();

        let ray = camera.primary_ray(50, 50);
        assert_eq!(ray.origin(), Vec3::new(1.0, 2.0, 3.0));
        assert!((ray.direction() - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_rows_run_top_to_bottom() {
        let mut camera = Camera::new()
            .with_resolution(4, 4)
            .with_position(Vec3::ZERO, Vec3::Z, Vec3::Y);
        camera.initialize().unwrap();

        let top = camera.primary_ray(1, 0).direction();
        let bottom = camera.primary_ray(1, 3).direction();
        assert!(top.y > 0.0 && bottom.y < 0.0);

        // Looking down +Z with +Y up, +X is on the left of the image
        let left = camera.primary_ray(0, 1).direction();
        let right = camera.primary_ray(3, 1).direction();
        assert!(left.x > right.x);
    }

    #[test]
    fn test_fov_is_in_degrees() {
        let mut camera = Camera::new()
            .with_resolution(2, 2)
            .with_position(Vec3::ZERO, Vec3::Z, Vec3::Y)
            .with_fov(90.0);
        camera.initialize().unwrap();

        // Pixel centers sit at a quarter of the viewport height: tan(45°) / 2
        let d = camera.primary_ray(0, 0).direction();
        assert!((d.y / d.z - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_basis_is_rejected() {
        let mut on_target = Camera::new().with_position(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert!(matches!(on_target.initialize(), Err(SceneError::DegenerateCamera(_))));

        let mut looking_up = Camera::new().with_position(Vec3::ZERO, Vec3::Y, Vec3::Y);
        assert!(matches!(looking_up.initialize(), Err(SceneError::DegenerateCamera(_))));

        let mut flat = Camera::new().with_fov(0.0);
        assert!(matches!(flat.initialize(), Err(SceneError::DegenerateCamera(_))));
    }
}
