use crate::{Interval, Ray, Vec3};

/// Padding applied to any axis thinner than this, so flat geometry (a floor
/// quad, a wall) still gets a slab with non-zero width.
const MIN_EXTENT: f32 = 0.0001;

/// Axis-Aligned Bounding Box used as a cheap rejection test in front of
/// per-triangle intersection.
///
/// An AABB is defined by three intervals (one per axis) that bound a 3D volume.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an AABB from two corner points.
    ///
    /// The corners may be given in any order; each axis is sorted and
    /// zero-extent axes are padded.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let x = Interval::new(a.x.min(b.x), a.x.max(b.x));
        let y = Interval::new(a.y.min(b.y), a.y.max(b.y));
        let z = Interval::new(a.z.min(b.z), a.z.max(b.z));

        let mut aabb = Self { x, y, z };
        aabb.pad_to_minimums();
        aabb
    }

    /// Smallest AABB enclosing every point, or `Aabb::EMPTY` for no points.
    pub fn from_vertices<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut points = points.into_iter();
        let Some(first) = points.next() else {
            return Aabb::EMPTY;
        };

        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Self::from_points(min, max)
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(box0: &Aabb, box1: &Aabb) -> Self {
        Self {
            x: Interval::surrounding(&box0.x, &box1.x),
            y: Interval::surrounding(&box0.y, &box1.y),
            z: Interval::surrounding(&box0.z, &box1.z),
        }
    }

    /// Get the interval for a specific axis (0=X, 1=Y, 2=Z).
    pub fn axis_interval(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Minimum corner.
    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    /// Maximum corner.
    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Test if a ray intersects this AABB within the given interval.
    ///
    /// Slab method with reciprocal direction components. A zero component
    /// yields an infinite reciprocal, so that axis either imposes no
    /// constraint (origin inside the slab) or rejects the ray outright.
    pub fn hit(&self, r: &Ray, mut ray_t: Interval) -> bool {
        for axis in 0..3 {
            let slab = self.axis_interval(axis);
            let adinv = 1.0 / r.direction[axis];
            let origin = r.origin[axis];

            let mut t0 = (slab.min - origin) * adinv;
            let mut t1 = (slab.max - origin) * adinv;
            if adinv < 0.0 {
                std::mem::swap(&mut t0, &mut t1);
            }

            // f32::max/min drop a NaN operand (origin exactly on a slab
            // face of a parallel ray), leaving the interval unchanged.
            ray_t.min = t0.max(ray_t.min);
            ray_t.max = t1.min(ray_t.max);
            if ray_t.max <= ray_t.min {
                return false;
            }
        }

        true
    }

    /// Pad intervals to avoid zero-width AABBs (degenerate cases).
    fn pad_to_minimums(&mut self) {
        if self.x.size() < MIN_EXTENT {
            self.x = self.x.expand(MIN_EXTENT);
        }
        if self.y.size() < MIN_EXTENT {
            self.y = self.y.expand(MIN_EXTENT);
        }
        if self.z.size() < MIN_EXTENT {
            self.z = self.z.expand(MIN_EXTENT);
        }
    }

    /// Static constants
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };
}
