//! Progressive recursive integrator.
//!
//! Every pixel owns a [`PathNode`] tree that survives between frames. Each
//! call to [`Integrator::render`] refines the tree by one more sample:
//!
//! - the primary intersection is found once and memoized
//! - diffuse surfaces spawn a fresh random bounce per call and fold its
//!   result into a running mean
//! - specular surfaces build their reflection (and refraction) children
//!   once and keep refining them
//!
//! Nodes are never shared between pixels, so one task can refine a row of
//! nodes with no synchronization at all.

use glint_core::{Color4, SurfaceKind};
use glint_math::{random_in_hemisphere, reflect, refract, Interval, Ray, Vec3};
use rand::RngCore;

use crate::hittable::{HitRecord, Hittable, HIT_EPSILON};

/// Running sum of radiance samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Estimator {
    sum: Color4,
    count: u32,
}

impl Estimator {
    pub const EMPTY: Estimator = Estimator {
        sum: Color4::BLACK,
        count: 0,
    };

    /// Fold one more sample in.
    #[must_use]
    pub fn record(self, sample: Color4) -> Self {
        Self {
            sum: self.sum + sample,
            count: self.count + 1,
        }
    }

    /// Mean of every sample so far, `None` before the first one.
    pub fn mean(&self) -> Option<Color4> {
        (self.count > 0).then(|| self.sum / self.count as f32)
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

/// What a node's ray hit, copied out of the hit record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub position: Vec3,
    /// Faces against the incoming ray
    pub normal: Vec3,
    pub color: Color4,
    pub kind: SurfaceKind,
    pub refractivity: f32,
}

impl SurfaceSample {
    fn from_record(rec: &HitRecord<'_>) -> Self {
        Self {
            position: rec.p,
            normal: rec.normal,
            color: rec.color,
            kind: rec.material.kind,
            refractivity: rec.refractivity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
enum Resolution {
    #[default]
    Unresolved,
    Miss,
    Hit(SurfaceSample),
}

/// One ray in a pixel's path tree, plus everything learned about it so far.
#[derive(Debug, Clone)]
pub struct PathNode {
    ray: Ray,
    /// Bounces still allowed below this node
    budget: u32,
    resolution: Resolution,
    diffuse: Estimator,
    reflection: Option<Box<PathNode>>,
    refraction: Option<Box<PathNode>>,
    /// Reflection weight in the reflection/refraction blend, fixed once the
    /// refraction attempt has been made.
    blend: Option<f32>,
}

impl PathNode {
    pub fn new(ray: Ray, budget: u32) -> Self {
        Self {
            ray,
            budget,
            resolution: Resolution::Unresolved,
            diffuse: Estimator::EMPTY,
            reflection: None,
            refraction: None,
            blend: None,
        }
    }

    pub fn ray(&self) -> &Ray {
        &self.ray
    }

    pub fn budget(&self) -> u32 {
        self.budget
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.resolution, Resolution::Unresolved)
    }

    /// The memoized surface hit, if the ray has been traced and hit something.
    pub fn surface(&self) -> Option<&SurfaceSample> {
        match &self.resolution {
            Resolution::Hit(surface) => Some(surface),
            _ => None,
        }
    }

    pub fn diffuse_estimate(&self) -> Estimator {
        self.diffuse
    }

    pub fn blend_weight(&self) -> Option<f32> {
        self.blend
    }

    pub fn reflection(&self) -> Option<&PathNode> {
        self.reflection.as_deref()
    }

    pub fn refraction(&self) -> Option<&PathNode> {
        self.refraction.as_deref()
    }
}

/// Evaluates path trees against one world.
#[derive(Clone, Copy)]
pub struct Integrator<'w> {
    world: &'w dyn Hittable,
    ambient: Color4,
}

impl<'w> Integrator<'w> {
    pub fn new(world: &'w dyn Hittable, ambient: Color4) -> Self {
        Self { world, ambient }
    }

    pub fn ambient(&self) -> Color4 {
        self.ambient
    }

    /// Refine `node` by one sample and return its current estimate.
    ///
    /// Recursion depth is bounded by the node's budget: a node with budget
    /// `b` makes at most `b + 1` nested calls.
    pub fn render(&self, node: &mut PathNode, rng: &mut dyn RngCore) -> Color4 {
        let Some(surface) = self.resolve(node) else {
            return self.ambient;
        };

        let incoming = match surface.kind {
            SurfaceKind::Emission => return surface.color,
            _ if node.budget == 0 => return surface.color,
            SurfaceKind::Diffuse => self.scatter_diffuse(node, &surface, rng),
            SurfaceKind::Specular => self.scatter_specular(node, &surface, rng),
        };

        Color4::mix(surface.color, incoming)
    }

    /// Trace the node's ray the first time it is rendered.
    fn resolve(&self, node: &mut PathNode) -> Option<SurfaceSample> {
        if let Resolution::Unresolved = node.resolution {
            let mut rec = HitRecord::default();
            node.resolution = if self.world.hit(&node.ray, Interval::beyond(HIT_EPSILON), &mut rec) {
                Resolution::Hit(SurfaceSample::from_record(&rec))
            } else {
                Resolution::Miss
            };
        }

        match node.resolution {
            Resolution::Hit(surface) => Some(surface),
            _ => None,
        }
    }

    fn scatter_diffuse(&self, node: &mut PathNode, surface: &SurfaceSample, rng: &mut dyn RngCore) -> Color4 {
        let direction = random_in_hemisphere(surface.normal, rng);
        let mut bounce = PathNode::new(Ray::new(surface.position, direction), node.budget - 1);
        let sample = self.render(&mut bounce, rng);

        node.diffuse = node.diffuse.record(sample);
        node.diffuse.mean().unwrap_or(sample)
    }

    fn scatter_specular(&self, node: &mut PathNode, surface: &SurfaceSample, rng: &mut dyn RngCore) -> Color4 {
        let direction = node.ray.direction();
        let child_budget = node.budget - 1;

        let reflection = node.reflection.get_or_insert_with(|| {
            let reflected = reflect(direction, surface.normal);
            Box::new(PathNode::new(Ray::new(surface.position, reflected), child_budget))
        });
        let reflected = self.render(reflection, rng);

        if surface.refractivity <= 0.0 {
            return reflected;
        }

        if node.blend.is_none() {
            // Refraction is attempted once; total internal reflection keeps
            // the node pure mirror from then on.
            node.blend = Some(match refract(direction, surface.normal, surface.refractivity) {
                Some(transmitted) => {
                    node.refraction = Some(Box::new(PathNode::new(
                        Ray::new(surface.position, transmitted),
                        child_budget,
                    )));
                    1.0 - direction.dot(surface.normal).abs()
                }
                None => 1.0,
            });
        }

        match (node.refraction.as_deref_mut(), node.blend) {
            (Some(refraction), Some(w)) => {
                let transmitted = self.render(refraction, rng);
                reflected * w + transmitted * (1.0 - w)
            }
            _ => reflected,
        }
    }
}
