//! Scene driver: per-pixel path trees and the row-parallel frame pass.
//!
//! A [`Scene`] owns one [`PathNode`] per pixel. Every frame refines each
//! node by one sample and writes the current estimate into a caller-owned
//! byte buffer. Rows are handed to rayon workers; a row's nodes and its
//! slice of the buffer belong to exactly one task, so nothing is locked.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use glint_core::{ChannelOrder, Color4};
use glint_math::Aabb;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;

use crate::{
    camera::Camera,
    error::{SceneError, SceneResult},
    hittable::Hittable,
    integrator::{Integrator, PathNode},
};

/// Bytes per output pixel.
const BYTES_PER_PIXEL: usize = 3;

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Bounces allowed below each primary ray
    pub max_bounces: u32,
    /// Color returned by rays that leave the scene
    pub ambient: Color4,
    /// Base seed; every (frame, row) pair derives its own stream from it
    pub seed: u64,
    /// Worker threads, or `None` for rayon's default
    pub threads: Option<usize>,
    /// Channel order written into the pixel buffer
    pub output_order: ChannelOrder,
    /// Write the luminance as gray instead of the shaded color
    pub luminance_preview: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_bounces: 5,
            ambient: Color4::BLACK,
            seed: 0,
            threads: None,
            output_order: ChannelOrder::Rgb,
            luminance_preview: false,
        }
    }
}

/// Flags shared between a running scene and whoever drives it.
#[derive(Debug, Default)]
pub struct RenderControl {
    stop: AtomicBool,
    save: AtomicBool,
}

impl RenderControl {
    /// Ask the frame loop to end after the frame in flight.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::Release);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Ask for the next completed frame to be flagged for saving.
    pub fn request_save(&self) {
        self.save.store(true, Ordering::Release);
    }

    /// Consume a pending save request. Returns true at most once per request.
    pub fn take_save_request(&self) -> bool {
        self.save.swap(false, Ordering::AcqRel)
    }
}

/// Summary of one completed frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Zero-based index of the frame just rendered
    pub frame: u64,
    /// Samples folded into every pixel so far
    pub samples_per_pixel: u64,
    pub elapsed: Duration,
}

/// A renderable scene with persistent per-pixel state.
pub struct Scene {
    width: u32,
    height: u32,
    world: Box<dyn Hittable>,
    /// Row-major, one node per pixel
    paths: Vec<PathNode>,
    config: RenderConfig,
    frame: u64,
    pool: rayon::ThreadPool,
    control: Arc<RenderControl>,
}

impl Scene {
    /// Build the per-pixel path array from `camera` and the worker pool.
    pub fn new(world: Box<dyn Hittable>, mut camera: Camera, config: RenderConfig) -> SceneResult<Self> {
        let (width, height) = (camera.image_width, camera.image_height);
        if width == 0 || height == 0 {
            return Err(SceneError::EmptyImage { width, height });
        }

        camera.initialize()?;
        let camera = &camera;
        let budget = config.max_bounces;
        let paths: Vec<PathNode> = (0..height)
            .flat_map(|y| (0..width).map(move |x| PathNode::new(camera.primary_ray(x, y), budget)))
            .collect();

        let mut builder = rayon::ThreadPoolBuilder::new().thread_name(|i| format!("glint-row-{i}"));
        if let Some(threads) = config.threads {
            builder = builder.num_threads(threads);
        }
        let pool = builder.build()?;

        if world.bounding_box() == Aabb::EMPTY {
            log::warn!("Scene has no geometry; every pixel will show the ambient color");
        }

        log::info!(
            "Scene ready: {}x{} pixels, {} bounces, {} threads",
            width,
            height,
            config.max_bounces,
            pool.current_num_threads()
        );

        Ok(Self {
            width,
            height,
            world,
            paths,
            config,
            frame: 0,
            pool,
            control: Arc::new(RenderControl::default()),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Frames rendered so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Handle for stopping the frame loop or requesting a save from elsewhere.
    pub fn control(&self) -> Arc<RenderControl> {
        Arc::clone(&self.control)
    }

    /// Path tree of pixel `(x, y)`.
    pub fn path(&self, x: u32, y: u32) -> Option<&PathNode> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.paths.get((y * self.width + x) as usize)
    }

    /// Smallest buffer `render_frame` accepts for `stride`.
    pub fn required_len(&self, stride: usize) -> usize {
        stride * self.height as usize
    }

    /// Refine every pixel by one sample and write the result into `pixels`.
    ///
    /// Row `y` starts at byte `y * stride`; each pixel is three bytes in the
    /// configured channel order. Bytes past `3 * width` in a row are left
    /// alone.
    pub fn render_frame(&mut self, pixels: &mut [u8], stride: usize) -> SceneResult<FrameStats> {
        let width = self.width as usize;
        if stride < width * BYTES_PER_PIXEL {
            return Err(SceneError::StrideTooShort {
                stride,
                width: self.width,
            });
        }
        let needed = self.required_len(stride);
        if pixels.len() < needed {
            return Err(SceneError::BufferTooSmall {
                needed,
                got: pixels.len(),
            });
        }

        let start = Instant::now();
        let frame = self.frame;
        let seed = self.config.seed;
        let order = self.config.output_order;
        let preview = self.config.luminance_preview;
        let integrator = Integrator::new(self.world.as_ref(), self.config.ambient);
        let paths = &mut self.paths;

        self.pool.install(|| {
            pixels[..needed]
                .par_chunks_mut(stride)
                .zip(paths.par_chunks_mut(width))
                .enumerate()
                .for_each(|(y, (row, nodes))| {
                    let mut rng = StdRng::seed_from_u64(row_seed(seed, frame, y as u64));
                    for (pixel, node) in row.chunks_exact_mut(BYTES_PER_PIXEL).zip(nodes) {
                        let color = integrator.render(node, &mut rng);
                        let rgb = if preview {
                            color.luminance_to_gray8()
                        } else {
                            order.swizzle(color.to_rgb8())
                        };
                        pixel.copy_from_slice(&rgb);
                    }
                });
        });

        self.frame += 1;
        let stats = FrameStats {
            frame,
            samples_per_pixel: self.frame,
            elapsed: start.elapsed(),
        };
        log::debug!("Frame {} rendered in {:.2?}", stats.frame, stats.elapsed);

        Ok(stats)
    }

    /// Render frames until a stop is requested.
    ///
    /// After each frame `present` receives the frame stats, whether a save
    /// was requested since the previous frame, and the finished pixels. The
    /// stop flag is checked between frames only. Returns the number of
    /// frames rendered by this call.
    pub fn run<F>(&mut self, pixels: &mut [u8], stride: usize, mut present: F) -> SceneResult<u64>
    where
        F: FnMut(&FrameStats, bool, &[u8]),
    {
        let mut frames = 0;
        while !self.control.is_stopped() {
            let stats = self.render_frame(pixels, stride)?;
            let save_requested = self.control.take_save_request();
            present(&stats, save_requested, pixels);
            frames += 1;
        }

        log::info!("Render loop stopped after {} frames", frames);
        Ok(frames)
    }
}

/// Seed for the random stream of one row in one frame.
fn row_seed(seed: u64, frame: u64, row: u64) -> u64 {
    seed ^ frame.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ row.wrapping_mul(0xBF58_476D_1CE4_E5B9)
}
