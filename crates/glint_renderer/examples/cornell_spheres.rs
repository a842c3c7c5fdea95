//! Progressive render of the built-in demo room.
//!
//! Usage: `cornell_spheres [frames] [texture]`
//!
//! Renders `frames` refinement passes (default 64), requests a save for the
//! last one and writes it to `cornell_spheres.png`. The textured ball uses
//! `texture` if given, otherwise a generated checkerboard.

use anyhow::{ensure, Context, Result};
use glint_renderer::{demo, RenderConfig, Scene, Texture};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const OUTPUT: &str = "cornell_spheres.png";

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let frames: u64 = match args.next() {
        Some(n) => n.parse().with_context(|| format!("Invalid frame count: {n}"))?,
        None => 64,
    };
    ensure!(frames > 0, "Frame count must be at least 1");
    let texture = match args.next() {
        Some(path) => Texture::open(&path)?,
        None => demo::checker_texture(256, 8)?,
    };

    let world = demo::cornell_spheres(texture)?;
    let camera = demo::cornell_camera(WIDTH, HEIGHT);
    let mut scene = Scene::new(Box::new(world), camera, RenderConfig::default())?;

    let stride = WIDTH as usize * 3;
    let mut pixels = vec![0u8; scene.required_len(stride)];
    let control = scene.control();
    let mut save_result = Ok(());

    // A save request is picked up once the next frame completes
    if frames == 1 {
        control.request_save();
    }

    scene.run(&mut pixels, stride, |stats, save_requested, pixels| {
        if stats.frame % 16 == 0 {
            log::info!("Frame {} took {:.2?}", stats.frame, stats.elapsed);
        }
        if stats.samples_per_pixel + 1 == frames {
            control.request_save();
        }
        if save_requested {
            save_result = save_png(pixels);
            control.request_stop();
        }
    })?;

    save_result?;
    log::info!("Saved {OUTPUT}");
    Ok(())
}

fn save_png(pixels: &[u8]) -> Result<()> {
    let image = image::RgbImage::from_raw(WIDTH, HEIGHT, pixels.to_vec())
        .context("Pixel buffer does not match the image size")?;
    image
        .save(OUTPUT)
        .with_context(|| format!("Failed to write {OUTPUT}"))
}
