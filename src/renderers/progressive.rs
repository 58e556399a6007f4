// Copyright @yucwang 2026

use crate::core::accum::{AccumBuffer, PixelSample};
use crate::core::integrator::Integrator;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::Renderer;

const BLOCK_SIZE: usize = 64;

/// Frame-at-a-time render driver. Pixels are integrated block by block on
/// scoped worker threads, then merged serially into the accumulation buffer
/// so that each cell keeps a single writer.
pub struct ProgressiveRenderer {
    integrator: Box<dyn Integrator>,
    firefly_clamp: Option<Float>,
}

impl ProgressiveRenderer {
    pub fn new(integrator: Box<dyn Integrator>, firefly_clamp: Option<Float>) -> Self {
        Self { integrator, firefly_clamp }
    }

    /// Average `spp` independent walks for one pixel of one frame.
    fn integrate_pixel(&self,
                       scene: &Scene,
                       sensor: &dyn Sensor,
                       x: usize,
                       y: usize,
                       width: usize,
                       height: usize,
                       frame_id: u32) -> PixelSample {
        let spp = self.integrator.samples_per_pixel().max(1);
        let inv_spp = 1.0 / spp as Float;
        let pixel_index = (x + width * y) as u32;

        let mut color = RGBSpectrum::default();
        let mut albedo = RGBSpectrum::default();
        let mut normal = Vector3f::zeros();
        for sample_index in 0..spp {
            let mut rng = LcgRng::from_pixel(pixel_index, frame_id, sample_index);
            let uv = Vector2f::new(
                (x as Float + rng.next_f32()) / width as Float,
                (y as Float + rng.next_f32()) / height as Float,
            );
            let sample = self.integrator.trace_ray_forward(scene, sensor, uv, &mut rng);
            color += sample.color;
            albedo += sample.albedo;
            normal += sample.normal;
        }

        let mut color = color * inv_spp;
        if let Some(max_luminance) = self.firefly_clamp {
            // Clamp the frame average before it enters the temporal blend,
            // so every frame carries the same bias and the accumulated value
            // converges to the clamped estimator's mean.
            color = color.clamp_luminance(max_luminance);
        }

        PixelSample {
            color,
            albedo: albedo * inv_spp,
            normal: normal * inv_spp,
        }
    }
}

impl Renderer for ProgressiveRenderer {
    fn render_frame(&self, scene: &Scene, sensor: &dyn Sensor, accum: &mut AccumBuffer) {
        let (width, height) = (accum.width(), accum.height());
        if width == 0 || height == 0 {
            return;
        }

        accum.sync_pose(sensor.pose_revision());
        let frame_id = accum.frame_id();

        let blocks_x = (width + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let blocks_y = (height + BLOCK_SIZE - 1) / BLOCK_SIZE;
        let total_blocks = blocks_x * blocks_y;

        let progress = ProgressBar::new(total_blocks as u64);
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<(usize, usize, usize, usize, Vec<PixelSample>)>();

        thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * BLOCK_SIZE;
                        let y0 = by * BLOCK_SIZE;
                        let x1 = (x0 + BLOCK_SIZE).min(width);
                        let y1 = (y0 + BLOCK_SIZE).min(height);

                        let mut block = vec![PixelSample::default(); (x1 - x0) * (y1 - y0)];
                        for y in y0..y1 {
                            for x in x0..x1 {
                                block[(x - x0) + (x1 - x0) * (y - y0)] = self
                                    .integrate_pixel(scene, sensor, x, y, width, height, frame_id);
                            }
                        }
                        if tx.send((x0, y0, x1, y1, block)).is_err() {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            for _ in 0..total_blocks {
                if let Ok((x0, y0, x1, y1, block)) = rx.recv() {
                    for y in y0..y1 {
                        for x in x0..x1 {
                            accum.blend(x, y, &block[(x - x0) + (x1 - x0) * (y - y0)]);
                        }
                    }
                    progress.inc(1);
                }
            }
        });
        progress.finish_and_clear();

        accum.advance_frame();
    }
}
