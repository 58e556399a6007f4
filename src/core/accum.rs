// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector3f, Vector4f};
use crate::math::spectrum::RGBSpectrum;

/// Result of integrating one pixel for one frame: the averaged radiance of
/// all its samples plus the first-hit auxiliary channels used by denoisers.
#[derive(Clone, Copy, Debug)]
pub struct PixelSample {
    pub color: RGBSpectrum,
    pub albedo: RGBSpectrum,
    pub normal: Vector3f,
}

impl Default for PixelSample {
    fn default() -> Self {
        Self {
            color: RGBSpectrum::default(),
            albedo: RGBSpectrum::default(),
            normal: Vector3f::zeros(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AccumPixel {
    pub color: Vector4f,
    pub albedo: Vector4f,
    pub normal: Vector4f,
}

impl Default for AccumPixel {
    fn default() -> Self {
        Self {
            color: Vector4f::zeros(),
            albedo: Vector4f::zeros(),
            normal: Vector4f::zeros(),
        }
    }
}

/// Merge one frame's pixel result into its accumulation cell. With
/// `frame_id == 0` the history is discarded, so the first frame after a
/// reset lands exactly.
pub fn blend_pixel(pixel: &mut AccumPixel, frame_id: u32, sample: &PixelSample) {
    let n = frame_id as Float;
    let inv = 1.0 / (n + 1.0);

    let blend = |accum: &Vector4f, v: Vector3f| -> Vector4f {
        Vector4f::new(
            (v.x + n * accum.x) * inv,
            (v.y + n * accum.y) * inv,
            (v.z + n * accum.z) * inv,
            1.0,
        )
    };

    pixel.color = blend(&pixel.color, sample.color.to_vec());
    pixel.albedo = blend(&pixel.albedo, sample.albedo.to_vec());
    pixel.normal = blend(&pixel.normal, sample.normal);
}

/// Per-pixel running average across frames. Each cell is written by exactly
/// one pixel invocation per frame; the buffer-wide `frame_id` advances only
/// after every cell of the frame has been blended.
pub struct AccumBuffer {
    width: usize,
    height: usize,
    pixels: Vec<AccumPixel>,
    frame_id: u32,
    pose_revision: u64,
}

impl AccumBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![AccumPixel::default(); width * height],
            frame_id: 0,
            pose_revision: 0,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn frame_id(&self) -> u32 {
        self.frame_id
    }

    pub fn pixel(&self, x: usize, y: usize) -> &AccumPixel {
        &self.pixels[x + self.width * y]
    }

    /// Drop all accumulated history and restart the running average.
    pub fn reset(&mut self) {
        for pixel in self.pixels.iter_mut() {
            *pixel = AccumPixel::default();
        }
        self.frame_id = 0;
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels = vec![AccumPixel::default(); width * height];
        self.frame_id = 0;
    }

    /// Reset when the observed camera pose differs from the accumulated one.
    pub fn sync_pose(&mut self, pose_revision: u64) {
        if self.pose_revision != pose_revision {
            self.pose_revision = pose_revision;
            self.reset();
        }
    }

    pub fn blend(&mut self, x: usize, y: usize, sample: &PixelSample) {
        let frame_id = self.frame_id;
        blend_pixel(&mut self.pixels[x + self.width * y], frame_id, sample);
    }

    pub fn advance_frame(&mut self) {
        self.frame_id += 1;
    }

    /// Linear-HDR color plane, in the layout the EXR writer consumes.
    pub fn color_image(&self) -> Vec<(Float, Float, Float)> {
        self.pixels
            .iter()
            .map(|p| (p.color.x, p.color.y, p.color.z))
            .collect()
    }
}
