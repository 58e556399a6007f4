// Copyright @yucwang 2026

use crate::math::constants::Float;
use crate::math::spectrum::RGBSpectrum;
use exr::prelude::*;
use std::result::Result;
use image::io::Reader as ImageReader;
use image::GenericImageView;
use std::path::Path;

/// Decoded equirectangular radiance image, row-major with row 0 at the +y
/// pole (v = 0 of the lat-long mapping).
pub struct EnvImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<RGBSpectrum>,
}

fn srgb_to_linear(v: Float) -> Float {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

pub fn load_environment(path: &str) -> Result<EnvImage, String> {
    let ext = Path::new(path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "exr" => load_exr(path),
        "" => Err(format!("environment map path has no extension: {}", path)),
        _ => load_image(path),
    }
}

fn load_exr(path: &str) -> Result<EnvImage, String> {
    let image = read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _| {
                let width = resolution.width() as usize;
                let height = resolution.height() as usize;
                EnvImage {
                    width,
                    height,
                    pixels: vec![RGBSpectrum::default(); width * height],
                }
            },
            |image, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                let x = position.x() as usize;
                let y = position.y() as usize;
                image.pixels[y * image.width + x] = RGBSpectrum::new(r, g, b);
            },
        )
        .first_valid_layer()
        .all_attributes()
        .from_file(path)
        .map_err(|e| format!("failed to read exr {}: {}", path, e))?;

    Ok(image.layer_data.channel_data.pixels)
}

fn load_image(path: &str) -> Result<EnvImage, String> {
    let img = ImageReader::open(path)
        .map_err(|e| format!("failed to open image {}: {}", path, e))?
        .decode()
        .map_err(|e| format!("failed to decode image {}: {}", path, e))?;

    // Float sources (e.g. Radiance HDR) are already linear; integer sources
    // carry the sRGB transfer curve.
    let needs_linearize = !matches!(
        img.color(),
        image::ColorType::Rgb32F | image::ColorType::Rgba32F
    );

    let (width, height) = img.dimensions();
    let width = width as usize;
    let height = height as usize;
    let rgb = img.to_rgb32f();

    let mut pixels = vec![RGBSpectrum::default(); width * height];
    for y in 0..height {
        for x in 0..width {
            let p = rgb.get_pixel(x as u32, y as u32);
            let (mut r, mut g, mut b) = (p[0], p[1], p[2]);
            if needs_linearize {
                r = srgb_to_linear(r);
                g = srgb_to_linear(g);
                b = srgb_to_linear(b);
            }
            pixels[y * width + x] = RGBSpectrum::new(r, g, b);
        }
    }

    Ok(EnvImage { width, height, pixels })
}
