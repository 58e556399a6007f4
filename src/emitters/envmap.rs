// Copyright @yucwang 2026

use crate::emitters::distribution::EnvDistribution;
use crate::emitters::EmitterSample;
use crate::io::env_loader;
use crate::math::constants::{Float, PI, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

/// Infinite-area light backed by an equirectangular radiance image and a
/// luminance-weighted importance distribution.
pub struct EnvMap {
    width: usize,
    height: usize,
    radiance: Vec<RGBSpectrum>,
    scale: Float,
    distribution: EnvDistribution,
}

impl EnvMap {
    pub fn from_buffer(width: usize,
                       height: usize,
                       radiance: Vec<RGBSpectrum>,
                       scale: Float) -> Result<Self, String> {
        if width == 0 || height == 0 || radiance.len() != width * height {
            return Err(format!(
                "environment map has invalid dimensions: {}x{} with {} texels",
                width,
                height,
                radiance.len()
            ));
        }

        // The sin(theta) factor undoes the equirectangular area distortion:
        // texels near the poles subtend less solid angle.
        let mut weights = vec![0.0; width * height];
        for y in 0..height {
            let v = (y as Float + 0.5) / height as Float;
            let sin_theta = (v * PI).sin();
            for x in 0..width {
                weights[y * width + x] = radiance[y * width + x].luminance() * sin_theta;
            }
        }
        let distribution = EnvDistribution::from_weights(width, height, &weights);

        Ok(Self { width, height, radiance, scale, distribution })
    }

    pub fn from_file(path: &str, scale: Float) -> Result<Self, String> {
        let image = env_loader::load_environment(path)?;
        Self::from_buffer(image.width, image.height, image.pixels, scale)
    }

    /// Uniform-radiance environment, mostly useful for tests and fallbacks.
    pub fn from_constant(radiance: RGBSpectrum, width: usize, height: usize) -> Self {
        let texels = vec![radiance; width * height];
        Self::from_buffer(width, height, texels, 1.0)
            .expect("constant environment dimensions are valid")
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn distribution(&self) -> &EnvDistribution {
        &self.distribution
    }

    pub fn uv_from_direction(d: &Vector3f) -> Vector2f {
        let u = 0.5 * (1.0 + d.x.atan2(-d.z) / PI);
        let v = d.y.clamp(-1.0, 1.0).acos() / PI;
        Vector2f::new(u, v)
    }

    pub fn direction_from_uv(uv: &Vector2f) -> Vector3f {
        let phi = (2.0 * uv.x - 1.0) * PI;
        let theta = uv.y * PI;
        let sin_theta = theta.sin();
        Vector3f::new(sin_theta * phi.sin(), theta.cos(), -sin_theta * phi.cos())
    }

    /// Pixel-center radiance lookup. Kept unfiltered so the value seen by
    /// the estimator is exactly the one the distribution was built from.
    pub fn eval_uv(&self, uv: &Vector2f) -> RGBSpectrum {
        let x = ((uv.x * self.width as Float) as usize).min(self.width - 1);
        let y = ((uv.y * self.height as Float) as usize).min(self.height - 1);
        self.radiance[y * self.width + x] * self.scale
    }

    pub fn eval_direction(&self, direction: &Vector3f) -> RGBSpectrum {
        let len = direction.norm();
        if len <= 0.0 {
            return RGBSpectrum::default();
        }
        self.eval_uv(&Self::uv_from_direction(&(direction / len)))
    }

    /// Importance-sample an incident direction proportional to luminance.
    pub fn sample_direction(&self, u: &Vector2f) -> EmitterSample {
        let (uv, pdf) = self.distribution.sample(u.x, u.y);
        EmitterSample {
            direction: Self::direction_from_uv(&uv),
            distance: Float::MAX,
            radiance: self.eval_uv(&uv),
            pdf,
        }
    }

    /// Solid-angle pdf the sampler assigns to an arbitrary world direction.
    pub fn pdf_direction(&self, direction: &Vector3f) -> Float {
        let len = direction.norm();
        if len <= 0.0 {
            return 0.0;
        }
        self.distribution
            .pdf(&Self::uv_from_direction(&(direction / len)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uv_direction_round_trip() {
        let dirs = [
            Vector3f::new(1.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.3, 0.8, -0.2).normalize(),
            Vector3f::new(-0.5, -0.4, 0.6).normalize(),
        ];
        for d in &dirs {
            let uv = EnvMap::uv_from_direction(d);
            assert!(uv.x >= 0.0 && uv.x <= 1.0);
            assert!(uv.y >= 0.0 && uv.y <= 1.0);
            let back = EnvMap::direction_from_uv(&uv);
            assert!((back - d).norm() < 1e-4, "{:?} -> {:?} -> {:?}", d, uv, back);
        }
    }

    #[test]
    fn test_sample_pdf_consistent_with_query() {
        let mut radiance = vec![RGBSpectrum::from_scalar(0.05); 16 * 8];
        radiance[3 * 16 + 9] = RGBSpectrum::new(40.0, 30.0, 20.0);
        let env = EnvMap::from_buffer(16, 8, radiance, 1.0).unwrap();

        let mut rng = crate::core::rng::LcgRng::new(11);
        for _ in 0..128 {
            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            let s = env.sample_direction(&u);
            let queried = env.pdf_direction(&s.direction);
            assert!((s.pdf - queried).abs() <= 0.01 * s.pdf);
        }
    }

    #[test]
    fn test_constant_environment_radiance() {
        let env = EnvMap::from_constant(RGBSpectrum::from_scalar(2.5), 8, 4);
        let d = Vector3f::new(0.2, -0.7, 0.4).normalize();
        let le = env.eval_direction(&d);
        assert!((le[0] - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(EnvMap::from_buffer(0, 4, Vec::new(), 1.0).is_err());
        assert!(EnvMap::from_buffer(4, 4, vec![RGBSpectrum::default(); 3], 1.0).is_err());
    }
}
