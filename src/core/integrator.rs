// Copyright @yucwang 2026

use crate::core::accum::PixelSample;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::math::constants::Vector2f;

pub trait Integrator: Sync {
    /// Integrate one sample for the film coordinate `uv` in [0, 1)^2,
    /// returning the sample radiance plus the first-hit aux channels.
    fn trace_ray_forward(&self,
                         scene: &Scene,
                         sensor: &dyn Sensor,
                         uv: Vector2f,
                         rng: &mut LcgRng) -> PixelSample;

    fn samples_per_pixel(&self) -> u32;
}
