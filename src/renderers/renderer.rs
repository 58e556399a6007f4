// Copyright @yucwang 2026

use crate::core::accum::AccumBuffer;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;

pub trait Renderer {
    /// Integrate one frame of the scene and merge it into the accumulation
    /// buffer's running average.
    fn render_frame(&self, scene: &Scene, sensor: &dyn Sensor, accum: &mut AccumBuffer);
}
