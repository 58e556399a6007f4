// Copyright @yucwang 2026

use crate::math::constants::Float;

/// Caller-owned render configuration, read once at the start of each frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderSettings {
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// Bounce index after which Russian roulette may terminate the walk.
    pub rr_start_depth: u32,
    /// Luminance ceiling applied to each frame's pixel average before it is
    /// blended into the accumulation history. `None` disables the clamp.
    pub firefly_clamp: Option<Float>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            samples_per_pixel: 16,
            max_depth: 6,
            rr_start_depth: 3,
            firefly_clamp: None,
        }
    }
}
