// Copyright @yucwang 2026

pub mod distribution;
pub mod envmap;
pub mod quad;

use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

pub use self::envmap::EnvMap;
pub use self::quad::QuadEmitter;

/// One light-sampling draw: an incident direction toward the emitter, the
/// distance to it (`Float::MAX` for the environment), the emitted radiance
/// along that direction and the solid-angle pdf of the draw.
pub struct EmitterSample {
    pub direction: Vector3f,
    pub distance: Float,
    pub radiance: RGBSpectrum,
    pub pdf: Float,
}

/// Closed set of light kinds the integrator knows about.
pub enum Emitter {
    Quad(QuadEmitter),
    Env(EnvMap),
}

impl Emitter {
    pub fn sample_toward(&self, p_ref: &Vector3f, u: &Vector2f) -> Option<EmitterSample> {
        match self {
            Emitter::Quad(quad) => quad.sample_toward(p_ref, u),
            Emitter::Env(env) => Some(env.sample_direction(u)),
        }
    }

    pub fn pdf_toward(&self, p_ref: &Vector3f, wi: &Vector3f) -> Float {
        match self {
            Emitter::Quad(quad) => quad.pdf_toward(p_ref, wi),
            Emitter::Env(env) => env.pdf_direction(wi),
        }
    }
}
