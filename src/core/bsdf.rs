// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;

// Directions are expressed in the local shading frame: the surface normal
// sits on +z, so cos(theta) of a direction is its z component.

#[derive(Debug, PartialEq)]
pub struct BSDFSample {
    pub wi: Vector3f,
    pub pdf: Float,
    pub value: RGBSpectrum,
}

impl Default for BSDFSample {
    fn default() -> Self {
        Self {
            wi: Vector3f::zeros(),
            pdf: 0.0,
            value: RGBSpectrum::default(),
        }
    }
}

pub trait BSDF: Send + Sync {
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Evaluate the scattering value for a fixed pair of directions.
    fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> RGBSpectrum;

    /// Draw an incident direction together with its pdf and value.
    fn sample(&self, u: &Vector2f, wo: &Vector3f) -> BSDFSample;

    /// Density the sampling routine would assign to `wi`.
    fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float;

    /// Mean reflectance, exported as the denoiser albedo channel.
    fn albedo(&self) -> RGBSpectrum;
}
