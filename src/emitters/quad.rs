// Copyright @yucwang 2026

use crate::emitters::EmitterSample;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::shapes::quad::Quad;

/// Rectangular area light. Emission leaves the front face only (the side
/// the geometric normal points toward).
pub struct QuadEmitter {
    quad: Quad,
    radiance: RGBSpectrum,
}

impl QuadEmitter {
    pub fn new(quad: Quad, radiance: RGBSpectrum) -> Self {
        Self { quad, radiance }
    }

    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    pub fn radiance(&self) -> RGBSpectrum {
        self.radiance
    }

    /// Sample a point on the emitter as seen from `p_ref`, returning the
    /// direction, distance and solid-angle pdf. Back-facing and degenerate
    /// configurations return `None`.
    pub fn sample_toward(&self, p_ref: &Vector3f, u: &Vector2f) -> Option<EmitterSample> {
        let area = self.quad.area();
        if area <= 0.0 {
            return None;
        }

        let p_light = self.quad.point_at(u);
        let to_light = p_light - p_ref;
        let dist2 = to_light.norm_squared();
        if dist2 <= 0.0 {
            return None;
        }
        let distance = dist2.sqrt();
        let direction = to_light / distance;

        let cos_light = self.quad.normal().dot(&(-direction));
        if cos_light <= 0.0 {
            return None;
        }

        // Area density 1/A converted to solid angle at the receiver.
        let pdf = dist2 / (area * cos_light);
        Some(EmitterSample {
            direction,
            distance,
            radiance: self.radiance,
            pdf,
        })
    }

    /// Solid-angle pdf of reaching this emitter from `p_ref` along `wi`,
    /// zero when the ray misses the quad or approaches its back face.
    pub fn pdf_toward(&self, p_ref: &Vector3f, wi: &Vector3f) -> Float {
        let (t, _) = match self.quad.intersect(p_ref, wi) {
            Some(hit) => hit,
            None => return 0.0,
        };

        let cos_light = self.quad.normal().dot(&(-wi));
        if cos_light <= 0.0 {
            return 0.0;
        }

        let area = self.quad.area();
        if area <= 0.0 {
            return 0.0;
        }
        t * t / (area * cos_light)
    }
}
