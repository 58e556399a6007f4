// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::intersect::{Intersector, SurfaceHit};
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::emitters::EmitterSample;
use crate::math::constants::{EPSILON, Float, Int, Vector2f, Vector3f};
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

/// Below this density a sampling strategy contributes nothing instead of
/// dividing by a near-zero pdf.
pub const PDF_EPSILON: Float = 1e-6;

// Shadow rays stop short of the emitter so the light's own surface does not
// report itself as an occluder.
const SHADOW_EPSILON: Float = 1e-3;

/// Power heuristic with beta = 2 for weighting two sampling strategies.
///
/// * `nf`    - Number of samples taken from `f_pdf`.
/// * `ng`    - Number of samples taken from `g_pdf`.
#[inline]
pub fn power_heuristic(nf: Int, f_pdf: Float, ng: Int, g_pdf: Float) -> Float {
    let f = nf as Float * f_pdf;
    let g = ng as Float * g_pdf;
    let denom = f * f + g * g;
    if denom <= 0.0 {
        return 0.0;
    }
    (f * f) / denom
}

/// Nudge a ray origin off the surface along whichever side of the geometric
/// normal the new direction leaves on.
pub fn offset_origin(p: &Vector3f, geo_normal: &Vector3f, direction: &Vector3f) -> Vector3f {
    if direction.dot(geo_normal) >= 0.0 {
        p + geo_normal * EPSILON
    } else {
        p - geo_normal * EPSILON
    }
}

/// Single-bounce direct lighting at one shading point, combining the
/// light-sampling strategy for one uniformly selected area emitter and for
/// the environment. The BSDF-sampling strategy for the same sources rides
/// on the bounce ray and is weighted at the next hit or miss.
pub fn estimate_direct(scene: &Scene,
                       hit: &SurfaceHit,
                       frame: &Frame,
                       wo_local: &Vector3f,
                       bsdf: &dyn BSDF,
                       rng: &mut LcgRng) -> RGBSpectrum {
    let mut radiance = RGBSpectrum::default();
    let p = hit.p();

    // Area emitters, one uniform pick with 1/N folded into the pdf.
    if scene.emitter_count() > 0 {
        let u_select = rng.next_f32();
        let u = Vector2f::new(rng.next_f32(), rng.next_f32());
        if let Some((_, light_sample)) = scene.sample_area_emitter(u_select, &u, &p) {
            radiance += shade_light_sample(scene, hit, frame, wo_local, bsdf, &light_sample);
        }
    }

    // Environment strategy, importance sampled from its 2D distribution.
    if let Some(env_emitter) = scene.environment_emitter() {
        let u = Vector2f::new(rng.next_f32(), rng.next_f32());
        if let Some(env_sample) = env_emitter.sample_toward(&p, &u) {
            radiance += shade_light_sample(scene, hit, frame, wo_local, bsdf, &env_sample);
        }
    }

    radiance
}

fn shade_light_sample(scene: &Scene,
                      hit: &SurfaceHit,
                      frame: &Frame,
                      wo_local: &Vector3f,
                      bsdf: &dyn BSDF,
                      light_sample: &EmitterSample) -> RGBSpectrum {
    if light_sample.pdf <= PDF_EPSILON || light_sample.radiance.is_black() {
        return RGBSpectrum::default();
    }

    let wi_local = frame.to_local(&light_sample.direction);
    let cos_theta = wi_local.z.abs();
    if cos_theta <= 0.0 {
        return RGBSpectrum::default();
    }

    let f = bsdf.eval(wo_local, &wi_local);
    if f.is_black() {
        return RGBSpectrum::default();
    }

    let shadow_origin = offset_origin(&hit.p(), &hit.geo_normal(), &light_sample.direction);
    let shadow_ray = Ray3f::new(shadow_origin, light_sample.direction, Some(0.0), None);
    let max_t = if light_sample.distance == Float::MAX {
        Float::MAX
    } else {
        light_sample.distance - SHADOW_EPSILON
    };
    if scene.trace_occlusion(&shadow_ray, max_t) {
        return RGBSpectrum::default();
    }

    let bsdf_pdf = bsdf.pdf(wo_local, &wi_local);
    let weight = power_heuristic(1, light_sample.pdf, 1, bsdf_pdf);
    f * light_sample.radiance * (cos_theta * weight / light_sample.pdf)
}

#[cfg(test)]
mod tests {
    use super::power_heuristic;

    #[test]
    fn test_power_heuristic_partition_of_unity() {
        let pairs = [
            (0.5, 0.5),
            (1.0, 3.0),
            (0.001, 10.0),
            (123.0, 0.04),
        ];
        for (p, q) in pairs {
            let sum = power_heuristic(1, p, 1, q) + power_heuristic(1, q, 1, p);
            assert!((sum - 1.0).abs() < 1e-6, "partition failed for ({}, {})", p, q);
        }
    }

    #[test]
    fn test_power_heuristic_degenerate_pdfs() {
        assert_eq!(power_heuristic(1, 0.0, 1, 0.0), 0.0);
        assert!((power_heuristic(1, 1.0, 1, 0.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_power_heuristic_sample_counts() {
        // More samples from a strategy increase its share.
        let single = power_heuristic(1, 1.0, 1, 1.0);
        let four = power_heuristic(4, 1.0, 1, 1.0);
        assert!(four > single);
    }
}
