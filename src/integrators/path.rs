// Copyright @yucwang 2026

use crate::core::accum::PixelSample;
use crate::core::integrator::Integrator;
use crate::core::intersect::Intersector;
use crate::core::rng::LcgRng;
use crate::core::scene::Scene;
use crate::core::sensor::Sensor;
use crate::core::settings::RenderSettings;
use crate::integrators::common::{estimate_direct, offset_origin, power_heuristic, PDF_EPSILON};
use crate::math::constants::{Float, Vector2f};
use crate::math::frame::Frame;
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;

const RR_SURVIVAL_MIN: Float = 0.05;

/// Decide survival of the walk for a roulette draw `u`. Survivors get their
/// throughput divided by the survival probability, which keeps the
/// estimator unbiased.
pub fn russian_roulette(throughput: RGBSpectrum, u: Float) -> Option<RGBSpectrum> {
    let q = throughput.max_component().clamp(RR_SURVIVAL_MIN, 1.0);
    if u >= q {
        None
    } else {
        Some(throughput / q)
    }
}

pub struct PathIntegrator {
    settings: RenderSettings,
}

impl PathIntegrator {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }
}

impl Integrator for PathIntegrator {
    fn trace_ray_forward(&self,
                         scene: &Scene,
                         sensor: &dyn Sensor,
                         uv: Vector2f,
                         rng: &mut LcgRng) -> PixelSample {
        let ray = sensor.sample_ray(&uv);
        self.trace_path(scene, ray, rng)
    }

    fn samples_per_pixel(&self) -> u32 {
        self.settings.samples_per_pixel
    }
}

impl PathIntegrator {
    /// Run one random walk, returning its radiance estimate plus the
    /// first-hit albedo/normal aux channels.
    pub fn trace_path(&self, scene: &Scene, mut ray: Ray3f, rng: &mut LcgRng) -> PixelSample {
        let mut result = PixelSample::default();
        let mut radiance = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::new(1.0, 1.0, 1.0);
        let mut prev_bsdf_pdf: Float = 0.0;

        for bounce in 0..self.settings.max_depth {
            let hit = match scene.trace(&ray) {
                Some(hit) => hit,
                None => {
                    // Escaped the scene. The environment lookup is the BSDF
                    // half of the MIS pair, so weight it against the light
                    // pdf of the escaped direction; the primary ray has no
                    // competing strategy and keeps full weight.
                    if let Some(env) = scene.environment() {
                        let le = env.eval_direction(&ray.dir());
                        if !le.is_black() {
                            let weight = if bounce == 0 {
                                1.0
                            } else {
                                power_heuristic(
                                    1,
                                    prev_bsdf_pdf,
                                    1,
                                    env.pdf_direction(&ray.dir()),
                                )
                            };
                            radiance += throughput * le * weight;
                        }
                    } else {
                        // Flat backdrop; nothing importance-samples it, so
                        // the bounce ray is its only estimator.
                        radiance += throughput * scene.background();
                    }
                    break;
                }
            };

            if let Some(emitter_index) = hit.emitter_index() {
                let le = scene.emitter_radiance(emitter_index, &hit.geo_normal(), &hit.wo());
                if !le.is_black() {
                    let weight = if bounce == 0 {
                        1.0
                    } else {
                        let light_pdf =
                            scene.area_emitter_pdf(emitter_index, &ray.origin(), &ray.dir());
                        power_heuristic(1, prev_bsdf_pdf, 1, light_pdf)
                    };
                    radiance += throughput * le * weight;
                }
            }

            let bsdf = scene.material(hit.material_id());
            let frame = Frame::from_normal(&hit.sh_normal());
            let wo_local = frame.to_local(&hit.wo());

            if bounce == 0 {
                result.albedo = bsdf.albedo();
                result.normal = hit.sh_normal();
            }

            radiance += throughput * estimate_direct(scene, &hit, &frame, &wo_local, bsdf, rng);

            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            let bsdf_sample = bsdf.sample(&u, &wo_local);
            if bsdf_sample.pdf <= PDF_EPSILON || bsdf_sample.value.is_black() {
                break;
            }

            throughput *= bsdf_sample.value * (bsdf_sample.wi.z.abs() / bsdf_sample.pdf);

            if bounce > self.settings.rr_start_depth {
                match russian_roulette(throughput, rng.next_f32()) {
                    Some(compensated) => throughput = compensated,
                    None => break,
                }
            }

            prev_bsdf_pdf = bsdf_sample.pdf;
            let wi_world = frame.to_world(&bsdf_sample.wi);
            let origin = offset_origin(&hit.p(), &hit.geo_normal(), &wi_world);
            ray = Ray3f::new(origin, wi_world, Some(0.0), None);
        }

        result.color = radiance;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitters::EnvMap;
    use crate::materials::lambertian::LambertianBSDF;
    use crate::math::constants::Vector3f;
    use crate::shapes::quad::Quad;
    use crate::shapes::sphere::Sphere;
    use std::sync::Arc;

    fn integrator(max_depth: u32) -> PathIntegrator {
        PathIntegrator::new(RenderSettings {
            max_depth,
            ..RenderSettings::default()
        })
    }

    #[test]
    fn test_empty_scene_returns_background() {
        let mut scene = Scene::new();
        scene.set_background(RGBSpectrum::new(0.1, 0.2, 0.3));

        let mut rng = LcgRng::new(1);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, -1.0), None, None);
        let sample = integrator(4).trace_path(&scene, ray, &mut rng);
        assert_eq!(sample.color, RGBSpectrum::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn test_primary_hit_on_light_returns_emission() {
        let mut scene = Scene::new();
        let black = scene.add_material(Arc::new(LambertianBSDF::new(RGBSpectrum::default())));
        scene.add_quad_light(
            Quad::new(
                Vector3f::new(-1.0, 3.0, -1.0),
                Vector3f::new(2.0, 0.0, 0.0),
                Vector3f::new(0.0, 0.0, 2.0),
            ),
            black,
            RGBSpectrum::from_scalar(7.0),
        );

        let mut rng = LcgRng::new(1);
        let ray = Ray3f::new(Vector3f::zeros(), Vector3f::new(0.0, 1.0, 0.0), None, None);
        let sample = integrator(4).trace_path(&scene, ray, &mut rng);
        assert!((sample.color[0] - 7.0).abs() < 1e-4);
    }

    #[test]
    fn test_furnace_energy_conservation() {
        // A white diffuse sphere inside a uniform environment must reflect
        // exactly the environment radiance.
        let mut scene = Scene::new();
        let white = scene.add_material(Arc::new(LambertianBSDF::new(
            RGBSpectrum::from_scalar(1.0),
        )));
        scene.add_object(Arc::new(Sphere::new(Vector3f::zeros(), 1.0)), white);
        scene.set_environment(EnvMap::from_constant(RGBSpectrum::from_scalar(1.0), 8, 4));

        let integrator = integrator(3);
        let primary = || {
            Ray3f::new(
                Vector3f::new(0.0, 0.0, 3.0),
                Vector3f::new(0.0, 0.0, -1.0),
                None,
                None,
            )
        };

        let samples = 2000;
        let mut mean = 0.0;
        for s in 0..samples {
            let mut rng = LcgRng::from_pixel(0, 0, s);
            let sample = integrator.trace_path(&scene, primary(), &mut rng);
            mean += sample.color.luminance();
        }
        mean /= samples as Float;
        assert!(
            (mean - 1.0).abs() < 0.03,
            "furnace test returned {} instead of 1.0",
            mean
        );
    }

    #[test]
    fn test_russian_roulette_is_unbiased() {
        let throughput = RGBSpectrum::new(0.3, 0.2, 0.1);
        let trials = 200_000;
        let mut rng = LcgRng::new(77);

        let mut mean = Vector3f::zeros();
        for _ in 0..trials {
            if let Some(compensated) = russian_roulette(throughput, rng.next_f32()) {
                mean += compensated.to_vec();
            }
        }
        mean /= trials as Float;

        let expected = throughput.to_vec();
        for i in 0..3 {
            assert!(
                (mean[i] - expected[i]).abs() < 0.01 * expected[i].max(0.05),
                "channel {} drifted: {} vs {}",
                i,
                mean[i],
                expected[i]
            );
        }
    }

    // BSDF-only reference walk: no next-event estimation, no MIS weights.
    // Unbiased but high-variance; used to cross-check the MIS estimator.
    fn trace_brute_force(scene: &Scene, mut ray: Ray3f, rng: &mut LcgRng, max_depth: u32) -> RGBSpectrum {
        let mut radiance = RGBSpectrum::default();
        let mut throughput = RGBSpectrum::new(1.0, 1.0, 1.0);

        for _ in 0..max_depth {
            let hit = match scene.trace(&ray) {
                Some(hit) => hit,
                None => {
                    if let Some(env) = scene.environment() {
                        radiance += throughput * env.eval_direction(&ray.dir());
                    } else {
                        radiance += throughput * scene.background();
                    }
                    break;
                }
            };

            if let Some(emitter_index) = hit.emitter_index() {
                radiance += throughput
                    * scene.emitter_radiance(emitter_index, &hit.geo_normal(), &hit.wo());
            }

            let bsdf = scene.material(hit.material_id());
            let frame = Frame::from_normal(&hit.sh_normal());
            let wo_local = frame.to_local(&hit.wo());

            let u = Vector2f::new(rng.next_f32(), rng.next_f32());
            let bsdf_sample = bsdf.sample(&u, &wo_local);
            if bsdf_sample.pdf <= PDF_EPSILON || bsdf_sample.value.is_black() {
                break;
            }
            throughput *= bsdf_sample.value * (bsdf_sample.wi.z.abs() / bsdf_sample.pdf);

            let wi_world = frame.to_world(&bsdf_sample.wi);
            let origin = offset_origin(&hit.p(), &hit.geo_normal(), &wi_world);
            ray = Ray3f::new(origin, wi_world, Some(0.0), None);
        }

        radiance
    }

    #[test]
    fn test_mis_matches_brute_force_reference() {
        // Single quad light over a diffuse sphere: the MIS estimator and
        // the BSDF-only reference must agree on the mean.
        let mut scene = Scene::new();
        let grey = scene.add_material(Arc::new(LambertianBSDF::new(
            RGBSpectrum::from_scalar(0.8),
        )));
        let black = scene.add_material(Arc::new(LambertianBSDF::new(RGBSpectrum::default())));
        scene.add_object(Arc::new(Sphere::new(Vector3f::zeros(), 1.0)), grey);
        scene.add_quad_light(
            Quad::new(
                Vector3f::new(-2.0, 3.0, -2.0),
                Vector3f::new(4.0, 0.0, 0.0),
                Vector3f::new(0.0, 0.0, 4.0),
            ),
            black,
            RGBSpectrum::from_scalar(5.0),
        );

        let primary = || {
            Ray3f::new(
                Vector3f::new(0.0, 2.0, 3.0),
                (Vector3f::new(0.0, 0.8, 0.4) - Vector3f::new(0.0, 2.0, 3.0)).normalize(),
                None,
                None,
            )
        };

        let integrator = integrator(3);
        let mis_samples = 4096;
        let mut mis_mean = 0.0;
        for s in 0..mis_samples {
            let mut rng = LcgRng::from_pixel(0, 0, s);
            mis_mean += integrator.trace_path(&scene, primary(), &mut rng).color.luminance();
        }
        mis_mean /= mis_samples as Float;

        let brute_samples = 32768;
        let mut brute_mean = 0.0;
        for s in 0..brute_samples {
            let mut rng = LcgRng::from_pixel(1, 0, s);
            brute_mean += trace_brute_force(&scene, primary(), &mut rng, 3).luminance();
        }
        brute_mean /= brute_samples as Float;

        assert!(mis_mean > 0.0);
        let relative = (mis_mean - brute_mean).abs() / brute_mean;
        assert!(
            relative < 0.08,
            "MIS {} vs brute force {} ({}% apart)",
            mis_mean,
            brute_mean,
            relative * 100.0
        );
    }
}
