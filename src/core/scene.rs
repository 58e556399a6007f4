// Copyright @yucwang 2026

use crate::core::bsdf::BSDF;
use crate::core::intersect::{Intersector, SurfaceHit};
use crate::core::shape::Shape;
use crate::emitters::{Emitter, EmitterSample, EnvMap, QuadEmitter};
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;
use crate::math::spectrum::RGBSpectrum;
use crate::shapes::quad::Quad;
use std::sync::Arc;

pub struct SceneObject {
    pub shape: Arc<dyn Shape>,
    pub material_id: usize,
    pub emitter_index: Option<usize>,
}

/// Scene container and reference ray-intersection oracle. Primitives are
/// tested by linear scan; production backends substitute their own
/// [`Intersector`] behind the same trait.
pub struct Scene {
    objects: Vec<SceneObject>,
    materials: Vec<Arc<dyn BSDF>>,
    emitters: Vec<Emitter>,
    environment: Option<Emitter>,
    background: RGBSpectrum,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            materials: Vec::new(),
            emitters: Vec::new(),
            environment: None,
            background: RGBSpectrum::default(),
        }
    }

    pub fn add_material(&mut self, material: Arc<dyn BSDF>) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn material(&self, material_id: usize) -> &dyn BSDF {
        self.materials[material_id].as_ref()
    }

    pub fn add_object(&mut self, shape: Arc<dyn Shape>, material_id: usize) {
        self.objects.push(SceneObject {
            shape,
            material_id,
            emitter_index: None,
        });
    }

    /// Register a quad both as geometry and as an area emitter, linking the
    /// hit record back to the emitter for MIS.
    pub fn add_quad_light(&mut self,
                          quad: Quad,
                          material_id: usize,
                          radiance: RGBSpectrum) {
        let emitter_index = self.emitters.len();
        self.emitters.push(Emitter::Quad(QuadEmitter::new(quad, radiance)));
        self.objects.push(SceneObject {
            shape: Arc::new(quad),
            material_id,
            emitter_index: Some(emitter_index),
        });
    }

    pub fn set_environment(&mut self, env: EnvMap) {
        self.environment = Some(Emitter::Env(env));
    }

    /// Load an environment map, degrading to "no environment" on failure.
    /// The failure is logged once here; rendering continues with the flat
    /// background color.
    pub fn load_environment(&mut self, path: &str, scale: Float) {
        match EnvMap::from_file(path, scale) {
            Ok(env) => {
                let (w, h) = env.dimensions();
                log::info!("environment map loaded: {} ({}x{})", path, w, h);
                self.set_environment(env);
            }
            Err(e) => {
                log::warn!("environment map disabled: {}", e);
                self.environment = None;
            }
        }
    }

    pub fn environment(&self) -> Option<&EnvMap> {
        match &self.environment {
            Some(Emitter::Env(env)) => Some(env),
            _ => None,
        }
    }

    pub fn environment_emitter(&self) -> Option<&Emitter> {
        self.environment.as_ref()
    }

    pub fn emitter(&self, index: usize) -> &Emitter {
        &self.emitters[index]
    }

    pub fn emitter_count(&self) -> usize {
        self.emitters.len()
    }

    /// Emitted radiance toward `wo` for a surface bound to emitter `index`.
    pub fn emitter_radiance(&self, index: usize, geo_normal: &Vector3f, wo: &Vector3f) -> RGBSpectrum {
        match &self.emitters[index] {
            Emitter::Quad(quad) => {
                if geo_normal.dot(wo) > 0.0 {
                    quad.radiance()
                } else {
                    RGBSpectrum::default()
                }
            }
            Emitter::Env(_) => RGBSpectrum::default(),
        }
    }

    pub fn background(&self) -> RGBSpectrum {
        self.background
    }

    pub fn set_background(&mut self, background: RGBSpectrum) {
        self.background = background;
    }

    /// Uniformly select one area emitter and sample it toward `p_ref`; the
    /// selection probability 1/N is folded into the returned pdf.
    pub fn sample_area_emitter(&self,
                               u_select: Float,
                               u: &Vector2f,
                               p_ref: &Vector3f) -> Option<(usize, EmitterSample)> {
        if self.emitters.is_empty() {
            return None;
        }

        let count = self.emitters.len();
        let index = ((u_select * count as Float) as usize).min(count - 1);
        let select_pdf = 1.0 / count as Float;

        let mut sample = self.emitters[index].sample_toward(p_ref, u)?;
        sample.pdf *= select_pdf;
        Some((index, sample))
    }

    /// Pdf that uniform-selection light sampling would assign to reaching
    /// emitter `index` from `p_ref` along `wi`.
    pub fn area_emitter_pdf(&self, index: usize, p_ref: &Vector3f, wi: &Vector3f) -> Float {
        if self.emitters.is_empty() {
            return 0.0;
        }
        let select_pdf = 1.0 / self.emitters.len() as Float;
        self.emitters[index].pdf_toward(p_ref, wi) * select_pdf
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Intersector for Scene {
    fn trace(&self, ray: &Ray3f) -> Option<SurfaceHit> {
        let mut closest: Option<(Float, usize, SurfaceHit)> = None;
        for (idx, object) in self.objects.iter().enumerate() {
            if let Some(hit) = object.shape.ray_intersection(ray) {
                let keep = match &closest {
                    Some((best_t, _, _)) => hit.t() < *best_t,
                    None => true,
                };
                if keep {
                    closest = Some((hit.t(), idx, hit));
                }
            }
        }

        closest.map(|(_, idx, hit)| {
            let object = &self.objects[idx];
            hit.with_binding(object.material_id, object.emitter_index)
        })
    }

    fn trace_occlusion(&self, ray: &Ray3f, max_t: Float) -> bool {
        let clipped = Ray3f::new(ray.origin(), ray.dir(), Some(ray.min_t), Some(max_t));
        for object in &self.objects {
            if object.shape.ray_intersection_t(&clipped) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::quad::Quad;
    use crate::shapes::sphere::Sphere;
    use crate::materials::lambertian::LambertianBSDF;

    fn test_scene() -> Scene {
        let mut scene = Scene::new();
        let grey = scene.add_material(Arc::new(LambertianBSDF::new(
            RGBSpectrum::from_scalar(0.5),
        )));
        scene.add_object(Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, -5.0), 1.0)), grey);
        scene.add_object(Arc::new(Sphere::new(Vector3f::new(0.0, 0.0, -9.0), 1.0)), grey);
        scene
    }

    #[test]
    fn test_trace_returns_closest_hit() {
        let scene = test_scene();
        let ray = Ray3f::new(
            Vector3f::zeros(),
            Vector3f::new(0.0, 0.0, -1.0),
            None,
            None,
        );
        let hit = scene.trace(&ray).expect("expected intersection");
        assert!((hit.t() - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_occlusion_respects_max_distance() {
        let scene = test_scene();
        let ray = Ray3f::new(
            Vector3f::zeros(),
            Vector3f::new(0.0, 0.0, -1.0),
            Some(0.0),
            None,
        );
        assert!(scene.trace_occlusion(&ray, 100.0));
        // First sphere starts at t = 4; a shorter segment sees nothing.
        assert!(!scene.trace_occlusion(&ray, 3.0));
    }

    #[test]
    fn test_quad_light_binding() {
        let mut scene = Scene::new();
        let white = scene.add_material(Arc::new(LambertianBSDF::new(
            RGBSpectrum::from_scalar(0.0),
        )));
        scene.add_quad_light(
            Quad::new(
                Vector3f::new(-1.0, 3.0, -1.0),
                Vector3f::new(2.0, 0.0, 0.0),
                Vector3f::new(0.0, 0.0, 2.0),
            ),
            white,
            RGBSpectrum::from_scalar(10.0),
        );

        let ray = Ray3f::new(
            Vector3f::zeros(),
            Vector3f::new(0.0, 1.0, 0.0),
            None,
            None,
        );
        let hit = scene.trace(&ray).expect("light must be visible geometry");
        assert_eq!(hit.emitter_index(), Some(0));
        assert_eq!(scene.emitter_count(), 1);
    }

    #[test]
    fn test_uniform_selection_folds_into_pdf() {
        let mut scene = Scene::new();
        let black = scene.add_material(Arc::new(LambertianBSDF::new(
            RGBSpectrum::from_scalar(0.0),
        )));
        let quad = Quad::new(
            Vector3f::new(-1.0, 3.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
        );
        scene.add_quad_light(quad, black, RGBSpectrum::from_scalar(1.0));
        scene.add_quad_light(
            Quad::new(
                Vector3f::new(-1.0, 4.0, -1.0),
                Vector3f::new(2.0, 0.0, 0.0),
                Vector3f::new(0.0, 0.0, 2.0),
            ),
            black,
            RGBSpectrum::from_scalar(1.0),
        );

        let p_ref = Vector3f::zeros();
        let (index, sample) = scene
            .sample_area_emitter(0.1, &Vector2f::new(0.5, 0.5), &p_ref)
            .expect("selection must succeed");
        let direct = match scene.emitter(index) {
            Emitter::Quad(q) => q.sample_toward(&p_ref, &Vector2f::new(0.5, 0.5)).unwrap(),
            _ => unreachable!(),
        };
        assert!((sample.pdf - direct.pdf * 0.5).abs() < 1e-5);
    }
}
