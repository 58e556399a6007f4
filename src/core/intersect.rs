// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Closest-hit record produced by an [`Intersector`]. Read-only to the
/// integrator; the material id is an opaque token resolved by the scene.
pub struct SurfaceHit {
    p: Vector3f,
    geo_normal: Vector3f,
    sh_normal: Vector3f,
    wo: Vector3f,
    uv: Vector2f,
    t: Float,
    material_id: usize,
    emitter_index: Option<usize>,
}

impl SurfaceHit {
    pub fn new(p: Vector3f,
               geo_normal: Vector3f,
               sh_normal: Vector3f,
               wo: Vector3f,
               uv: Vector2f,
               t: Float) -> Self {
        Self { p, geo_normal, sh_normal, wo, uv, t,
               material_id: 0, emitter_index: None }
    }

    pub fn with_binding(self, material_id: usize, emitter_index: Option<usize>) -> Self {
        Self { material_id, emitter_index, ..self }
    }

    pub fn p(&self) -> Vector3f {
        self.p
    }

    pub fn geo_normal(&self) -> Vector3f {
        self.geo_normal
    }

    pub fn sh_normal(&self) -> Vector3f {
        self.sh_normal
    }

    pub fn wo(&self) -> Vector3f {
        self.wo
    }

    pub fn uv(&self) -> Vector2f {
        self.uv
    }

    pub fn t(&self) -> Float {
        self.t
    }

    pub fn material_id(&self) -> usize {
        self.material_id
    }

    pub fn emitter_index(&self) -> Option<usize> {
        self.emitter_index
    }
}

/// Ray-intersection oracle supplied by the surrounding renderer. Both calls
/// are pure with respect to integrator state.
pub trait Intersector: Send + Sync {
    fn trace(&self, ray: &Ray3f) -> Option<SurfaceHit>;

    /// Predicate variant for shadow rays: may stop at the first hit inside
    /// `(min_t, max_t)` and performs no shading work.
    fn trace_occlusion(&self, ray: &Ray3f, max_t: Float) -> bool;
}
