// Copyright @yucwang 2026

use crate::core::intersect::SurfaceHit;
use crate::core::shape::Shape;
use crate::math::constants::{Float, INV_PI, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
    center: Vector3f,
    radius: Float,
}

impl Sphere {
    pub fn new(center: Vector3f, radius: Float) -> Self {
        Self { center, radius }
    }

    pub fn center(&self) -> Vector3f {
        self.center
    }

    pub fn radius(&self) -> Float {
        self.radius
    }

    fn solve_t(&self, ray: &Ray3f) -> Option<Float> {
        let oc = ray.origin() - self.center;
        let b = oc.dot(&ray.dir());
        let c = oc.norm_squared() - self.radius * self.radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }

        let sqrt_disc = disc.sqrt();
        let t_near = -b - sqrt_disc;
        if ray.test_segment(t_near) {
            return Some(t_near);
        }
        let t_far = -b + sqrt_disc;
        if ray.test_segment(t_far) {
            return Some(t_far);
        }
        None
    }
}

impl Shape for Sphere {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceHit> {
        let t = self.solve_t(ray)?;
        let p = ray.at(t);
        let n = (p - self.center) / self.radius;

        let phi = n.x.atan2(-n.z);
        let uv = Vector2f::new(
            0.5 * (1.0 + phi * INV_PI),
            n.y.clamp(-1.0, 1.0).acos() * INV_PI,
        );

        Some(SurfaceHit::new(p, n, n, -ray.dir(), uv, t))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        self.solve_t(ray).is_some()
    }
}
