// Copyright @yucwang 2026

use crate::core::intersect::SurfaceHit;
use crate::math::ray::Ray3f;

pub trait Shape: Send + Sync {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceHit>;
    fn ray_intersection_t(&self, ray: &Ray3f) -> bool;
}
