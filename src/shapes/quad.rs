// Copyright @yucwang 2026

use crate::core::intersect::SurfaceHit;
use crate::core::shape::Shape;
use crate::math::constants::{EPSILON, Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

/// Planar parallelogram spanned by two edges out of a corner.
#[derive(Clone, Copy, Debug)]
pub struct Quad {
    corner: Vector3f,
    edge1: Vector3f,
    edge2: Vector3f,
    normal: Vector3f,
    area: Float,
}

impl Quad {
    pub fn new(corner: Vector3f, edge1: Vector3f, edge2: Vector3f) -> Self {
        let cross = edge1.cross(&edge2);
        let area = cross.norm();
        let normal = if area > 0.0 {
            cross / area
        } else {
            Vector3f::new(0.0, 0.0, 1.0)
        };
        Self { corner, edge1, edge2, normal, area }
    }

    pub fn corner(&self) -> Vector3f {
        self.corner
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn area(&self) -> Float {
        self.area
    }

    /// Uniform point on the quad for a unit-square sample.
    pub fn point_at(&self, u: &Vector2f) -> Vector3f {
        self.corner + self.edge1 * u.x + self.edge2 * u.y
    }

    /// Plane hit clipped against the two edge extents. Returns the ray
    /// parameter and the parametric `(u, v)` of the hit.
    pub fn intersect(&self, origin: &Vector3f, dir: &Vector3f) -> Option<(Float, Vector2f)> {
        let denom = self.normal.dot(dir);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = self.normal.dot(&(self.corner - origin)) / denom;
        if t <= 0.0 {
            return None;
        }

        let local = origin + dir * t - self.corner;
        let u = local.dot(&self.edge1) / self.edge1.norm_squared();
        let v = local.dot(&self.edge2) / self.edge2.norm_squared();
        if !(0.0..=1.0).contains(&u) || !(0.0..=1.0).contains(&v) {
            return None;
        }

        Some((t, Vector2f::new(u, v)))
    }
}

impl Shape for Quad {
    fn ray_intersection(&self, ray: &Ray3f) -> Option<SurfaceHit> {
        let (t, uv) = self.intersect(&ray.origin(), &ray.dir())?;
        if !ray.test_segment(t) {
            return None;
        }

        Some(SurfaceHit::new(
            ray.at(t),
            self.normal,
            self.normal,
            -ray.dir(),
            uv,
            t,
        ))
    }

    fn ray_intersection_t(&self, ray: &Ray3f) -> bool {
        match self.intersect(&ray.origin(), &ray.dir()) {
            Some((t, _)) => ray.test_segment(t),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_quad() -> Quad {
        Quad::new(
            Vector3f::new(-1.0, 0.0, -1.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, 2.0),
        )
    }

    #[test]
    fn test_quad_area_and_normal() {
        let quad = unit_quad();
        assert!((quad.area() - 4.0).abs() < 1e-5);
        assert!((quad.normal().y.abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_quad_intersection_inside_and_outside() {
        let quad = unit_quad();

        let down = Vector3f::new(0.0, -1.0, 0.0);
        let hit = quad.intersect(&Vector3f::new(0.5, 2.0, 0.5), &down);
        let (t, uv) = hit.expect("ray through the interior must hit");
        assert!((t - 2.0).abs() < 1e-5);
        assert!((uv.x - 0.75).abs() < 1e-5);
        assert!((uv.y - 0.75).abs() < 1e-5);

        assert!(quad.intersect(&Vector3f::new(3.0, 2.0, 0.0), &down).is_none());
    }

    #[test]
    fn test_quad_point_at_spans_surface() {
        let quad = unit_quad();
        let corner = quad.point_at(&Vector2f::new(0.0, 0.0));
        let opposite = quad.point_at(&Vector2f::new(1.0, 1.0));
        assert!((corner - Vector3f::new(-1.0, 0.0, -1.0)).norm() < 1e-5);
        assert!((opposite - Vector3f::new(1.0, 0.0, 1.0)).norm() < 1e-5);
    }
}
