// Copyright @yucwang 2026

use crate::math::constants::Vector2f;
use crate::math::ray::Ray3f;

pub trait Sensor: Send + Sync {
    fn sample_ray(&self, u: &Vector2f) -> Ray3f;

    /// Monotone counter bumped whenever the pose changes; the renderer uses
    /// it to invalidate accumulated history.
    fn pose_revision(&self) -> u64 {
        0
    }

    fn describe(&self) -> String {
        String::from("Sensor")
    }
}
