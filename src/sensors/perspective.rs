// Copyright @yucwang 2026

use crate::core::sensor::Sensor;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray3f;

pub struct PerspectiveCamera {
    origin: Vector3f,
    forward: Vector3f,
    right: Vector3f,
    up: Vector3f,
    tan_half_fov_y: Float,
    aspect: Float,
    pose_revision: u64,
}

impl PerspectiveCamera {
    pub fn new(origin: Vector3f,
               target: Vector3f,
               up: Vector3f,
               fov_y_radians: Float,
               aspect: Float) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        let up = right.cross(&forward).normalize();

        Self {
            origin,
            forward,
            right,
            up,
            tan_half_fov_y: (0.5 * fov_y_radians).tan(),
            aspect,
            pose_revision: 0,
        }
    }

    /// Re-aim the camera. Accumulated history keyed on the previous pose is
    /// invalidated through the revision counter.
    pub fn look_at(&mut self, origin: Vector3f, target: Vector3f, up: Vector3f) {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        self.origin = origin;
        self.forward = forward;
        self.right = right;
        self.up = right.cross(&forward).normalize();
        self.pose_revision += 1;
    }
}

impl Sensor for PerspectiveCamera {
    fn sample_ray(&self, u: &Vector2f) -> Ray3f {
        let px = (2.0 * u.x - 1.0) * self.aspect * self.tan_half_fov_y;
        let py = (1.0 - 2.0 * u.y) * self.tan_half_fov_y;

        let dir = (self.right * px + self.up * py + self.forward).normalize();
        Ray3f::new(self.origin, dir, Some(0.0), None)
    }

    fn pose_revision(&self) -> u64 {
        self.pose_revision
    }

    fn describe(&self) -> String {
        String::from("PerspectiveCamera")
    }
}
