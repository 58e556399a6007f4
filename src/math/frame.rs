// Copyright @yucwang 2026

use super::constants::Vector3f;

/// Orthonormal shading frame with the normal on the local z axis.
pub struct Frame {
    tangent: Vector3f,
    bitangent: Vector3f,
    normal: Vector3f,
}

impl Frame {
    pub fn from_normal(n: &Vector3f) -> Self {
        let up = if n.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let tangent = n.cross(&up).normalize();
        let bitangent = n.cross(&tangent).normalize();
        Self { tangent, bitangent, normal: *n }
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.tangent), v.dot(&self.bitangent), v.dot(&self.normal))
    }

    pub fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}
