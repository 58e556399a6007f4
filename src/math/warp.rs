// Copyright @yucwang 2026

use super::constants::{Float, INV_PI, PI, Vector2f, Vector3f};

pub fn sample_uniform_sphere(u: &Vector2f) -> Vector3f {
    let z: Float = 1.0 - 2.0 * u.x;
    let r: Float = (1.0 - z * z).max(0.0).sqrt();
    let phi: Float = 2.0 * PI * u.y;

    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

pub fn sample_uniform_sphere_pdf() -> Float {
    INV_PI / 4.0
}

pub fn sample_uniform_disk_concentric(u: &Vector2f) -> Vector2f {
    let r1: Float = 2.0 * u.x - 1.0;
    let r2: Float = 2.0 * u.y - 1.0;

    let phi: Float;
    let r: Float;

    if r1 == 0.0 && r2 == 0.0 {
        r = 0.0;
        phi = 0.0;
    } else if r1 * r1 > r2 * r2 {
        r = r1;
        phi = (PI / 4.0) * (r2 / r1);
    } else {
        r = r2;
        phi = (PI / 2.0) - (r1 / r2) * (PI / 4.0);
    }

    let (sin_phi, cos_phi) = phi.sin_cos();

    Vector2f::new(r * cos_phi, r * sin_phi)
}

pub fn sample_cosine_hemisphere(u: &Vector2f) -> Vector3f {
    let p = sample_uniform_disk_concentric(u);
    let z = (1.0 - p.x * p.x - p.y * p.y).max(0.0).sqrt();

    Vector3f::new(p.x, p.y, z)
}

pub fn sample_cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_hemisphere_upper() {
        let samples = [
            Vector2f::new(0.1, 0.3),
            Vector2f::new(0.5, 0.5),
            Vector2f::new(0.99, 0.01),
        ];
        for u in &samples {
            let d = sample_cosine_hemisphere(u);
            assert!(d.z >= 0.0);
            assert!((d.norm() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_uniform_sphere_unit_length() {
        let d = sample_uniform_sphere(&Vector2f::new(0.25, 0.75));
        assert!((d.norm() - 1.0).abs() < 1e-5);
    }
}
