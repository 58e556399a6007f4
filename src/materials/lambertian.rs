// Copyright @yucwang 2026

use crate::core::bsdf::{BSDF, BSDFSample};
use crate::math::constants::{Float, INV_PI, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use crate::math::warp::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf};

pub struct LambertianBSDF {
    reflectance: RGBSpectrum,
}

impl LambertianBSDF {
    pub fn new(reflectance: RGBSpectrum) -> Self {
        Self { reflectance }
    }
}

impl BSDF for LambertianBSDF {
    fn eval(&self, wo: &Vector3f, wi: &Vector3f) -> RGBSpectrum {
        // Reflection only: both directions on the same side of the surface.
        if wo.z * wi.z <= 0.0 {
            return RGBSpectrum::default();
        }
        self.reflectance * INV_PI
    }

    fn sample(&self, u: &Vector2f, wo: &Vector3f) -> BSDFSample {
        let mut wi = sample_cosine_hemisphere(u);
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }

        BSDFSample {
            pdf: sample_cosine_hemisphere_pdf(wi.z.abs()),
            value: self.eval(wo, &wi),
            wi,
        }
    }

    fn pdf(&self, wo: &Vector3f, wi: &Vector3f) -> Float {
        if wo.z * wi.z <= 0.0 {
            return 0.0;
        }
        sample_cosine_hemisphere_pdf(wi.z.abs())
    }

    fn albedo(&self) -> RGBSpectrum {
        self.reflectance
    }
}
