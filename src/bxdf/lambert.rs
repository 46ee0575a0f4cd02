use crate::core::{color::Color, rng::Rng};

use super::{BxdfSample, BxdfT};

pub struct Lambert {
    albedo: Color,
    cosine_weighted: bool,
}

impl Lambert {
    pub fn new(albedo: Color, cosine_weighted: bool) -> Self {
        Self {
            albedo,
            cosine_weighted,
        }
    }
}

impl BxdfT for Lambert {
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BxdfSample> {
        let (mut wi, pdf) = if self.cosine_weighted {
            let wi = rng.cosine_weighted_on_hemisphere();
            (wi, wi.z * std::f32::consts::FRAC_1_PI)
        } else {
            (
                rng.uniform_on_hemisphere(),
                0.5 * std::f32::consts::FRAC_1_PI,
            )
        };
        if wi.z <= 0.0 {
            return None;
        }
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        Some(BxdfSample {
            wi,
            weight: self.albedo * std::f32::consts::FRAC_1_PI / pdf,
        })
    }

    fn bxdf(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> Color {
        if wo.z * wi.z > 0.0 {
            self.albedo * std::f32::consts::FRAC_1_PI
        } else {
            Color::BLACK
        }
    }

    fn is_delta(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bxdf::{test_util, Bxdf};

    #[test]
    fn stays_on_the_reflection_side() {
        let lambert = Lambert::new(Color::gray(0.5), true);
        let mut rng = Rng::with_seed(8);
        for wo in [glam::Vec3A::new(0.3, 0.0, 0.95), glam::Vec3A::new(0.3, 0.1, -0.9)] {
            for _ in 0..200 {
                let sample = lambert.sample(wo, &mut rng).unwrap();
                assert!(sample.wi.z * wo.z > 0.0);
                // albedo / |cos|
                let expected = 0.5 / sample.wi.z.abs();
                assert!((sample.weight.r - expected).abs() < 1e-3 * expected);
            }
        }
        let wo = glam::Vec3A::Z;
        assert_eq!(lambert.bxdf(wo, -wo), Color::BLACK);
        assert!((lambert.bxdf(wo, wo).g - 0.5 / std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn both_samplers_conserve_albedo() {
        let wo = glam::Vec3A::new(0.6, 0.0, 0.8);
        for cosine_weighted in [true, false] {
            let bxdf: Bxdf = Lambert::new(Color::new(0.8, 0.4, 0.3), cosine_weighted).into();
            let albedo = test_util::albedo_estimate(&bxdf, wo, 20_000, 1);
            assert!((albedo.r - 0.8).abs() < 0.03);
            assert!((albedo.g - 0.4).abs() < 0.02);
        }
    }
}
