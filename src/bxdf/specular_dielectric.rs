use crate::core::{color::Color, rng::Rng};

use super::{relative_eta, util, BxdfSample, BxdfT};

pub struct SpecularDielectric {
    albedo: Color,
    eta_from: f32,
    eta_to: f32,
}

impl SpecularDielectric {
    pub fn new(albedo: Color, eta_from: f32, eta_to: f32) -> Self {
        Self {
            albedo,
            eta_from,
            eta_to,
        }
    }
}

impl BxdfT for SpecularDielectric {
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BxdfSample> {
        let eta = relative_eta(wo, self.eta_from, self.eta_to);
        let cos_i = wo.z.abs();

        let wi = match util::cos_transmitted(eta, cos_i) {
            Some(cos_t) if rng.uniform_1d() >= util::fresnel_dielectric(eta, cos_i) => {
                glam::Vec3A::new(-eta * wo.x, -eta * wo.y, -cos_t.copysign(wo.z))
            }
            _ => util::reflect(wo),
        };
        if wi.z == 0.0 {
            return None;
        }

        Some(BxdfSample {
            wi,
            weight: self.albedo / wi.z.abs(),
        })
    }

    fn bxdf(&self, _wo: glam::Vec3A, _wi: glam::Vec3A) -> Color {
        Color::BLACK
    }

    fn is_delta(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refraction_follows_snell() {
        let glass = SpecularDielectric::new(Color::WHITE, 1.0, 1.5);
        let mut rng = Rng::with_seed(12);
        let sin_i = 0.5_f32;
        let wo = glam::Vec3A::new(sin_i, 0.0, (1.0 - sin_i * sin_i).sqrt());
        let mut transmitted = 0;
        for _ in 0..1000 {
            let sample = glass.sample(wo, &mut rng).unwrap();
            assert!((sample.wi.length() - 1.0).abs() < 1e-5);
            if sample.wi.z < 0.0 {
                transmitted += 1;
                // sin_t = sin_i / 1.5 on the opposite side
                assert!((sample.wi.x + sin_i / 1.5).abs() < 1e-5);
            } else {
                assert!((sample.wi - util::reflect(wo)).length() < 1e-6);
            }
        }
        // reflectance at 30 degrees is about 4%
        assert!(transmitted > 930 && transmitted < 990);
    }

    #[test]
    fn total_internal_reflection_from_inside() {
        let glass = SpecularDielectric::new(Color::WHITE, 1.0, 1.5);
        let mut rng = Rng::with_seed(1);
        let cos_i = 60.0_f32.to_radians().cos();
        let wo = glam::Vec3A::new((1.0 - cos_i * cos_i).sqrt(), 0.0, -cos_i);
        for _ in 0..100 {
            let sample = glass.sample(wo, &mut rng).unwrap();
            assert!(sample.wi.z < 0.0);
            assert!((sample.weight.r * sample.wi.z.abs() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn leaving_the_glass_bends_away() {
        let glass = SpecularDielectric::new(Color::WHITE, 1.0, 1.5);
        let mut rng = Rng::with_seed(2);
        let sin_i = 0.3_f32;
        let wo = glam::Vec3A::new(0.0, sin_i, -(1.0 - sin_i * sin_i).sqrt());
        for _ in 0..200 {
            let sample = glass.sample(wo, &mut rng).unwrap();
            if sample.wi.z > 0.0 {
                assert!((sample.wi.y + sin_i * 1.5).abs() < 1e-5);
            }
        }
    }
}
