use crate::core::{color::Color, rng::Rng, Complex};

use super::{relative_eta_complex, util, BxdfSample, BxdfT};

pub struct SpecularConductor {
    albedo: Color,
    eta_from: Complex,
    eta_to: Complex,
}

impl SpecularConductor {
    pub fn new(albedo: Color, eta_from: Complex, eta_to: Complex) -> Self {
        Self {
            albedo,
            eta_from,
            eta_to,
        }
    }
}

impl BxdfT for SpecularConductor {
    fn sample(&self, wo: glam::Vec3A, _rng: &mut Rng) -> Option<BxdfSample> {
        let wi = util::reflect(wo);
        if wi.z == 0.0 {
            return None;
        }
        let eta = relative_eta_complex(wo, self.eta_from, self.eta_to);
        let reflectance = util::fresnel_complex(eta, wo.z);
        Some(BxdfSample {
            wi,
            weight: self.albedo * (reflectance / wi.z.abs()),
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
    fn mirror_weighted_by_fresnel() {
        let gold = SpecularConductor::new(
            Color::WHITE,
            Complex::new(1.0, 0.0),
            Complex::new(0.2, 3.0),
        );
        let mut rng = Rng::with_seed(0);
        let wo = glam::Vec3A::new(0.0, 0.6, 0.8);
        let sample = gold.sample(wo, &mut rng).unwrap();
        assert!((sample.wi - glam::Vec3A::new(0.0, -0.6, 0.8)).length() < 1e-6);
        let energy = sample.weight.r * sample.wi.z;
        assert!(energy > 0.85 && energy <= 1.0);
        assert_eq!(gold.bxdf(wo, sample.wi), Color::BLACK);
    }
}
