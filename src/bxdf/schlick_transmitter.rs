use crate::core::{color::Color, rng::Rng};

use super::{relative_eta, util, BxdfSample, BxdfT};

/// Smooth interface that picks reflection by Schlick's approximation.
pub struct SchlickTransmitter {
    albedo: Color,
    eta_from: f32,
    eta_to: f32,
}

impl SchlickTransmitter {
    pub fn new(albedo: Color, eta_from: f32, eta_to: f32) -> Self {
        Self {
            albedo,
            eta_from,
            eta_to,
        }
    }
}

impl BxdfT for SchlickTransmitter {
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BxdfSample> {
        let eta = relative_eta(wo, self.eta_from, self.eta_to);
        let cos_i = wo.z.abs();

        let wi = match util::cos_transmitted(eta, cos_i) {
            Some(cos_t)
                if rng.uniform_1d() >= util::schlick_fresnel(self.eta_from, self.eta_to, cos_i) =>
            {
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
    fn mostly_transmits_at_normal_incidence() {
        let pane = SchlickTransmitter::new(Color::WHITE, 1.0, 1.5);
        let mut rng = Rng::with_seed(6);
        let mut reflected = 0;
        for _ in 0..5000 {
            let sample = pane.sample(glam::Vec3A::Z, &mut rng).unwrap();
            if sample.wi.z > 0.0 {
                reflected += 1;
            } else {
                assert!((sample.wi - -glam::Vec3A::Z).length() < 1e-6);
            }
        }
        // r0 is 0.04
        assert!(reflected > 120 && reflected < 290);
    }
}
