use crate::core::{color::Color, rng::Rng};

use super::{util, BxdfSample, BxdfT};

/// Perfect mirror, the reflected direction is optionally perturbed by `glossiness`.
pub struct Mirror {
    albedo: Color,
    glossiness: f32,
}

impl Mirror {
    pub fn new(albedo: Color, glossiness: f32) -> Self {
        Self { albedo, glossiness }
    }
}

impl BxdfT for Mirror {
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BxdfSample> {
        let mut wi = util::reflect(wo);
        if self.glossiness > 0.0 {
            // the jitter lobe is fixed to the normal side
            let jitter = rng.uniform_on_hemisphere();
            wi = (wi + jitter * self.glossiness).normalize();
            if !(wi.z * wo.z > 0.0) {
                return None;
            }
        }
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
