use crate::core::{color::Color, rng::Rng};

use super::{relative_eta, to_upper, util, BxdfSample, BxdfT};

/// Rough glass with an isotropic GGX distribution of microfacets.
pub struct MicrofacetDielectric {
    albedo: Color,
    eta_from: f32,
    eta_to: f32,
    roughness: f32,
}

impl MicrofacetDielectric {
    pub fn new(albedo: Color, eta_from: f32, eta_to: f32, roughness: f32) -> Self {
        Self {
            albedo,
            eta_from,
            eta_to,
            roughness,
        }
    }
}

/// half vector, `wo·h`, `wi·h` and transmittance of a refraction between upper-frame
/// directions, `None` when the pair cannot be joined by a refracting microfacet
fn refraction_terms(
    eta: f32,
    wo: glam::Vec3A,
    wi: glam::Vec3A,
) -> Option<(glam::Vec3A, f32, f32, f32)> {
    let mut half = (eta * wo + wi).normalize();
    if half.z < 0.0 {
        half = -half;
    }
    let wo_dot_h = wo.dot(half);
    let wi_dot_h = wi.dot(half);
    if wo_dot_h <= 0.0 || wi_dot_h >= 0.0 {
        return None;
    }
    let transmittance = 1.0 - util::fresnel_dielectric(eta, wo_dot_h);
    if transmittance <= 0.0 {
        return None;
    }
    Some((half, wo_dot_h, wi_dot_h, transmittance))
}

impl BxdfT for MicrofacetDielectric {
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BxdfSample> {
        let eta = relative_eta(wo, self.eta_from, self.eta_to);
        let wo_up = to_upper(wo, wo);
        if wo_up.z == 0.0 {
            return None;
        }

        let half =
            util::ggx_smith_vndf_sample(wo_up, self.roughness, self.roughness, rng.uniform_2d());
        let cos_i = wo_up.dot(half);
        if cos_i <= 0.0 {
            return None;
        }

        let reflectance = util::fresnel_dielectric(eta, cos_i);
        let wi_up = match util::cos_transmitted(eta, cos_i) {
            Some(cos_t) if rng.uniform_1d() >= reflectance => {
                let wi_up = -eta * wo_up + (eta * cos_i - cos_t) * half;
                if wi_up.z >= 0.0 {
                    return None;
                }
                wi_up
            }
            _ => {
                let wi_up = util::reflect_n(wo_up, half);
                if wi_up.z <= 0.0 {
                    return None;
                }
                wi_up
            }
        };
        let wi_up = wi_up.normalize();
        // grazing refractions may round onto the total reflection side of the half vector
        if wi_up.z < 0.0 && refraction_terms(eta, wo_up, wi_up).is_none() {
            return None;
        }

        // fresnel and the distribution cancel between bxdf and pdf
        let g1 = util::smith_g1_aniso(wo_up, self.roughness, self.roughness);
        let g2 = util::smith_g2_aniso(wo_up, wi_up, self.roughness, self.roughness);
        Some(BxdfSample {
            wi: to_upper(wo, wi_up),
            weight: self.albedo * (g2 / (g1 * wi_up.z.abs())),
        })
    }

    fn bxdf(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> Color {
        let eta = relative_eta(wo, self.eta_from, self.eta_to);
        let (wo, wi) = (to_upper(wo, wo), to_upper(wo, wi));
        if wo.z == 0.0 || wi.z == 0.0 {
            return Color::BLACK;
        }

        let alpha = self.roughness;
        let g2 = util::smith_g2_aniso(wo, wi, alpha, alpha);
        if wi.z > 0.0 {
            let half = (wo + wi).normalize();
            let cos_i = wo.dot(half);
            let reflectance = util::fresnel_dielectric(eta, cos_i);
            let ndf = util::ggx_ndf_aniso(half, alpha, alpha);
            self.albedo * (reflectance * ndf * g2 / (4.0 * wo.z * wi.z))
        } else {
            let (half, wo_dot_h, wi_dot_h, transmittance) =
                match refraction_terms(eta, wo, wi) {
                    Some(terms) => terms,
                    None => return Color::BLACK,
                };
            let ndf = util::ggx_ndf_aniso(half, alpha, alpha);
            let denom = util::pow2(eta * wo_dot_h + wi_dot_h);
            self.albedo
                * (transmittance * ndf * g2 * wo_dot_h * wi_dot_h.abs()
                    / (wo.z * wi.z.abs() * denom))
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
    fn samples_land_on_consistent_sides() {
        let glass = MicrofacetDielectric::new(Color::WHITE, 1.0, 1.5, 0.3);
        let mut rng = Rng::with_seed(21);
        for wo in [
            glam::Vec3A::new(0.5, 0.0, 0.866),
            glam::Vec3A::new(-0.2, 0.4, -0.894),
        ] {
            let mut valid = 0;
            for _ in 0..2000 {
                if let Some(sample) = glass.sample(wo, &mut rng) {
                    valid += 1;
                    assert!((sample.wi.length() - 1.0).abs() < 1e-4);
                    assert!(sample.weight.is_finite());
                    assert!(sample.weight.r >= 0.0);
                    // a valid sample has non-zero density
                    assert!(!glass.bxdf(wo, sample.wi).is_black());
                }
            }
            assert!(valid > 1800);
        }
    }

    #[test]
    fn near_critical_refractions_have_density() {
        // inside the glass, close to the critical angle of 1.5 -> 1
        let glass = MicrofacetDielectric::new(Color::WHITE, 1.0, 1.5, 0.3);
        let wo = glam::Vec3A::new(-0.2, 0.4, -0.894).normalize();
        let mut rng = Rng::with_seed(21);
        let mut transmitted = 0;
        for _ in 0..20_000 {
            if let Some(sample) = glass.sample(wo, &mut rng) {
                assert!(!glass.bxdf(wo, sample.wi).is_black(), "{:?}", sample.wi);
                if sample.wi.z > 0.0 {
                    transmitted += 1;
                }
            }
        }
        assert!(transmitted > 0);
    }

    #[test]
    fn importance_sampling_agrees_with_evaluation() {
        let bxdf: Bxdf = MicrofacetDielectric::new(Color::WHITE, 1.0, 1.5, 0.5).into();
        let wo = glam::Vec3A::new(0.5, 0.0, 0.866);
        let sampled = test_util::albedo_estimate(&bxdf, wo, 200_000, 5);
        let uniform = test_util::uniform_estimate(&bxdf, wo, 400_000, 6);
        assert!(sampled.r > 0.8 && sampled.r <= 1.01);
        assert!((sampled.r - uniform.r).abs() < 0.05, "{} vs {}", sampled.r, uniform.r);
    }

    #[test]
    fn converges_to_smooth_reflectance() {
        // nearly smooth at normal incidence reflects about 4%
        let glass = MicrofacetDielectric::new(Color::WHITE, 1.0, 1.5, 0.01);
        let mut rng = Rng::with_seed(9);
        let wo = glam::Vec3A::Z;
        let count = 20_000;
        let mut reflected = 0;
        for _ in 0..count {
            if let Some(sample) = glass.sample(wo, &mut rng) {
                if sample.wi.z > 0.0 {
                    reflected += 1;
                }
            }
        }
        let ratio = reflected as f32 / count as f32;
        assert!((ratio - 0.04).abs() < 0.01);
    }
}
