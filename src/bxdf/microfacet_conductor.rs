use crate::core::{color::Color, rng::Rng, Complex};

use super::{relative_eta_complex, to_upper, util, BxdfSample, BxdfT};

/// Rough metal with an anisotropic GGX distribution of microfacets.
pub struct MicrofacetConductor {
    albedo: Color,
    eta_from: Complex,
    eta_to: Complex,
    roughness_x: f32,
    roughness_y: f32,
}

impl MicrofacetConductor {
    pub fn new(
        albedo: Color,
        eta_from: Complex,
        eta_to: Complex,
        roughness_x: f32,
        roughness_y: f32,
    ) -> Self {
        Self {
            albedo,
            eta_from,
            eta_to,
            roughness_x,
            roughness_y,
        }
    }
}

impl BxdfT for MicrofacetConductor {
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BxdfSample> {
        let wo_up = to_upper(wo, wo);
        if wo_up.z == 0.0 {
            return None;
        }

        let half = util::ggx_smith_vndf_sample(
            wo_up,
            self.roughness_x,
            self.roughness_y,
            rng.uniform_2d(),
        );
        let cos_i = wo_up.dot(half);
        if cos_i <= 0.0 {
            return None;
        }
        let wi_up = util::reflect_n(wo_up, half);
        if wi_up.z <= 0.0 {
            return None;
        }

        let eta = relative_eta_complex(wo, self.eta_from, self.eta_to);
        let reflectance = util::fresnel_complex(eta, cos_i);
        let g1 = util::smith_g1_aniso(wo_up, self.roughness_x, self.roughness_y);
        let g2 = util::smith_g2_aniso(wo_up, wi_up, self.roughness_x, self.roughness_y);
        Some(BxdfSample {
            wi: to_upper(wo, wi_up),
            weight: self.albedo * (reflectance * g2 / (g1 * wi_up.z)),
        })
    }

    fn bxdf(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> Color {
        if !(wo.z * wi.z > 0.0) {
            return Color::BLACK;
        }
        let eta = relative_eta_complex(wo, self.eta_from, self.eta_to);
        let (wo, wi) = (to_upper(wo, wo), to_upper(wo, wi));

        let half = (wo + wi).normalize();
        let reflectance = util::fresnel_complex(eta, wo.dot(half));
        let ndf = util::ggx_ndf_aniso(half, self.roughness_x, self.roughness_y);
        let g2 = util::smith_g2_aniso(wo, wi, self.roughness_x, self.roughness_y);
        self.albedo * (reflectance * ndf * g2 / (4.0 * wo.z * wi.z))
    }

    fn is_delta(&self) -> bool {
        false
    }
}
