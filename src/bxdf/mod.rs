pub mod util;

mod lambert;
mod mirror;
mod schlick_transmitter;

mod microfacet_conductor;
mod microfacet_dielectric;

mod specular_conductor;
mod specular_dielectric;

pub use lambert::*;
pub use mirror::*;
pub use schlick_transmitter::*;

pub use microfacet_conductor::*;
pub use microfacet_dielectric::*;

pub use specular_conductor::*;
pub use specular_dielectric::*;

use crate::core::{color::Color, rng::Rng, Complex};

/// Sampled direction, `weight` is the bxdf value already divided by the sampling pdf.
#[derive(Debug, Clone, Copy)]
pub struct BxdfSample {
    pub wi: glam::Vec3A,
    pub weight: Color,
}

/// Scattering in the local shading frame.
///
/// `wo` points away from the surface toward the side the incoming ray came from and
/// `wi` is the scattered direction, so a reflection keeps `wo.z * wi.z > 0`.
#[enum_dispatch::enum_dispatch(Bxdf)]
pub trait BxdfT {
    /// `None` when the sampled direction is not physically valid
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BxdfSample>;

    /// raw bxdf value, zero for delta lobes
    fn bxdf(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> Color;

    fn is_delta(&self) -> bool;
}

#[enum_dispatch::enum_dispatch]
pub enum Bxdf {
    Lambert,
    Mirror,
    SchlickTransmitter,
    MicrofacetConductor,
    MicrofacetDielectric,
    SpecularConductor,
    SpecularDielectric,
}

/// relative index eta_i / eta_t seen from the side of `wo`
pub(crate) fn relative_eta(wo: glam::Vec3A, eta_from: f32, eta_to: f32) -> f32 {
    if wo.z >= 0.0 {
        eta_from / eta_to
    } else {
        eta_to / eta_from
    }
}

pub(crate) fn relative_eta_complex(wo: glam::Vec3A, eta_from: Complex, eta_to: Complex) -> Complex {
    if wo.z >= 0.0 {
        eta_from / eta_to
    } else {
        eta_to / eta_from
    }
}

/// flips `w` so that `wo` ends up in the upper hemisphere
pub(crate) fn to_upper(wo: glam::Vec3A, w: glam::Vec3A) -> glam::Vec3A {
    if wo.z >= 0.0 {
        w
    } else {
        glam::Vec3A::new(w.x, w.y, -w.z)
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// estimates the reflected/transmitted energy E[weight * |cos|] for `wo`
    pub fn albedo_estimate(bxdf: &Bxdf, wo: glam::Vec3A, count: usize, seed: u64) -> Color {
        let mut rng = Rng::with_seed(seed);
        let mut sum = Color::BLACK;
        for _ in 0..count {
            if let Some(sample) = bxdf.sample(wo, &mut rng) {
                sum += sample.weight * sample.wi.z.abs();
            }
        }
        sum / count as f32
    }

    /// checks that `sample` weights agree with `bxdf` over the pdf implied by the
    /// same sampler: E[bxdf * |cos|] over uniform sphere directions equals the
    /// albedo estimated by importance sampling
    pub fn uniform_estimate(bxdf: &Bxdf, wo: glam::Vec3A, count: usize, seed: u64) -> Color {
        let mut rng = Rng::with_seed(seed);
        let mut sum = Color::BLACK;
        for _ in 0..count {
            let wi = rng.uniform_on_sphere();
            sum += bxdf.bxdf(wo, wi) * wi.z.abs();
        }
        sum * (4.0 * std::f32::consts::PI) / count as f32
    }
}
