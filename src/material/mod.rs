use crate::{
    bxdf::{
        Bxdf, BxdfT, Lambert, MicrofacetConductor, MicrofacetDielectric, Mirror,
        SchlickTransmitter, SpecularConductor, SpecularDielectric,
    },
    core::{color::Color, coord::Coordinate, loader::InputParams, rng::Rng, Complex},
};

/// Sampled bounce in world space, `color` is the bxdf value divided by the sampling pdf.
#[derive(Debug, Clone, Copy)]
pub struct ScatterSample {
    pub color: Color,
    pub direction: glam::Vec3A,
}

/// World space front end of a scattering lobe.
///
/// `dir_in` is the travelling direction of the incoming ray and `normal` is the
/// geometric normal of the surface, which may face either side.
pub struct Material {
    bxdf: Bxdf,
}

impl Material {
    /// smallest microfacet roughness, lower values break the GGX terms in f32
    const MIN_ROUGHNESS: f32 = 0.001;

    pub fn new(bxdf: Bxdf) -> Self {
        Self { bxdf }
    }

    pub fn hit(
        &self,
        dir_in: glam::Vec3A,
        normal: glam::Vec3A,
        rng: &mut Rng,
    ) -> Option<ScatterSample> {
        let coord = Coordinate::from_normal(normal);
        let wo = coord.to_local(-dir_in);
        let sample = self.bxdf.sample(wo, rng)?;
        Some(ScatterSample {
            color: sample.weight,
            direction: coord.to_world(sample.wi),
        })
    }

    /// raw bxdf value for scattering `dir_in` into `dir_out`
    pub fn sample(&self, dir_in: glam::Vec3A, dir_out: glam::Vec3A, normal: glam::Vec3A) -> Color {
        let coord = Coordinate::from_normal(normal);
        self.bxdf
            .bxdf(coord.to_local(-dir_in), coord.to_local(dir_out))
    }

    pub fn is_delta(&self) -> bool {
        self.bxdf.is_delta()
    }
}

pub fn create_material_from_params(params: &mut InputParams) -> anyhow::Result<Material> {
    let ty = params.get_str("type")?;
    let prefix = params.name().to_owned();
    params.set_name(format!("{}-{}", prefix, ty).into());

    let bxdf: Bxdf = match ty.as_str() {
        "diffuse" => {
            let albedo = params.get_color("albedo")?;
            let cosine_weighted = params.get_bool_or("cosine_weighted", true)?;
            Lambert::new(albedo, cosine_weighted).into()
        }
        "reflector" => {
            let albedo = params.get_color_or("albedo", Color::WHITE)?;
            let glossiness = params.get_float_or("glossiness", 0.0)?;
            if glossiness < 0.0 {
                anyhow::bail!(format!("{} - 'glossiness' should not be negative", params.name()));
            }
            Mirror::new(albedo, glossiness).into()
        }
        "dielectric" => {
            let albedo = params.get_color_or("albedo", Color::WHITE)?;
            let (eta_from, eta_to) = load_real_etas(params)?;
            let roughness = params.get_float_or("roughness", 0.0)?;
            if roughness < 0.0 {
                anyhow::bail!(format!("{} - 'roughness' should not be negative", params.name()));
            }
            if roughness == 0.0 {
                SpecularDielectric::new(albedo, eta_from, eta_to).into()
            } else {
                let roughness = roughness.max(Material::MIN_ROUGHNESS);
                MicrofacetDielectric::new(albedo, eta_from, eta_to, roughness).into()
            }
        }
        "conductor" => {
            let albedo = params.get_color_or("albedo", Color::WHITE)?;
            let eta_from = if params.contains_key("eta_from") {
                params.get_complex("eta_from")?
            } else {
                Complex::new(1.0, 0.0)
            };
            let eta_to = params.get_complex("eta_to")?;
            if eta_from.norm_sqr() == 0.0 || eta_to.norm_sqr() == 0.0 {
                anyhow::bail!(format!("{} - eta should not be zero", params.name()));
            }
            let roughness_x = params.get_float_or("roughness_x", 0.0)?;
            let roughness_y = params.get_float_or("roughness_y", 0.0)?;
            if roughness_x < 0.0 || roughness_y < 0.0 {
                anyhow::bail!(format!("{} - roughness should not be negative", params.name()));
            }
            if roughness_x == 0.0 && roughness_y == 0.0 {
                SpecularConductor::new(albedo, eta_from, eta_to).into()
            } else {
                MicrofacetConductor::new(
                    albedo,
                    eta_from,
                    eta_to,
                    roughness_x.max(Material::MIN_ROUGHNESS),
                    roughness_y.max(Material::MIN_ROUGHNESS),
                )
                .into()
            }
        }
        "transmitter" => {
            let albedo = params.get_color_or("albedo", Color::WHITE)?;
            let (eta_from, eta_to) = load_real_etas(params)?;
            SchlickTransmitter::new(albedo, eta_from, eta_to).into()
        }
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    params.check_unused_keys();

    Ok(Material::new(bxdf))
}

fn load_real_etas(params: &mut InputParams) -> anyhow::Result<(f32, f32)> {
    let eta_from = params.get_float_or("eta_from", 1.0)?;
    let eta_to = params.get_float("eta_to")?;
    if !(eta_from > 0.0 && eta_to > 0.0) {
        anyhow::bail!(format!("{} - eta should be positive", params.name()));
    }
    Ok((eta_from, eta_to))
}
