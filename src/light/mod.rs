mod environment;
mod point;

pub use environment::*;
pub use point::*;

use crate::core::{color::Color, loader::InputParams};

#[enum_dispatch::enum_dispatch(Light)]
pub trait LightT: Send + Sync {
    /// radiance arriving at `position`, environment lights ignore the position
    fn radiance(&self, position: glam::Vec3A) -> Color;

    /// return (normalized direction toward the light, distance to the light)
    fn shadow_ray(&self, position: glam::Vec3A) -> (glam::Vec3A, f32);

    /// environment lights are only seen by rays that leave the scene
    fn is_environment(&self) -> bool;
}

#[enum_dispatch::enum_dispatch]
pub enum Light {
    EnvLight,
    PointLight,
}

pub fn create_light_from_params(params: &mut InputParams) -> anyhow::Result<Light> {
    let ty = params.get_str("type")?;
    let prefix = params.name().to_owned();
    params.set_name(format!("{}-{}", prefix, ty).into());

    let res = match ty.as_str() {
        "environment" => EnvLight::load(params)?.into(),
        "point" => PointLight::load(params)?.into(),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    params.check_unused_keys();

    Ok(res)
}
