mod perspective;

pub use perspective::*;

use crate::core::{loader::InputParams, ray::Ray, rng::Rng};

#[enum_dispatch::enum_dispatch(Camera)]
pub trait CameraT: Send + Sync {
    /// `u` goes right and `v` goes down across the image, both in `[0, 1]`
    fn generate_ray(&self, u: f32, v: f32, rng: &mut Rng) -> Ray;
}

#[enum_dispatch::enum_dispatch]
pub enum Camera {
    PerspectiveCamera,
}

pub fn create_camera_from_params(
    params: &mut InputParams,
    default_aspect: f32,
) -> anyhow::Result<Camera> {
    params.set_name("camera".into());
    let ty = params.get_str("type")?;
    params.set_name(format!("camera-{}", ty).into());

    let res = match ty.as_str() {
        "perspective" => PerspectiveCamera::load(params, default_aspect)?.into(),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    };

    params.check_unused_keys();

    Ok(res)
}
