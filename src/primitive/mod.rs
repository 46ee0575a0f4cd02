mod bvh;
mod sphere;
mod triangle;

pub use bvh::*;
pub use sphere::*;
pub use triangle::*;

use crate::core::{bbox::Bbox, loader::InputParams, ray::Ray};

#[enum_dispatch::enum_dispatch(Primitive)]
pub trait PrimitiveT: Send + Sync {
    /// distance to the closest hit above `Ray::T_MIN_EPS`, infinite on a miss
    fn hit(&self, ray: &Ray) -> f32;

    fn normal_at(&self, p: glam::Vec3A) -> glam::Vec3A;

    fn bbox(&self) -> Bbox;

    /// index into the scene material list
    fn material(&self) -> usize;
}

#[enum_dispatch::enum_dispatch]
pub enum Primitive {
    Sphere,
    Triangle,
}

pub fn create_primitives_from_params(
    params: &mut InputParams,
    material_count: usize,
    primitives: &mut Vec<Primitive>,
) -> anyhow::Result<()> {
    let ty = params.get_str("type")?;
    let prefix = params.name().to_owned();
    params.set_name(format!("{}-{}", prefix, ty).into());

    let material = params.get_int("material")?;
    if material < 0 || material as usize >= material_count {
        anyhow::bail!(format!(
            "{} - material index {} out of range (there are {} materials)",
            params.name(),
            material,
            material_count
        ));
    }
    let material = material as usize;

    match ty.as_str() {
        "sphere" => primitives.push(Sphere::load(params, material)?.into()),
        "triangle" => primitives.push(Triangle::load(params, material)?.into()),
        "mesh" => primitives.extend(
            Triangle::load_mesh(params, material)?
                .into_iter()
                .map(Primitive::from),
        ),
        _ => anyhow::bail!(format!("{}: unknown type '{}'", params.name(), ty)),
    }

    params.check_unused_keys();

    Ok(())
}
