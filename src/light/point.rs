use crate::core::{color::Color, loader::InputParams};

use super::LightT;

/// Isotropic point emitter, `power` spreads over the full sphere.
pub struct PointLight {
    position: glam::Vec3A,
    color: Color,
    power: f32,
}

impl PointLight {
    pub fn new(position: glam::Vec3A, color: Color, power: f32) -> Self {
        Self {
            position,
            color,
            power,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let position = params.get_float3("position")?.into();
        let color = params.get_color_or("color", Color::WHITE)?;
        let power = params.get_float_or("power", 1.0)?;
        if power < 0.0 {
            anyhow::bail!(format!("{} - 'power' should not be negative", params.name()));
        }

        Ok(Self::new(position, color, power))
    }
}

impl LightT for PointLight {
    fn radiance(&self, position: glam::Vec3A) -> Color {
        let dist_sqr = (self.position - position).length_squared();
        self.color * (self.power / (4.0 * std::f32::consts::PI * dist_sqr))
    }

    fn shadow_ray(&self, position: glam::Vec3A) -> (glam::Vec3A, f32) {
        let dir = self.position - position;
        let dist = dir.length();
        (dir / dist, dist)
    }

    fn is_environment(&self) -> bool {
        false
    }
}
