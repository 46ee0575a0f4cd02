use crate::core::{color::Color, loader::InputParams};

use super::LightT;

/// Constant radiance from every direction at infinity.
pub struct EnvLight {
    radiance: Color,
}

impl EnvLight {
    pub fn new(color: Color, power: f32) -> Self {
        Self {
            radiance: color * power,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let color = params.get_color("color")?;
        let power = params.get_float_or("power", 1.0)?;

        Ok(Self::new(color, power))
    }
}

impl LightT for EnvLight {
    fn radiance(&self, _position: glam::Vec3A) -> Color {
        self.radiance
    }

    fn shadow_ray(&self, _position: glam::Vec3A) -> (glam::Vec3A, f32) {
        (glam::Vec3A::Y, f32::INFINITY)
    }

    fn is_environment(&self) -> bool {
        true
    }
}
