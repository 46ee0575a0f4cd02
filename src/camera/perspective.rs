use crate::core::{loader::InputParams, ray::Ray, rng::Rng};

use super::CameraT;

/// Pinhole or thin lens camera looking down its local -z axis.
///
/// The viewport is one unit wide at `focal_length` in front of the eye.
pub struct PerspectiveCamera {
    position: glam::Vec3A,
    rotation: glam::Mat3A,
    focal_length: f32,
    viewport_height: f32,
    lens_radius: f32,
    focal_distance: f32,
}

impl PerspectiveCamera {
    pub fn new(
        position: glam::Vec3A,
        rotation: [f32; 3],
        fov: f32,
        aspect: f32,
        lens_radius: f32,
        focal_distance: f32,
    ) -> Self {
        let rotation = glam::Mat3A::from_quat(glam::Quat::from_euler(
            glam::EulerRot::YXZ,
            rotation[1].to_radians(),
            rotation[0].to_radians(),
            rotation[2].to_radians(),
        ));
        Self {
            position,
            rotation,
            focal_length: 0.5 / (fov * 0.5).tan(),
            viewport_height: 1.0 / aspect,
            lens_radius,
            focal_distance,
        }
    }

    pub fn load(params: &mut InputParams, default_aspect: f32) -> anyhow::Result<Self> {
        let position = params.get_float3_or("position", [0.0, 0.0, 0.0])?.into();
        let rotation = params.get_float3_or("rotation", [0.0, 0.0, 0.0])?;
        let fov_deg = params.get_float("fov")?;
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            anyhow::bail!(format!("{} - 'fov' should be in (0, 180)", params.name()));
        }
        let aspect = params.get_float_or("aspect", default_aspect)?;
        if !(aspect > 0.0) {
            anyhow::bail!(format!("{} - 'aspect' should be positive", params.name()));
        }
        let lens_radius = params.get_float_or("lens_radius", 0.0)?;
        let focal_distance = params.get_float_or("focal_distance", 0.0)?;

        Ok(Self::new(
            position,
            rotation,
            fov_deg.to_radians(),
            aspect,
            lens_radius,
            focal_distance,
        ))
    }

    fn uses_lens(&self) -> bool {
        self.lens_radius > 0.0 && self.focal_distance > 0.0
    }
}

impl CameraT for PerspectiveCamera {
    fn generate_ray(&self, u: f32, v: f32, rng: &mut Rng) -> Ray {
        let direction = glam::Vec3A::new(
            u - 0.5,
            (0.5 - v) * self.viewport_height,
            -self.focal_length,
        );

        if self.uses_lens() {
            let focus = direction * (self.focal_distance / self.focal_length);
            let (lens_x, lens_y) = rng.uniform_in_disk();
            let lens = glam::Vec3A::new(lens_x * self.lens_radius, lens_y * self.lens_radius, 0.0);
            Ray::new(
                self.position + self.rotation * lens,
                self.rotation * (focus - lens),
            )
        } else {
            Ray::new(self.position, self.rotation * direction)
        }
    }
}
