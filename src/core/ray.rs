use crate::core::color::Color;

/// A ray that also carries the state of the light path traced along it.
#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: glam::Vec3A,
    pub direction: glam::Vec3A,
    pub radiance: Color,
    pub throughput: Color,
}

impl Ray {
    pub const T_MIN_EPS: f32 = 0.0001;

    pub fn new(origin: glam::Vec3A, direction: glam::Vec3A) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
            radiance: Color::BLACK,
            throughput: Color::WHITE,
        }
    }

    pub fn point_at(&self, t: f32) -> glam::Vec3A {
        self.origin + self.direction * t
    }

    pub fn set_direction(&mut self, direction: glam::Vec3A) {
        self.direction = direction.normalize();
    }

    pub fn move_to(&mut self, t: f32) {
        self.origin = self.point_at(t);
    }
}
