#[derive(Debug, Clone, Copy)]
pub struct Transform {
    trans: glam::Affine3A,
    trans_it: glam::Mat3A,
}

impl Transform {
    pub fn new(trans: glam::Affine3A) -> Self {
        let trans_inv = trans.inverse();
        let trans_it = trans_inv.matrix3.transpose();
        Self { trans, trans_it }
    }

    /// scale, then rotate (euler angles in degrees, applied in YXZ order), then translate
    pub fn from_trs(translate: [f32; 3], rotate: [f32; 3], scale: [f32; 3]) -> Self {
        let rotation = glam::Quat::from_euler(
            glam::EulerRot::YXZ,
            rotate[1].to_radians(),
            rotate[0].to_radians(),
            rotate[2].to_radians(),
        );
        Self::new(glam::Affine3A::from_scale_rotation_translation(
            scale.into(),
            rotation,
            translate.into(),
        ))
    }

    pub fn transform_point3a(&self, other: glam::Vec3A) -> glam::Vec3A {
        self.trans.transform_point3a(other)
    }

    #[cfg(test)]
    pub fn transform_vector3a(&self, other: glam::Vec3A) -> glam::Vec3A {
        self.trans.transform_vector3a(other)
    }

    pub fn transform_normal3a(&self, other: glam::Vec3A) -> glam::Vec3A {
        (self.trans_it * other).normalize()
    }
}
