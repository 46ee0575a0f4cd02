/// Local shading frame with the surface normal as z axis.
#[derive(Copy, Clone, Debug)]
pub struct Coordinate {
    local_to_world: glam::Mat3A,
    world_to_local: glam::Mat3A,
}

impl Coordinate {
    pub fn from_normal(n: glam::Vec3A) -> Self {
        let reference = if n.y.abs() < 0.99 {
            glam::Vec3A::Y
        } else {
            glam::Vec3A::X
        };
        let x_world = reference.cross(n).normalize();
        let y_world = x_world.cross(n).normalize();

        let local_to_world = glam::Mat3A::from_cols(x_world, y_world, n);
        let world_to_local = local_to_world.transpose();
        Self {
            local_to_world,
            world_to_local,
        }
    }

    pub fn to_local(&self, world: glam::Vec3A) -> glam::Vec3A {
        self.world_to_local * world
    }

    pub fn to_world(&self, local: glam::Vec3A) -> glam::Vec3A {
        self.local_to_world * local
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_is_orthonormal() {
        let normals = [
            glam::Vec3A::Y,
            -glam::Vec3A::Y,
            glam::Vec3A::Z,
            glam::Vec3A::new(1.0, 2.0, -3.0).normalize(),
            glam::Vec3A::new(0.0, 0.995, 0.0998).normalize(),
        ];
        for n in normals {
            let coord = Coordinate::from_normal(n);
            let x = coord.to_world(glam::Vec3A::X);
            let y = coord.to_world(glam::Vec3A::Y);
            let z = coord.to_world(glam::Vec3A::Z);
            assert!((x.length() - 1.0).abs() < 1e-5);
            assert!((y.length() - 1.0).abs() < 1e-5);
            assert!(x.dot(y).abs() < 1e-5);
            assert!(x.dot(z).abs() < 1e-5);
            assert!(y.dot(z).abs() < 1e-5);
            assert!((z - n).length() < 1e-6);

            let v = glam::Vec3A::new(0.3, -0.4, 0.5);
            assert!((coord.to_world(coord.to_local(v)) - v).length() < 1e-5);
            assert!((coord.to_local(n).z - 1.0).abs() < 1e-5);
        }
    }
}
