use crate::core::{bbox::Bbox, loader::InputParams, ray::Ray};

use super::PrimitiveT;

pub struct Sphere {
    center: glam::Vec3A,
    radius: f32,
    bbox: Bbox,
    material: usize,
}

impl Sphere {
    pub fn new(center: glam::Vec3A, radius: f32, material: usize) -> Self {
        let delta = glam::Vec3A::splat(radius);
        let bbox = Bbox::new(center - delta, center + delta);
        Self {
            center,
            radius,
            bbox,
            material,
        }
    }

    pub fn load(params: &mut InputParams, material: usize) -> anyhow::Result<Self> {
        let center = params.get_float3_or("center", [0.0, 0.0, 0.0])?;

        let radius = params.get_float("radius")?;
        if !(radius > 0.0) {
            anyhow::bail!(format!("{} - 'radius' should be positive", params.name()));
        }

        Ok(Sphere::new(center.into(), radius, material))
    }
}

impl PrimitiveT for Sphere {
    fn hit(&self, ray: &Ray) -> f32 {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;
        let delta = b * b - a * c;
        if delta < 0.0 {
            return f32::INFINITY;
        }

        let delta = delta.sqrt();
        let min = (-b - delta) / a;
        if min > Ray::T_MIN_EPS {
            return min;
        }
        let max = (-b + delta) / a;
        if max > Ray::T_MIN_EPS {
            return max;
        }
        f32::INFINITY
    }

    fn normal_at(&self, p: glam::Vec3A) -> glam::Vec3A {
        (p - self.center).normalize()
    }

    fn bbox(&self) -> Bbox {
        self.bbox
    }

    fn material(&self) -> usize {
        self.material
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_root_from_outside() {
        let sphere = Sphere::new(glam::Vec3A::new(0.0, 0.0, -4.0), 0.5, 0);
        let ray = Ray::new(glam::Vec3A::ZERO, -glam::Vec3A::Z);
        assert!((sphere.hit(&ray) - 3.5).abs() < 1e-5);
        let n = sphere.normal_at(ray.point_at(3.5));
        assert!((n - glam::Vec3A::Z).length() < 1e-4);
    }

    #[test]
    fn far_root_from_inside() {
        let sphere = Sphere::new(glam::Vec3A::ZERO, 2.0, 0);
        let ray = Ray::new(glam::Vec3A::ZERO, glam::Vec3A::X);
        assert!((sphere.hit(&ray) - 2.0).abs() < 1e-5);

        // leaving the surface does not hit it again
        let on_surface = Ray::new(glam::Vec3A::new(2.0, 0.0, 0.0), glam::Vec3A::X);
        assert_eq!(sphere.hit(&on_surface), f32::INFINITY);
    }

    #[test]
    fn miss() {
        let sphere = Sphere::new(glam::Vec3A::ZERO, 1.0, 0);
        let ray = Ray::new(glam::Vec3A::new(0.0, 5.0, -5.0), glam::Vec3A::Z);
        assert_eq!(sphere.hit(&ray), f32::INFINITY);
        let behind = Ray::new(glam::Vec3A::new(0.0, 0.0, 5.0), glam::Vec3A::Z);
        assert_eq!(sphere.hit(&behind), f32::INFINITY);
    }

    #[test]
    fn bbox_encloses_sphere() {
        let sphere = Sphere::new(glam::Vec3A::new(1.0, 2.0, 3.0), 2.0, 4);
        let bbox = sphere.bbox();
        assert_eq!(bbox.p_min, glam::Vec3A::new(-1.0, 0.0, 1.0));
        assert_eq!(bbox.p_max, glam::Vec3A::new(3.0, 4.0, 5.0));
        assert_eq!(sphere.material(), 4);
    }
}
