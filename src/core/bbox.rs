use crate::core::ray::Ray;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bbox {
    pub p_min: glam::Vec3A,
    pub p_max: glam::Vec3A,
}

impl Bbox {
    pub fn new(p_min: glam::Vec3A, p_max: glam::Vec3A) -> Self {
        Self { p_min, p_max }
    }

    pub fn from_points(points: &[glam::Vec3A]) -> Self {
        points
            .iter()
            .fold(Self::empty(), |bbox, p| bbox.merge_point(*p))
    }

    pub fn empty() -> Self {
        Self {
            p_min: glam::Vec3A::splat(f32::INFINITY),
            p_max: glam::Vec3A::splat(f32::NEG_INFINITY),
        }
    }

    /// union of the given boxes
    pub fn englobing<I: IntoIterator<Item = Bbox>>(boxes: I) -> Self {
        boxes
            .into_iter()
            .fold(Self::empty(), |bbox, another| bbox.merge(another))
    }

    /// box spanned by the centroids of the given boxes
    pub fn englobing_centers<I: IntoIterator<Item = Bbox>>(boxes: I) -> Self {
        boxes
            .into_iter()
            .fold(Self::empty(), |bbox, another| {
                bbox.merge_point(another.centroid())
            })
    }

    pub fn is_empty(&self) -> bool {
        self.p_min.x > self.p_max.x || self.p_min.y > self.p_max.y || self.p_min.z > self.p_max.z
    }

    pub fn merge(self, another: Bbox) -> Self {
        Self {
            p_min: self.p_min.min(another.p_min),
            p_max: self.p_max.max(another.p_max),
        }
    }

    pub fn merge_point(self, p: glam::Vec3A) -> Self {
        Self {
            p_min: self.p_min.min(p),
            p_max: self.p_max.max(p),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, another: &Bbox) -> bool {
        another.is_empty()
            || (self.p_min.cmple(another.p_min).all() && self.p_max.cmpge(another.p_max).all())
    }

    pub fn extent(&self) -> glam::Vec3A {
        if self.is_empty() {
            glam::Vec3A::ZERO
        } else {
            self.p_max - self.p_min
        }
    }

    /// index of the axis with the greatest extent
    pub fn max_extent_axis(&self) -> usize {
        let diff = self.extent();
        if diff.x >= diff.y && diff.x >= diff.z {
            0
        } else if diff.y >= diff.z {
            1
        } else {
            2
        }
    }

    pub fn surface_area(&self) -> f32 {
        let diff = self.extent();
        2.0 * (diff.x * diff.y + diff.x * diff.z + diff.y * diff.z)
    }

    pub fn centroid(&self) -> glam::Vec3A {
        (self.p_min + self.p_max) * 0.5
    }

    /// slab test, division by a zero direction component gives +-inf on purpose
    pub fn hit_ray(&self, ray: &Ray) -> bool {
        if self.is_empty() {
            return false;
        }

        let inv_dir = ray.direction.recip();
        let mut t0 = f32::NEG_INFINITY;
        let mut t1 = f32::INFINITY;
        for axis in 0..3 {
            let mut near = (self.p_min[axis] - ray.origin[axis]) * inv_dir[axis];
            let mut far = (self.p_max[axis] - ray.origin[axis]) * inv_dir[axis];
            if inv_dir[axis] < 0.0 {
                std::mem::swap(&mut near, &mut far);
            }
            // 0 * inf on a slab face gives NaN, treat it as not constraining
            if !near.is_nan() {
                t0 = t0.max(near);
            }
            if !far.is_nan() {
                t1 = t1.min(far);
            }
        }
        t0 <= t1 && t1 >= 0.0
    }
}
