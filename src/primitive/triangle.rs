use crate::core::{bbox::Bbox, loader::InputParams, ray::Ray, transform::Transform};

use super::PrimitiveT;

pub struct Triangle {
    p1: glam::Vec3A,
    p2: glam::Vec3A,
    p3: glam::Vec3A,
    normal: glam::Vec3A,
    d: f32,
    // edge vectors crossed with the normal, pointing out of the triangle
    n12: glam::Vec3A,
    n23: glam::Vec3A,
    n31: glam::Vec3A,
    shading: Option<ShadingNormals>,
    bbox: Bbox,
    material: usize,
}

struct ShadingNormals {
    normals: [glam::Vec3A; 3],
    // indices of the two axes kept by the 2D projection
    axes: (usize, usize),
    denominator_inv: f32,
}

impl Triangle {
    pub fn new(
        p1: glam::Vec3A,
        p2: glam::Vec3A,
        p3: glam::Vec3A,
        normals: Option<[glam::Vec3A; 3]>,
        material: usize,
    ) -> Self {
        let e12 = p2 - p1;
        let e23 = p3 - p2;
        let e31 = p1 - p3;
        let normal = e12.cross(e23).normalize();
        let d = -normal.dot(p1);

        let shading = normals.map(|normals| {
            let abs = normal.abs();
            let axes = if abs.z >= abs.x && abs.z >= abs.y {
                (0, 1)
            } else if abs.y >= abs.x {
                (0, 2)
            } else {
                (1, 2)
            };
            let (u, v) = axes;
            let denominator =
                (p2[v] - p3[v]) * (p1[u] - p3[u]) + (p3[u] - p2[u]) * (p1[v] - p3[v]);
            ShadingNormals {
                normals: [
                    normals[0].normalize(),
                    normals[1].normalize(),
                    normals[2].normalize(),
                ],
                axes,
                denominator_inv: 1.0 / denominator,
            }
        });

        Self {
            p1,
            p2,
            p3,
            normal,
            d,
            n12: e12.cross(normal),
            n23: e23.cross(normal),
            n31: e31.cross(normal),
            shading,
            bbox: Bbox::from_points(&[p1, p2, p3]),
            material,
        }
    }

    /// zero area triangles have no plane
    pub fn is_degenerate(&self) -> bool {
        !self.normal.is_finite()
    }

    pub fn load(params: &mut InputParams, material: usize) -> anyhow::Result<Self> {
        let p1 = params.get_float3("p1")?.into();
        let p2 = params.get_float3("p2")?.into();
        let p3 = params.get_float3("p3")?.into();

        let normals = if params.contains_key("n1")
            || params.contains_key("n2")
            || params.contains_key("n3")
        {
            Some([
                params.get_float3("n1")?.into(),
                params.get_float3("n2")?.into(),
                params.get_float3("n3")?.into(),
            ])
        } else {
            None
        };

        let triangle = Triangle::new(p1, p2, p3, normals, material);
        if triangle.is_degenerate() {
            anyhow::bail!(format!("{} - triangle has zero area", params.name()));
        }
        Ok(triangle)
    }

    /// loads every triangle of an OBJ file, placed by optional translate/rotate/scale
    pub fn load_mesh(params: &mut InputParams, material: usize) -> anyhow::Result<Vec<Self>> {
        let obj_file = params.get_file_path("obj_file")?;
        let translate = params.get_float3_or("translate", [0.0, 0.0, 0.0])?;
        let rotate = params.get_float3_or("rotate", [0.0, 0.0, 0.0])?;
        let scale = params.get_float3_or("scale", [1.0, 1.0, 1.0])?;
        let trans = Transform::from_trs(translate, rotate, scale);

        let mut load_options = tobj::LoadOptions::default();
        load_options.triangulate = true;
        load_options.single_index = true;
        let (models, _) = tobj::load_obj(&obj_file, &load_options).map_err(|err| {
            anyhow::anyhow!(
                "{} - can't load '{}': {}",
                params.name(),
                obj_file.display(),
                err
            )
        })?;

        let mut triangles = vec![];
        let mut skipped = 0;
        for model in models {
            let mesh = &model.mesh;
            let position = |i: usize| {
                trans.transform_point3a(glam::Vec3A::new(
                    mesh.positions[3 * i],
                    mesh.positions[3 * i + 1],
                    mesh.positions[3 * i + 2],
                ))
            };
            let has_normals = mesh.normals.len() == mesh.positions.len();
            let normal = |i: usize| {
                trans.transform_normal3a(glam::Vec3A::new(
                    mesh.normals[3 * i],
                    mesh.normals[3 * i + 1],
                    mesh.normals[3 * i + 2],
                ))
            };

            for face in mesh.indices.chunks_exact(3) {
                let (i0, i1, i2) = (face[0] as usize, face[1] as usize, face[2] as usize);
                let normals = if has_normals {
                    Some([normal(i0), normal(i1), normal(i2)])
                } else {
                    None
                };
                let triangle =
                    Triangle::new(position(i0), position(i1), position(i2), normals, material);
                if triangle.is_degenerate() {
                    skipped += 1;
                } else {
                    triangles.push(triangle);
                }
            }
        }
        if skipped > 0 {
            log::warn!(
                "{} - skipped {} zero area triangles",
                params.name(),
                skipped
            );
        }
        log::debug!(
            "{} - loaded {} triangles from '{}'",
            params.name(),
            triangles.len(),
            obj_file.display()
        );

        Ok(triangles)
    }
}

impl PrimitiveT for Triangle {
    fn hit(&self, ray: &Ray) -> f32 {
        let denominator = self.normal.dot(ray.direction);
        if denominator == 0.0 {
            return f32::INFINITY;
        }
        let t = -(self.normal.dot(ray.origin) + self.d) / denominator;
        if !(t >= Ray::T_MIN_EPS) {
            return f32::INFINITY;
        }

        let p = ray.point_at(t);
        if (p - self.p1).dot(self.n12) > 0.0
            || (p - self.p2).dot(self.n23) > 0.0
            || (p - self.p3).dot(self.n31) > 0.0
        {
            return f32::INFINITY;
        }
        t
    }

    fn normal_at(&self, p: glam::Vec3A) -> glam::Vec3A {
        if let Some(shading) = &self.shading {
            shading.interpolate([self.p1, self.p2, self.p3], p)
        } else {
            self.normal
        }
    }

    fn bbox(&self) -> Bbox {
        self.bbox
    }

    fn material(&self) -> usize {
        self.material
    }
}

impl ShadingNormals {
    fn interpolate(&self, points: [glam::Vec3A; 3], p: glam::Vec3A) -> glam::Vec3A {
        let (u, v) = self.axes;
        let [a, b, c] = points;
        let w1 = ((b[v] - c[v]) * (p[u] - c[u]) + (c[u] - b[u]) * (p[v] - c[v]))
            * self.denominator_inv;
        let w2 = ((c[v] - a[v]) * (p[u] - c[u]) + (a[u] - c[u]) * (p[v] - c[v]))
            * self.denominator_inv;
        let w3 = 1.0 - w1 - w2;
        (self.normals[0] * w1 + self.normals[1] * w2 + self.normals[2] * w3).normalize()
    }
}
