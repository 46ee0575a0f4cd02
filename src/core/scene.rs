use crate::{
    camera::Camera,
    core::color::Color,
    light::{Light, LightT},
    material::Material,
    primitive::{BvhAccel, Primitive},
};

/// Everything a render reads. Immutable once built, shared by reference across workers.
pub struct Scene {
    camera: Camera,
    bvh: BvhAccel,
    materials: Vec<Material>,
    lights: Vec<Light>,
    environments: Vec<Light>,
}

impl Scene {
    pub fn new(
        camera: Camera,
        primitives: Vec<Primitive>,
        materials: Vec<Material>,
        lights: Vec<Light>,
    ) -> Self {
        let (environments, lights): (Vec<_>, Vec<_>) =
            lights.into_iter().partition(|light| light.is_environment());

        let bvh = BvhAccel::new(primitives);
        let stats = bvh.stats();
        log::info!(
            "bvh built - {} primitives, {} nodes, {} leaves, depth {}, largest leaf {}",
            bvh.primitives().len(),
            stats.node_count,
            stats.leaf_count,
            stats.max_depth,
            stats.max_leaf_size,
        );

        Self {
            camera,
            bvh,
            materials,
            lights,
            environments,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn bvh(&self) -> &BvhAccel {
        &self.bvh
    }

    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    #[cfg(test)]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// lights that can be sampled for direct lighting
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// summed radiance of every environment light, seen by rays leaving the scene
    pub fn environment_radiance(&self, direction: glam::Vec3A) -> Color {
        self.environments
            .iter()
            .fold(Color::BLACK, |acc, env| acc + env.radiance(direction))
    }

    #[cfg(test)]
    pub fn environment_count(&self) -> usize {
        self.environments.len()
    }
}
