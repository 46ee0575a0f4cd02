use crate::{
    camera::CameraT,
    core::{color::Color, ray::Ray, rng::Rng, scene::Scene},
    light::LightT,
    primitive::PrimitiveT,
};

use super::{
    util::{self, Tile, TileResult},
    OutputConfig,
};

/// Unidirectional path tracer with next event estimation toward one random light per bounce.
pub struct PathTracer {
    max_depth: u32,
}

impl PathTracer {
    const CUTOFF_LUMINANCE: f32 = 0.001;
    const SHADOW_EPS: f32 = 0.001;

    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    pub fn trace_ray(&self, scene: &Scene, mut ray: Ray, rng: &mut Rng) -> Color {
        let lights = scene.lights();

        for _ in 0..self.max_depth {
            let inter = scene.bvh().intersect(&ray);
            let primitive = match inter.primitive {
                Some(index) if inter.is_hit() => scene.bvh().primitive(index),
                _ => {
                    ray.radiance += ray.throughput * scene.environment_radiance(ray.direction);
                    break;
                }
            };

            let dir_in = ray.direction;
            ray.move_to(inter.t);
            let normal = primitive.normal_at(ray.origin);

            if cfg!(feature = "debug_normal") {
                let normal_color = Color::new(normal.x, normal.y, normal.z);
                return normal_color * 0.5 + Color::gray(0.5);
            }

            let material = scene.material(primitive.material());

            // a dirac lobe has no density toward a sampled light
            if !lights.is_empty() && !material.is_delta() {
                let light = &lights[rng.uniform_index(lights.len())];
                let (light_dir, dist) = light.shadow_ray(ray.origin);
                let bxdf = material.sample(dir_in, light_dir, normal);
                if !bxdf.is_black() {
                    let shadow_ray = Ray::new(ray.origin, light_dir);
                    if !scene
                        .bvh()
                        .intersect_test(&shadow_ray, dist - Self::SHADOW_EPS)
                    {
                        let cos = light_dir.dot(normal).abs();
                        ray.radiance += ray.throughput
                            * bxdf
                            * light.radiance(ray.origin)
                            * (cos * lights.len() as f32);
                    }
                }
            }

            let scatter = match material.hit(dir_in, normal, rng) {
                Some(scatter) => scatter,
                None => break,
            };
            ray.set_direction(scatter.direction);
            ray.throughput *= scatter.color * ray.direction.dot(normal).abs();

            if !ray.throughput.is_finite()
                || ray.throughput.luminance() < Self::CUTOFF_LUMINANCE
            {
                break;
            }
        }

        ray.radiance
    }

    pub fn render(
        &self,
        scene: &Scene,
        config: &OutputConfig,
    ) -> anyhow::Result<image::RgbaImage> {
        let tiles = util::create_tiles(config.width, config.height, config.tile_size);
        let num_threads = config.threads.unwrap_or_else(num_cpus::get).max(1);
        log::info!(
            "rendering {}x{} at {} spp, {} tiles on {} threads",
            config.width,
            config.height,
            config.spp,
            tiles.len(),
            num_threads
        );

        let progress_bar = util::render_progress_bar(tiles.len());

        let (tile_sender, tile_receiver) = crossbeam::channel::unbounded::<(usize, Tile)>();
        let (result_sender, result_receiver) = crossbeam::channel::unbounded::<TileResult>();
        for (index, tile) in tiles.into_iter().enumerate() {
            tile_sender.send((index, tile))?;
        }
        drop(tile_sender);

        let mut image = image::RgbaImage::new(config.width, config.height);
        crossbeam::scope(|scope| {
            for _ in 0..num_threads {
                let tile_receiver = tile_receiver.clone();
                let result_sender = result_sender.clone();
                let path_tracer = &self;

                scope.spawn(move |_| {
                    for (index, tile) in tile_receiver.iter() {
                        let result = path_tracer.render_tile(scene, config, index, tile);
                        if result_sender.send(result).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_sender);

            for result in result_receiver.iter() {
                result.write_to(&mut image);
                progress_bar.inc(1);
            }
        })
        .map_err(|_| anyhow::anyhow!("render - a worker thread panicked"))?;
        progress_bar.finish();

        Ok(image)
    }

    fn render_tile(
        &self,
        scene: &Scene,
        config: &OutputConfig,
        index: usize,
        tile: Tile,
    ) -> TileResult {
        let mut rng = Rng::with_seed(config.seed.wrapping_add(index as u64));
        let width_inv = 1.0 / config.width as f32;
        let height_inv = 1.0 / config.height as f32;
        let spp_inv = 1.0 / config.spp as f32;

        let mut pixels = Vec::with_capacity((tile.width * tile.height) as usize);
        for j in tile.y..tile.y + tile.height {
            for i in tile.x..tile.x + tile.width {
                let mut color = Color::BLACK;
                for _ in 0..config.spp {
                    let (offset_x, offset_y) = rng.uniform_2d();
                    let u = (i as f32 + offset_x) * width_inv;
                    let v = (j as f32 + offset_y) * height_inv;
                    let ray = scene.camera().generate_ray(u, v, &mut rng);
                    let sample = self.trace_ray(scene, ray, &mut rng);
                    if sample.is_finite() {
                        color += sample;
                    }
                }
                pixels.push((color * spp_inv).to_rgba8());
            }
        }

        TileResult {
            x: tile.x,
            y: tile.y,
            width: tile.width,
            height: tile.height,
            pixels,
        }
    }
}
