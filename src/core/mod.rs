pub mod bbox;
pub mod color;
pub mod coord;
pub mod intersection;
pub mod loader;
pub mod ray;
pub mod rng;
pub mod scene;
pub mod transform;

pub type Complex = num::Complex<f32>;
