mod pt;
mod util;

pub use pt::*;

use std::path::PathBuf;

use crate::core::loader::InputParams;

pub struct OutputConfig {
    pub filename: PathBuf,
    pub width: u32,
    pub height: u32,
    pub spp: u32,
    pub tile_size: u32,
    pub max_depth: u32,
    pub seed: u64,
    /// worker count, `None` uses one worker per logical cpu
    pub threads: Option<usize>,
}

impl OutputConfig {
    pub const DEFAULT_TILE_SIZE: u32 = 16;

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        params.set_name("output".into());

        let filename = params.get_file_path("filename")?;
        let width = positive_int(params, "width", None)?;
        let height = positive_int(params, "height", None)?;
        let spp = positive_int(params, "spp", Some(1))?;
        let tile_size = positive_int(params, "tile_size", Some(Self::DEFAULT_TILE_SIZE))?;
        let max_depth = positive_int(params, "max_depth", Some(5))?;
        let seed = params.get_int_or("seed", 0)?;
        if seed < 0 {
            anyhow::bail!(format!("{} - 'seed' should not be negative", params.name()));
        }

        params.check_unused_keys();

        Ok(Self {
            filename,
            width,
            height,
            spp,
            tile_size,
            max_depth,
            seed: seed as u64,
            threads: None,
        })
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }
}

fn positive_int(params: &mut InputParams, key: &str, fallback: Option<u32>) -> anyhow::Result<u32> {
    let value = match fallback {
        Some(fallback) => params.get_int_or(key, fallback as i32)?,
        None => params.get_int(key)?,
    };
    if value <= 0 {
        anyhow::bail!(format!("{} - '{}' should be positive", params.name(), key));
    }
    Ok(value as u32)
}
