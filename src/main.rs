use std::path::PathBuf;

use anyhow::Context;
use structopt::StructOpt;

mod bxdf;
mod camera;
mod core;
mod light;
mod loader;
mod material;
mod primitive;
mod renderer;

#[derive(StructOpt, Debug)]
#[structopt(name = "mc-path-tracer", about = "Monte Carlo path tracer for JSON scenes")]
struct Opt {
    /// scene description file
    #[structopt(parse(from_os_str))]
    scene: PathBuf,

    /// overrides the output file name of the scene
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    #[structopt(long)]
    spp: Option<u32>,

    #[structopt(long)]
    max_depth: Option<u32>,

    /// worker threads, defaults to the number of logical cpus
    #[structopt(short = "j", long)]
    threads: Option<usize>,

    #[structopt(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();

    log::info!("loading scene '{}'...", opt.scene.display());
    let begin_time = std::time::Instant::now();
    let (scene, mut config) = loader::load_scene(&opt.scene)?;
    log::info!("scene is loaded, time used: {:?}", begin_time.elapsed());

    if let Some(output) = opt.output {
        config.filename = output;
    }
    if let Some(spp) = opt.spp {
        config.spp = spp.max(1);
    }
    if let Some(max_depth) = opt.max_depth {
        config.max_depth = max_depth;
    }
    if let Some(seed) = opt.seed {
        config.seed = seed;
    }
    config.threads = opt.threads;

    let begin_time = std::time::Instant::now();
    let path_tracer = renderer::PathTracer::new(config.max_depth);
    let image = path_tracer.render(&scene, &config)?;
    log::info!("render finished, time used: {:?}", begin_time.elapsed());

    image
        .save(&config.filename)
        .context(format!("failed to save image '{}'", config.filename.display()))?;
    log::info!("image saved to '{}'", config.filename.display());

    Ok(())
}
