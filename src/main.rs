use anyhow::Result;
use clap::Parser;
use glam::Vec3;
use shoal_lib::model::config::AppConfig;
use shoal_lib::model::ProceduralFishLoader;
use shoal_lib::World;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Custom config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Simulated seconds to run
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f32,

    /// Frame rate override (frames per simulated second)
    #[arg(long)]
    fps: Option<u64>,

    /// World seed override
    #[arg(long)]
    seed: Option<u64>,

    /// Observer shore-axis position at the start of the run
    #[arg(long)]
    observer_start: Option<f32>,

    /// Observer shore-axis position at the end of the run
    #[arg(long)]
    observer_end: Option<f32>,

    /// Print final agent snapshots as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "shoal=info,shoal_core=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let mut config = AppConfig::load(&args.config)?;
    if let Some(seed) = args.seed {
        config.world.seed = Some(seed);
    }
    if let Some(fps) = args.fps {
        config.target_fps = fps;
    }

    let base = config.world.observer();
    let start_x = args.observer_start.unwrap_or(base.x);
    let end_x = args.observer_end.unwrap_or(start_x);
    let fps = config.target_fps;

    let mut world = World::new(config, &ProceduralFishLoader::default())?;
    let frames = (args.seconds.max(0.0) * fps as f32).round() as u64;
    let dt = 1.0 / fps as f32;

    let mut retargets = 0;
    let mut last = None;
    for frame in 0..frames {
        let t = if frames > 1 {
            frame as f32 / (frames - 1) as f32
        } else {
            0.0
        };
        let observer = Vec3::new(start_x + (end_x - start_x) * t, base.y, base.z);
        let report = world.update(dt, observer);
        retargets += report.retargets;
        last = Some(report);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&world.snapshots())?);
    } else {
        let swim_box = world.swim_box();
        println!("Shoal run finished");
        println!("  seed:          {}", world.world_seed);
        println!("  frames:        {frames} at {fps} fps");
        println!("  agents:        {}", world.population());
        if let Some(report) = last {
            println!("  visible:       {}", report.visible);
        }
        println!("  retargets:     {retargets}");
        println!("  rebuilds:      {}", world.metrics.index_rebuilds());
        println!("  rig failures:  {}", world.metrics.rig_failures());
        println!("  wiggle off:    {}", world.metrics.wiggle_disabled());
        println!(
            "  swim box:      x [{:.2}, {:.2}] y [{:.2}, {:.2}] z [{:.2}, {:.2}]",
            swim_box.min.x, swim_box.max.x, swim_box.min.y, swim_box.max.y, swim_box.min.z, swim_box.max.z
        );
        println!("  wall time:     {:.2?}", world.metrics.elapsed());
    }

    world.teardown();
    Ok(())
}
