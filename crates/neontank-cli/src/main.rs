use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use neontank_core::{Environment, FlockController, TankConfig};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Instant;

const BENCHMARK_FISH: usize = 24;
const BENCHMARK_FRAMES: usize = 20_000;

#[derive(Parser)]
#[command(name = "neontank")]
#[command(about = "Headless closed-ecosystem aquarium simulation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and print snapshot samples as JSON lines
    Run {
        /// Path to a config file (JSON); defaults are used when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 120.0)]
        seconds: f64,

        /// Render-frame rate driving the controller (frames per second)
        #[arg(long, default_value_t = 60.0)]
        fps: f64,

        /// Simulated seconds between printed snapshot samples
        #[arg(long, default_value_t = 10.0)]
        sample_every: f64,

        /// Override the configured starting fish count
        #[arg(long)]
        fish: Option<usize>,
    },
    /// Run the performance benchmark suite
    Benchmark,
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn load_config(path: Option<&PathBuf>) -> Result<TankConfig> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;
            let config: TankConfig = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse config {}", path.display()))?;
            Ok(config)
        }
        None => Ok(TankConfig::default()),
    }
}

fn run(
    config: Option<&PathBuf>,
    seconds: f64,
    fps: f64,
    sample_every: f64,
    fish: Option<usize>,
) -> Result<()> {
    anyhow::ensure!(seconds > 0.0 && seconds.is_finite(), "seconds must be positive");
    anyhow::ensure!(fps > 0.0 && fps.is_finite(), "fps must be positive");

    let mut config = load_config(config)?;
    if let Some(fish) = fish {
        config.initial_fish = fish;
    }
    let seed = config.seed;
    let flock_config = config.flock.clone();

    let mut env = Environment::new(config).context("invalid configuration")?;
    let mut flock = FlockController::new(flock_config, seed).context("invalid configuration")?;

    let frame_delta = 1.0 / fps;
    let total_frames = (seconds * fps).ceil() as u64;
    let mut elapsed = 0.0f64;
    let mut next_sample = 0.0f64;
    let mut total_deaths = 0u32;

    for _ in 0..total_frames {
        let outcome = env.tick(frame_delta);
        total_deaths += outcome.fish_died;
        flock.update_frame(frame_delta, env.fish());
        flock.advance_positions(frame_delta);
        elapsed += frame_delta;

        if elapsed >= next_sample {
            let line = serde_json::to_string(&outcome.snapshot)?;
            println!("{{\"t\":{elapsed:.1},\"snapshot\":{line}}}");
            next_sample += sample_every;
        }
    }

    let final_snapshot = env.snapshot();
    eprintln!(
        "done: {elapsed:.0}s simulated, {} fish alive, {total_deaths} died, avg health {:.1}",
        final_snapshot.fish_count, final_snapshot.average_health
    );
    Ok(())
}

fn benchmark() -> Result<()> {
    let config = TankConfig {
        initial_fish: BENCHMARK_FISH,
        ..TankConfig::default()
    };
    let seed = config.seed;
    let flock_config = config.flock.clone();
    let mut env = Environment::new(config).context("invalid configuration")?;
    let mut flock = FlockController::new(flock_config, seed).context("invalid configuration")?;

    let frame_delta = 1.0 / 60.0;
    let start = Instant::now();
    for _ in 0..BENCHMARK_FRAMES {
        env.tick(frame_delta);
        flock.update_frame(frame_delta, env.fish());
        flock.advance_positions(frame_delta);
    }
    let elapsed = start.elapsed().as_secs_f64();
    println!(
        "{BENCHMARK_FRAMES} frames with {BENCHMARK_FISH} fish in {elapsed:.3}s ({:.0} frames/s)",
        BENCHMARK_FRAMES as f64 / elapsed
    );
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            seconds,
            fps,
            sample_every,
            fish,
        } => run(config.as_ref(), seconds, fps, sample_every, fish),
        Commands::Benchmark => benchmark(),
        Commands::DumpDefaultConfig => {
            let json = serde_json::to_string_pretty(&TankConfig::default())?;
            println!("{json}");
            Ok(())
        }
    }
}
