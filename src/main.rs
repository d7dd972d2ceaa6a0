//! ecosim - CLI entry point
//!
//! Runs predator-prey simulations and writes tick recordings for external
//! rendering and analysis.

use clap::{Parser, Subcommand};
use ecosim::record::Recording;
use ecosim::{Config, Kind, World};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "ecosim")]
#[command(version)]
#[command(about = "Discrete-time predator-prey ecosystem simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and record every tick
    Run {
        /// Configuration file (YAML)
        #[arg(short, long, default_value = "config.yaml")]
        config: PathBuf,

        /// Tick budget, overriding the configured value
        #[arg(short, long)]
        ticks: Option<u64>,

        /// Random seed for reproducibility
        #[arg(long)]
        seed: Option<u64>,

        /// Output recording file (JSON)
        #[arg(short, long, default_value = "recording.json")]
        output: PathBuf,

        /// Quiet mode (minimal output)
        #[arg(short, long)]
        quiet: bool,
    },

    /// Generate default configuration file
    Init {
        /// Output path
        #[arg(short, long, default_value = "config.yaml")]
        output: PathBuf,
    },

    /// Print the population/food series of a saved recording
    Analyze {
        /// Recording file (JSON)
        recording: PathBuf,
    },

    /// Run performance benchmark
    Benchmark {
        /// Number of ticks
        #[arg(short, long, default_value = "1000")]
        ticks: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            ticks,
            seed,
            output,
            quiet,
        } => run_simulation(config, ticks, seed, output, quiet),

        Commands::Init { output } => generate_config(output),

        Commands::Analyze { recording } => analyze_recording(recording),

        Commands::Benchmark { ticks } => run_benchmark(ticks),
    }
}

fn run_simulation(
    config_path: PathBuf,
    ticks: Option<u64>,
    seed: Option<u64>,
    output: PathBuf,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = if config_path.exists() {
        println!("Loading config from: {:?}", config_path);
        Config::from_file(&config_path)?
    } else {
        println!("Using default configuration");
        Config::default()
    };

    if let Some(t) = ticks {
        config.simulation.ticks = t;
    }
    let budget = config.simulation.ticks;

    let mut world = if let Some(s) = seed {
        println!("Using seed: {}", s);
        World::new_with_seed(config, s)?
    } else {
        World::new(config)?
    };

    if !quiet {
        println!("Starting simulation");
        println!(
            "  Grid: {}x{}",
            world.env.rows(),
            world.env.cols()
        );
        println!("  Rabbits: {}", world.count_of(Kind::Rabbit));
        println!("  Foxes: {}", world.count_of(Kind::Fox));
        println!("  Ticks: {}", budget);
        println!();
    }

    let start = Instant::now();
    world.run(budget);
    let elapsed = start.elapsed();

    println!();
    println!("=== Simulation Complete ===");
    println!("Time: {:.2}s", elapsed.as_secs_f64());
    println!("Ticks: {}", world.time);
    println!(
        "Speed: {:.1} ticks/s",
        world.time as f64 / elapsed.as_secs_f64()
    );
    println!("Rabbits: {}", world.count_of(Kind::Rabbit));
    println!("Foxes: {}", world.count_of(Kind::Fox));
    println!("Grass: {:.0}", world.env.total_food());
    println!("Seed: {}", world.seed());

    world.recording.save(&output)?;
    println!("Recording: {:?}", output);

    Ok(())
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::default();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn analyze_recording(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Recording Analysis ===");
    println!("File: {:?}", path);
    println!();

    let recording = Recording::load(&path)?;
    println!("Ticks recorded: {}", recording.len());

    for (tick, counts) in recording.counts().iter().enumerate() {
        println!("{}", counts.summary(tick as u64 + 1));
    }

    if let Some(last) = recording.counts().last() {
        println!();
        println!("Final rabbits: {}", last.rabbits);
        println!("Final foxes: {}", last.foxes);
        println!("Final grass: {:.0}", last.grass);
    }

    Ok(())
}

fn run_benchmark(ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== ecosim Benchmark ===");
    println!("Ticks: {}", ticks);
    println!();

    let result = ecosim::benchmark(ticks)?;
    println!("{}", result);

    Ok(())
}
