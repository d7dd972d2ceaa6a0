//! # ecosim
//!
//! Discrete-time predator-prey ecosystem simulator for teaching population
//! dynamics: rabbits graze a renewable grass field, foxes hunt rabbits, and
//! both breed, age, and die under simple per-tick rules.
//!
//! ## Features
//!
//! - **Deterministic**: seeded random number generation, strictly sequential
//!   agent updates
//! - **Configurable**: YAML configuration for the field, both species, and
//!   the run itself
//! - **Recordable**: one immutable snapshot per tick (grass grid + agent
//!   positions) for external rendering and analysis
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ecosim::{Config, Kind, World};
//!
//! let config = Config::default();
//! let ticks = config.simulation.ticks;
//! let mut world = World::new(config).expect("default config is valid");
//!
//! world.run(ticks);
//!
//! println!("Rabbits: {}", world.count_of(Kind::Rabbit));
//! println!("Foxes: {}", world.count_of(Kind::Fox));
//! println!("Snapshots: {}", world.recording.len());
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use ecosim::Config;
//!
//! let mut config = Config::default();
//! config.rabbits.initial_population = 200;
//! config.world.grow_rate = 20;
//! assert!(config.validate().is_ok());
//! ```

pub mod agent;
pub mod config;
pub mod environment;
pub mod record;
pub mod world;

// Re-export main types
pub use agent::{Agent, Kind};
pub use config::Config;
pub use environment::{Environment, Position};
pub use record::{Counts, Recording, Snapshot};
pub use world::World;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result of a quick performance check
#[derive(Debug, Clone)]
pub struct BenchmarkResult {
    pub ticks: u64,
    pub final_population: usize,
    pub elapsed_secs: f64,
    pub ticks_per_second: f64,
}

impl std::fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Benchmark Results ===")?;
        writeln!(f, "Ticks: {}", self.ticks)?;
        writeln!(f, "Final population: {}", self.final_population)?;
        writeln!(f, "Time: {:.3}s", self.elapsed_secs)?;
        writeln!(f, "Speed: {:.1} ticks/s", self.ticks_per_second)?;
        Ok(())
    }
}

/// Run a quick benchmark with the default configuration
pub fn benchmark(ticks: u64) -> Result<BenchmarkResult, config::ConfigError> {
    use std::time::Instant;

    let mut config = Config::default();
    config.simulation.early_stop = config::EarlyStopPolicy::Never;
    let mut world = World::new(config)?;

    let start = Instant::now();
    world.run(ticks);
    let elapsed = start.elapsed().as_secs_f64();

    Ok(BenchmarkResult {
        ticks: world.time,
        final_population: world.population(),
        elapsed_secs: elapsed,
        ticks_per_second: world.time as f64 / elapsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_quick_simulation() {
        let config = Config::default();
        let mut world = World::new_with_seed(config, 8).unwrap();

        world.run(50);

        assert!(world.time <= 50);
        assert_eq!(world.recording.len() as u64, world.time);
    }

    #[test]
    fn test_benchmark() {
        let result = benchmark(20).unwrap();

        assert_eq!(result.ticks, 20);
        assert!(result.ticks_per_second > 0.0);
    }
}
