//! Configuration for the simulator.
//!
//! Supports YAML configuration files with sensible defaults. All knobs are
//! validated once at construction; nothing is re-checked mid-run.

use crate::agent::Kind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub world: WorldConfig,
    pub rabbits: SpeciesConfig,
    pub foxes: SpeciesConfig,
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Environment/field configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Grid rows
    pub rows: usize,
    /// Grid columns
    pub cols: usize,
    /// Food in every cell at the start
    pub initial_grass: f32,
    /// Maximum food per cell
    pub max_grass: f32,
    /// Number of random cells that gain food each tick
    pub grow_rate: usize,
    /// Where growth draws land
    #[serde(default)]
    pub growth: GrowthPolicy,
}

/// Target selection for food growth
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrowthPolicy {
    /// Uniform draws over the whole field
    #[default]
    Uniform,
    /// Draws confined to a rectangle (inclusive cell bounds)
    Region {
        top: usize,
        left: usize,
        bottom: usize,
        right: usize,
    },
}

/// Per-species constants
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesConfig {
    /// Number of agents at start
    pub initial_population: usize,
    /// Sensing radius in cells
    pub vision: f32,
    /// Maximum displacement per tick
    pub speed: f32,
    /// Ticks that must elapse between reproduction events
    pub breed_cooldown: u32,
    /// Food reserve required to reproduce
    pub breed_food: f32,
    /// Cooldown counter value right after breeding, for parent and child
    pub breed_restart: u32,
    /// Age beyond which the agent expires
    pub max_age: u32,
    /// Starting food reserve
    pub initial_food: f32,
    /// Food gained from a successful hunt (predators only)
    pub hunt_gain: f32,
}

impl SpeciesConfig {
    /// Reference rabbit constants
    pub fn rabbit() -> Self {
        Self {
            initial_population: 100,
            vision: 5.0,
            speed: 1.0,
            breed_cooldown: 10,
            breed_food: 10.0,
            breed_restart: 0,
            max_age: 40,
            initial_food: 10.0,
            hunt_gain: 0.0,
        }
    }

    /// Reference fox constants
    pub fn fox() -> Self {
        Self {
            initial_population: 10,
            vision: 7.0,
            speed: 5.0,
            breed_cooldown: 30,
            breed_food: 20.0,
            breed_restart: 0,
            max_age: 80,
            initial_food: 10.0,
            hunt_gain: 2.0,
        }
    }
}

/// Run-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Tick budget for a run
    pub ticks: u64,
    /// When to stop before the budget is spent
    #[serde(default)]
    pub early_stop: EarlyStopPolicy,
}

/// Early termination policy, checked before each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EarlyStopPolicy {
    /// Always spend the full tick budget
    Never,
    /// Stop once the whole population is gone
    #[default]
    Extinction,
    /// Stop once either species is gone
    EitherSpecies,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Ticks between progress log lines
    pub stats_interval: u64,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            world: WorldConfig::default(),
            rabbits: SpeciesConfig::rabbit(),
            foxes: SpeciesConfig::fox(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            rows: 40,
            cols: 40,
            initial_grass: 1.0,
            max_grass: 3.0,
            grow_rate: 10,
            growth: GrowthPolicy::Uniform,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks: 1000,
            early_stop: EarlyStopPolicy::Extinction,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            stats_interval: 100,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Constants for one species
    pub fn species(&self, kind: Kind) -> &SpeciesConfig {
        match kind {
            Kind::Rabbit => &self.rabbits,
            Kind::Fox => &self.foxes,
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world.rows == 0 || self.world.cols == 0 {
            return Err(ConfigError::invalid("grid dimensions must be positive"));
        }
        if self.world.max_grass <= 0.0 {
            return Err(ConfigError::invalid("max_grass must be > 0"));
        }
        if self.world.initial_grass < 0.0 || self.world.initial_grass > self.world.max_grass {
            return Err(ConfigError::invalid(
                "initial_grass must be in [0, max_grass]",
            ));
        }
        // Growth and consumption move cells in whole units; fractional grass
        // quantities would let grow() overshoot the cap.
        if self.world.initial_grass.fract() != 0.0 || self.world.max_grass.fract() != 0.0 {
            return Err(ConfigError::invalid(
                "initial_grass and max_grass must be whole numbers",
            ));
        }
        if let GrowthPolicy::Region {
            top,
            left,
            bottom,
            right,
        } = self.world.growth
        {
            if top > bottom || left > right || bottom >= self.world.rows || right >= self.world.cols
            {
                return Err(ConfigError::invalid("growth region outside the grid"));
            }
        }
        validate_species("rabbits", &self.rabbits)?;
        validate_species("foxes", &self.foxes)?;
        Ok(())
    }
}

fn validate_species(name: &str, species: &SpeciesConfig) -> Result<(), ConfigError> {
    if species.speed <= 0.0 {
        return Err(ConfigError::invalid(format!("{name}: speed must be > 0")));
    }
    if species.vision < 0.0 {
        return Err(ConfigError::invalid(format!("{name}: vision must be >= 0")));
    }
    if species.max_age == 0 {
        return Err(ConfigError::invalid(format!("{name}: max_age must be > 0")));
    }
    if species.initial_food <= 0.0 {
        return Err(ConfigError::invalid(format!(
            "{name}: initial_food must be > 0"
        )));
    }
    if species.hunt_gain < 0.0 {
        return Err(ConfigError::invalid(format!(
            "{name}: hunt_gain must be >= 0"
        )));
    }
    Ok(())
}

/// Errors raised while loading or validating configuration
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Invalid(String),
}

impl ConfigError {
    fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "IO error: {}", e),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::Invalid(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_roundtrip() {
        let config = Config::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let loaded: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(loaded.world.rows, config.world.rows);
        assert_eq!(loaded.foxes.speed, config.foxes.speed);
        assert_eq!(loaded.simulation.early_stop, EarlyStopPolicy::Extinction);
    }

    #[test]
    fn test_rejects_zero_grid() {
        let mut config = Config::default();
        config.world.rows = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_capacity() {
        let mut config = Config::default();
        config.world.max_grass = 0.0;
        assert!(config.validate().is_err());

        config.world.max_grass = 3.0;
        config.world.initial_grass = 5.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_fractional_grass() {
        // a cell at cap - 0.5 would take a whole growth unit and overshoot
        let mut config = Config::default();
        config.world.initial_grass = 0.5;
        assert!(config.validate().is_err());

        config.world.initial_grass = 1.0;
        config.world.max_grass = 2.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_region_outside_grid() {
        let mut config = Config::default();
        config.world.growth = GrowthPolicy::Region {
            top: 0,
            left: 0,
            bottom: 60,
            right: 10,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_speed() {
        let mut config = Config::default();
        config.foxes.speed = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_population_is_allowed() {
        // an empty world is a valid (if short) simulation
        let mut config = Config::default();
        config.rabbits.initial_population = 0;
        config.foxes.initial_population = 0;
        assert!(config.validate().is_ok());
    }
}
