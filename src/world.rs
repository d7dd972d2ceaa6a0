//! Simulation driver - the per-tick update loop.

use crate::agent::{capture_probability, Agent, Kind};
use crate::config::{Config, ConfigError, EarlyStopPolicy};
use crate::environment::{Environment, Position};
use crate::record::{Recording, Snapshot};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// The simulation world: population, field, clock, and run log
pub struct World {
    /// The population, in processing order
    pub agents: Vec<Agent>,
    /// The shared resource field
    pub env: Environment,
    /// Completed ticks
    pub time: u64,
    /// Configuration, fixed for the lifetime of the world
    pub config: Config,
    /// One snapshot per completed tick
    pub recording: Recording,

    // Random number generator (seeded for reproducibility)
    rng: ChaCha8Rng,
    seed: u64,

    births_this_tick: usize,
    deaths_this_tick: usize,
}

impl World {
    /// Create a new world with a random seed
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let seed = rand::thread_rng().gen();
        Self::new_with_seed(config, seed)
    }

    /// Create a new world with a specific seed for reproducibility.
    /// Fails fast on an invalid configuration.
    pub fn new_with_seed(config: Config, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let env = Environment::new(&config.world);

        let total = config.rabbits.initial_population + config.foxes.initial_population;
        let mut agents = Vec::with_capacity(total);
        for _ in 0..config.rabbits.initial_population {
            let position = env.random_location(&mut rng);
            agents.push(Agent::with_random_age(
                Kind::Rabbit,
                position,
                &config.rabbits,
                &mut rng,
            ));
        }
        for _ in 0..config.foxes.initial_population {
            let position = env.random_location(&mut rng);
            agents.push(Agent::with_random_age(
                Kind::Fox,
                position,
                &config.foxes,
                &mut rng,
            ));
        }

        Ok(Self {
            agents,
            env,
            time: 0,
            config,
            recording: Recording::new(),
            rng,
            seed,
            births_this_tick: 0,
            deaths_this_tick: 0,
        })
    }

    /// Advance one tick: move, eat, and breed for every agent present at
    /// tick start, cull the dead, grow the field, then snapshot.
    pub fn step(&mut self) {
        // Children born this tick are buffered; they join the population
        // after the pass and first act next tick.
        let present = self.agents.len();
        let mut newborns = Vec::new();

        for idx in 0..present {
            self.apply_move(idx);
            self.apply_eat(idx);

            let species = self.config.species(self.agents[idx].kind);
            if let Some(child) = self.agents[idx].breed(species) {
                newborns.push(child);
            }
        }

        self.births_this_tick = newborns.len();
        self.agents.extend(newborns);

        self.remove_dead();
        self.env.grow(&mut self.rng);

        self.recording
            .push(Snapshot::capture(&self.env, &self.agents));
        self.time += 1;
    }

    fn apply_move(&mut self, idx: usize) {
        let kind = self.agents[idx].kind;
        let species = self.config.species(kind);
        self.agents[idx].step_move(&self.env, species, &mut self.rng);
    }

    fn apply_eat(&mut self, idx: usize) {
        match self.agents[idx].kind {
            Kind::Rabbit => self.agents[idx].graze(&mut self.env),
            Kind::Fox => self.hunt(idx),
        }
    }

    /// Fox hunt: close on the nearest live rabbit, capturing with a
    /// probability that falls linearly with distance. A successful capture
    /// moves the fox onto the rabbit and marks the rabbit for the next
    /// death check.
    fn hunt(&mut self, idx: usize) {
        let fox_pos = self.agents[idx].position;
        let vision = self.config.foxes.vision;
        let speed = self.agents[idx].speed;

        let Some((prey_idx, dist_sqr)) = self.nearest_live_rabbit(idx, fox_pos) else {
            return;
        };
        if dist_sqr >= vision * vision {
            return;
        }
        let dist = dist_sqr.sqrt();
        if dist >= speed {
            return;
        }

        if self.rng.gen::<f32>() < capture_probability(dist, speed) {
            let prey_pos = self.agents[prey_idx].position;
            self.agents[prey_idx].captured = true;

            let gain = self.config.foxes.hunt_gain;
            let fox = &mut self.agents[idx];
            fox.try_move(prey_pos, &self.env);
            fox.food += gain;
        }
    }

    /// Nearest not-yet-dead rabbit as (index, squared distance). Dead or
    /// captured rabbits are never candidates; with no candidates at all the
    /// hunt simply finds no target. The hunter's own index is skipped.
    fn nearest_live_rabbit(&self, hunter: usize, from: Position) -> Option<(usize, f32)> {
        let mut nearest: Option<(usize, f32)> = None;
        for (idx, other) in self.agents.iter().enumerate() {
            if idx == hunter || other.kind != Kind::Rabbit {
                continue;
            }
            if other.is_dead(&self.config.rabbits) {
                continue;
            }
            let dist_sqr = from.distance_sqr_to(other.position);
            if nearest.map_or(true, |(_, best)| dist_sqr < best) {
                nearest = Some((idx, dist_sqr));
            }
        }
        nearest
    }

    fn remove_dead(&mut self) {
        let before = self.agents.len();
        let (rabbits, foxes) = (&self.config.rabbits, &self.config.foxes);
        self.agents.retain(|agent| {
            let species = match agent.kind {
                Kind::Rabbit => rabbits,
                Kind::Fox => foxes,
            };
            !agent.is_dead(species)
        });
        self.deaths_this_tick = before - self.agents.len();
    }

    /// Whether the configured early-stop policy has triggered
    pub fn should_stop(&self) -> bool {
        match self.config.simulation.early_stop {
            EarlyStopPolicy::Never => false,
            EarlyStopPolicy::Extinction => self.agents.is_empty(),
            EarlyStopPolicy::EitherSpecies => {
                self.count_of(Kind::Rabbit) == 0 || self.count_of(Kind::Fox) == 0
            }
        }
    }

    /// Run for up to `ticks` ticks. The early-stop check runs before each
    /// tick, so an already-stopped world records nothing further.
    pub fn run(&mut self, ticks: u64) {
        let interval = self.config.logging.stats_interval.max(1);
        for _ in 0..ticks {
            if self.should_stop() {
                log::info!(
                    "early stop at tick {} ({:?})",
                    self.time,
                    self.config.simulation.early_stop
                );
                break;
            }
            self.step();

            if self.time % interval == 0 {
                if let Some(snapshot) = self.recording.snapshots().last() {
                    log::info!("{}", snapshot.counts().summary(self.time));
                }
            }
        }
    }

    /// Current population count
    pub fn population(&self) -> usize {
        self.agents.len()
    }

    /// Current count of one species
    pub fn count_of(&self, kind: Kind) -> usize {
        self.agents.iter().filter(|a| a.kind == kind).count()
    }

    /// Check if the population is extinct
    pub fn is_extinct(&self) -> bool {
        self.agents.is_empty()
    }

    /// Children produced during the most recent tick
    pub fn births_this_tick(&self) -> usize {
        self.births_this_tick
    }

    /// Agents culled during the most recent tick
    pub fn deaths_this_tick(&self) -> usize {
        self.deaths_this_tick
    }

    /// Seed for reproducibility
    pub fn seed(&self) -> u64 {
        self.seed
    }
}
