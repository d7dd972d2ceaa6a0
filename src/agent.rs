//! Agents and their behavior rules: rabbits graze, foxes hunt.

use crate::config::SpeciesConfig;
use crate::environment::{Environment, Position};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// The two agent variants. A closed set: behaviors dispatch on the tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    Rabbit,
    Fox,
}

/// An agent in the simulation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    pub kind: Kind,
    /// Current position, snapped to a cell after every accepted move
    pub position: Position,
    /// Ticks since creation
    pub age: u32,
    /// Energy store; the agent starves once this reaches zero
    pub food: f32,
    /// Maximum displacement per tick
    pub speed: f32,
    /// Ticks since the last reproduction
    pub last_breed: u32,
    /// Set by a fox that caught this agent (rabbits only)
    pub captured: bool,
}

/// Probability that a predator at `distance` catches prey this tick.
/// Zero at `distance >= speed`, approaching one as the gap closes.
#[inline]
pub fn capture_probability(distance: f32, speed: f32) -> f32 {
    if distance >= speed {
        0.0
    } else {
        1.0 - distance / speed
    }
}

impl Agent {
    /// Create a newborn agent of the given kind
    pub fn new(kind: Kind, position: Position, species: &SpeciesConfig) -> Self {
        Self {
            kind,
            position,
            age: 0,
            food: species.initial_food,
            speed: species.speed,
            last_breed: 0,
            captured: false,
        }
    }

    /// Spawn with a uniformly random starting age, so the initial
    /// population is not an age-synchronized cohort.
    pub fn with_random_age(
        kind: Kind,
        position: Position,
        species: &SpeciesConfig,
        rng: &mut impl Rng,
    ) -> Self {
        let mut agent = Self::new(kind, position, species);
        agent.age = rng.gen_range(0..species.max_age);
        agent
    }

    /// Apply a proposed position if it lands inside the field; otherwise
    /// stay put (reject-and-stay boundary policy).
    pub fn try_move(&mut self, proposal: Position, env: &Environment) {
        let proposal = proposal.rounded();
        if env.is_in_bounds(proposal) {
            self.position = proposal;
        }
    }

    /// Step `speed` units along a uniformly random heading, rounded to the
    /// nearest grid offset.
    fn random_step(&mut self, env: &Environment, rng: &mut impl Rng) {
        let heading = rng.gen::<f32>() * TAU;
        let proposal = Position::new(
            self.position.row + (heading.cos() * self.speed).round(),
            self.position.col + (heading.sin() * self.speed).round(),
        );
        self.try_move(proposal, env);
    }

    /// Movement phase. Rabbits sit still on food, otherwise head for the
    /// best patch in sight, otherwise wander. Foxes always wander; the
    /// chase happens during the hunt.
    pub fn step_move(&mut self, env: &Environment, species: &SpeciesConfig, rng: &mut impl Rng) {
        match self.kind {
            Kind::Rabbit => {
                if env.food_at(self.position) > 0.0 {
                    return;
                }
                match env.nearest_food_peak(self.position, species.vision, rng) {
                    Some(target) => {
                        let dist = self.position.distance_to(target);
                        if dist < self.speed {
                            self.try_move(target, env);
                        } else {
                            let scale = self.speed / dist;
                            let proposal = Position::new(
                                self.position.row + (target.row - self.position.row) * scale,
                                self.position.col + (target.col - self.position.col) * scale,
                            );
                            self.try_move(proposal, env);
                        }
                    }
                    None => self.random_step(env, rng),
                }
            }
            Kind::Fox => self.random_step(env, rng),
        }
    }

    /// Rabbit foraging: eat one unit from the current cell, or burn one
    /// unit of reserve if the cell is bare.
    pub fn graze(&mut self, env: &mut Environment) {
        if env.food_at(self.position) > 0.0 {
            env.consume(self.position, 1.0);
            self.food += 1.0;
        } else {
            self.food -= 1.0;
        }
    }

    /// Reproduction phase. Cooldown and reserve permitting, split the food
    /// reserve with a newborn at the same cell. Ages the agent and advances
    /// the cooldown counter either way.
    pub fn breed(&mut self, species: &SpeciesConfig) -> Option<Agent> {
        let child = if self.last_breed > species.breed_cooldown && self.food > species.breed_food {
            self.last_breed = species.breed_restart;
            self.food /= 2.0;
            Some(Agent {
                kind: self.kind,
                position: self.position,
                age: 0,
                food: self.food,
                speed: self.speed,
                last_breed: species.breed_restart,
                captured: false,
            })
        } else {
            None
        };
        self.age += 1;
        self.last_breed += 1;
        child
    }

    /// Death check, evaluated by the driver once per tick after all
    /// behaviors have run. Starvation and old age kill both kinds; capture
    /// only ever marks rabbits.
    pub fn is_dead(&self, species: &SpeciesConfig) -> bool {
        self.food <= 0.0 || self.age > species.max_age || self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn test_env() -> Environment {
        Environment::new(&WorldConfig::default())
    }

    fn barren_env() -> Environment {
        Environment::new(&WorldConfig {
            initial_grass: 0.0,
            ..WorldConfig::default()
        })
    }

    fn rabbit_at(row: f32, col: f32) -> (Agent, SpeciesConfig) {
        let species = SpeciesConfig::rabbit();
        (
            Agent::new(Kind::Rabbit, Position::new(row, col), &species),
            species,
        )
    }

    #[test]
    fn test_try_move_rejects_out_of_bounds() {
        let env = test_env();
        let (mut rabbit, _) = rabbit_at(0.0, 0.0);
        rabbit.try_move(Position::new(-1.0, 0.0), &env);
        assert_eq!(rabbit.position, Position::new(0.0, 0.0));

        rabbit.try_move(Position::new(1.0, 1.0), &env);
        assert_eq!(rabbit.position, Position::new(1.0, 1.0));
    }

    #[test]
    fn test_random_step_always_displaces() {
        // |cos| and |sin| cannot both round to zero, so a wandering agent
        // away from the edge always changes cell
        let env = test_env();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        for _ in 0..100 {
            let (mut rabbit, _) = rabbit_at(20.0, 20.0);
            rabbit.random_step(&env, &mut rng);
            assert_ne!(rabbit.position, Position::new(20.0, 20.0));
        }
    }

    #[test]
    fn test_graze_consumes_or_starves() {
        let mut env = test_env(); // every cell starts with 1 food
        let (mut rabbit, _) = rabbit_at(5.0, 5.0);

        rabbit.graze(&mut env);
        assert_eq!(rabbit.food, 11.0);
        assert_eq!(env.food_at(rabbit.position), 0.0);

        rabbit.graze(&mut env);
        assert_eq!(rabbit.food, 10.0);
    }

    #[test]
    fn test_breed_splits_reserve() {
        let (mut rabbit, species) = rabbit_at(5.0, 5.0);
        rabbit.food = 24.0;
        rabbit.last_breed = species.breed_cooldown + 1;

        let child = rabbit.breed(&species).expect("conditions met");
        assert_eq!(child.age, 0);
        assert_eq!(child.kind, Kind::Rabbit);
        assert_eq!(child.position, rabbit.position);
        assert_eq!(child.speed, rabbit.speed);
        assert_eq!(child.last_breed, species.breed_restart);
        // conservative: parent + child reserves equal the original
        assert!((rabbit.food + child.food - 24.0).abs() < f32::EPSILON);
        // parent aged and cooldown restarted
        assert_eq!(rabbit.age, 1);
        assert_eq!(rabbit.last_breed, species.breed_restart + 1);
    }

    #[test]
    fn test_breed_requires_cooldown_and_food() {
        let (mut rabbit, species) = rabbit_at(5.0, 5.0);

        rabbit.food = 24.0;
        rabbit.last_breed = species.breed_cooldown; // not strictly greater
        assert!(rabbit.breed(&species).is_none());

        rabbit.last_breed = species.breed_cooldown + 1;
        rabbit.food = species.breed_food; // not strictly greater
        assert!(rabbit.breed(&species).is_none());

        // ages regardless of outcome
        assert_eq!(rabbit.age, 2);
    }

    #[test]
    fn test_death_conditions() {
        let (mut rabbit, species) = rabbit_at(5.0, 5.0);
        assert!(!rabbit.is_dead(&species));

        rabbit.food = 0.0;
        assert!(rabbit.is_dead(&species));

        rabbit.food = 10.0;
        rabbit.age = species.max_age + 1;
        assert!(rabbit.is_dead(&species));

        rabbit.age = 0;
        rabbit.captured = true;
        assert!(rabbit.is_dead(&species));
    }

    #[test]
    fn test_starvation_overrides_everything() {
        let (mut rabbit, species) = rabbit_at(5.0, 5.0);
        rabbit.food = -3.0;
        rabbit.age = 1;
        rabbit.captured = false;
        assert!(rabbit.is_dead(&species));
    }

    #[test]
    fn test_capture_probability_endpoints() {
        assert_eq!(capture_probability(5.0, 5.0), 0.0);
        assert_eq!(capture_probability(6.0, 5.0), 0.0);
        assert_eq!(capture_probability(0.0, 5.0), 1.0);
        let p = capture_probability(1.0, 5.0);
        assert!((p - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_rabbit_steps_toward_distant_food() {
        // bare field except a patch east of the rabbit
        let mut env = barren_env();
        env.set_food(Position::new(20.0, 24.0), 3.0);

        let (mut rabbit, species) = rabbit_at(20.0, 20.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        rabbit.step_move(&env, &species, &mut rng);
        // speed 1: one cell east along the unit vector
        assert_eq!(rabbit.position, Position::new(20.0, 21.0));
    }

    #[test]
    fn test_rabbit_jumps_onto_adjacent_food() {
        let mut env = barren_env();
        env.set_food(Position::new(10.0, 10.0), 2.0);

        let species = SpeciesConfig::rabbit();
        let mut fast = Agent::new(Kind::Rabbit, Position::new(10.0, 12.0), &species);
        fast.speed = 3.0;
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        fast.step_move(&env, &species, &mut rng);
        assert_eq!(fast.position, Position::new(10.0, 10.0));
    }

    #[test]
    fn test_rabbit_stays_on_food() {
        let env = test_env(); // food everywhere
        let (mut rabbit, species) = rabbit_at(20.0, 20.0);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        rabbit.step_move(&env, &species, &mut rng);
        assert_eq!(rabbit.position, Position::new(20.0, 20.0));
    }
}
