//! Performance benchmarks for ecosim

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ecosim::config::EarlyStopPolicy;
use ecosim::{Config, World};

fn benchmark_world_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("world_step");

    for population in [50, 200, 800].iter() {
        let mut config = Config::default();
        config.rabbits.initial_population = *population;
        config.foxes.initial_population = population / 10;
        config.simulation.early_stop = EarlyStopPolicy::Never;

        let mut world = World::new_with_seed(config, 42).expect("valid config");

        // Warm up
        world.run(10);

        group.bench_with_input(
            BenchmarkId::new("rabbits", population),
            population,
            |b, _| {
                b.iter(|| {
                    world.step();
                });
            },
        );
    }

    group.finish();
}

fn benchmark_peak_search(c: &mut Criterion) {
    use ecosim::config::WorldConfig;
    use ecosim::{Environment, Position};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    let env = Environment::new(&WorldConfig::default());
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    c.bench_function("nearest_food_peak", |b| {
        b.iter(|| env.nearest_food_peak(Position::new(20.0, 20.0), 5.0, &mut rng));
    });
}

criterion_group!(benches, benchmark_world_step, benchmark_peak_search);
criterion_main!(benches);
