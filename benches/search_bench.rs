//! Planner benchmarks.
//!
//! Run with: `cargo bench`

use std::path::PathBuf;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use moo2_planner::{
    scenario::ScenarioLoader, search::actions::colonist_distributions, ActionSpace, GameData,
    SearchEngine, SearchSettings,
};

fn fixture() -> moo2_planner::Game {
    let scenario = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
        .load(PathBuf::from("scenarios/three_terran.yaml"))
        .expect("scenario parses");
    scenario
        .build_game(GameData::standard())
        .expect("scenario builds")
}

pub fn enumeration_benchmark(c: &mut Criterion) {
    let game = fixture();
    c.bench_function("action_space_three_colonies", |b| {
        b.iter(|| ActionSpace::new(black_box(&game)))
    });
    c.bench_function("colonist_distributions_three_colonies", |b| {
        b.iter(|| colonist_distributions(black_box(&game)))
    });
}

pub fn rollout_benchmark(c: &mut Criterion) {
    let settings = SearchSettings {
        samples: 1,
        threads: 1,
        seed: 1,
        max_turns: 40,
    };
    let engine = SearchEngine::new(fixture(), settings);
    let action = engine
        .action_space()
        .action(0)
        .expect("fixture has actions");
    c.bench_function("bounded_rollout_40_turns", |b| {
        b.iter(|| engine.sample(black_box(&action), 0, 1))
    });
}

criterion_group!(benches, enumeration_benchmark, rollout_benchmark);
criterion_main!(benches);
