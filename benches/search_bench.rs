use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pacman_minimax::heuristic::{evaluate, shortest_path_to_goal};
use pacman_minimax::rules::{apply_agent_move, apply_pursuer_moves};
use pacman_minimax::search::{joint_moves, Searcher};
use pacman_minimax::session::CLASSIC_BOARD;
use pacman_minimax::state::GameState;
use pacman_minimax::types::Direction;

fn bench_evaluate(c: &mut Criterion) {
    let state = GameState::parse(CLASSIC_BOARD).unwrap();
    c.bench_function("evaluate_classic", |b| b.iter(|| evaluate(black_box(&state))));
}

fn bench_shortest_path(c: &mut Criterion) {
    let state = GameState::parse(CLASSIC_BOARD).unwrap();
    c.bench_function("shortest_path_classic", |b| {
        b.iter(|| shortest_path_to_goal(black_box(&state)))
    });
}

fn bench_transitions(c: &mut Criterion) {
    let state = GameState::parse(CLASSIC_BOARD).unwrap();
    let joint = vec![Direction::Down, Direction::Up];
    c.bench_function("agent_then_pursuers", |b| {
        b.iter(|| {
            let next = apply_agent_move(black_box(&state), Direction::Left);
            apply_pursuer_moves(&next, black_box(&joint))
        })
    });
}

fn bench_joint_moves(c: &mut Criterion) {
    c.bench_function("joint_moves_3", |b| b.iter(|| joint_moves(black_box(3))));
}

fn bench_search(c: &mut Criterion) {
    let state = GameState::parse(CLASSIC_BOARD).unwrap();
    let mut group = c.benchmark_group("search_classic");
    group.sample_size(20);
    for depth in [2u8, 3, 4] {
        group.bench_function(format!("depth_{}", depth), |b| {
            let mut searcher = Searcher::seeded(7);
            b.iter(|| searcher.search(black_box(&state), depth))
        });
    }
    group.bench_function("parallel_depth_4", |b| {
        let mut searcher = Searcher::seeded(7);
        b.iter(|| searcher.search_parallel(black_box(&state), 4))
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_evaluate,
    bench_shortest_path,
    bench_transitions,
    bench_joint_moves,
    bench_search,
);
criterion_main!(benches);
