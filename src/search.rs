//! Alpha-beta search over agent moves and joint pursuer moves
//!
//! The agent is the maximizing player and picks one of four directions; the
//! pursuers form a single minimizing player whose moves are every ordered
//! tuple of directions, one per pursuer. Children are always visited in a
//! fixed order (`Direction::all()` and `joint_moves`), so for a given state
//! the set of equally-best moves retained before a cutoff is reproducible.
//! The only randomness is the final pick among those moves, drawn from the
//! `Rng` the searcher was built with.
//!
//! # Example
//!
//! ```
//! use pacman_minimax::search::Searcher;
//! use pacman_minimax::state::GameState;
//!
//! let state = GameState::parse(".__\n_P_\n__G\n").unwrap();
//! let mut searcher = Searcher::seeded(7);
//! let result = searcher.search(&state, 2);
//! assert!(result.best_move.is_some());
//! ```

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::heuristic::{evaluate, LOSS_SCORE, WIN_SCORE};
use crate::profiler;
use crate::rules::{apply_agent_move, apply_pursuer_moves};
use crate::state::GameState;
use crate::types::Direction;

/// Node and cutoff counts for one search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
}

impl SearchStats {
    fn add(&mut self, other: SearchStats) {
        self.nodes += other.nodes;
        self.cutoffs += other.cutoffs;
    }
}

/// Outcome of a root search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub value: i32,
    /// Uniform pick among `candidates`; None at a leaf root
    pub best_move: Option<Direction>,
    /// Root moves that tied for the best value, in search order
    pub candidates: Vec<Direction>,
    pub stats: SearchStats,
}

/// Every ordered tuple of `n` directions, lexicographic over
/// `Direction::all()` with the first pursuer most significant.
/// Yields `4^n` tuples; for `n == 0` that is the single empty tuple.
pub fn joint_moves(n: usize) -> Vec<Vec<Direction>> {
    let mut tuples: Vec<Vec<Direction>> = vec![Vec::new()];
    for _ in 0..n {
        tuples = tuples
            .into_iter()
            .flat_map(|prefix| {
                Direction::all().into_iter().map(move |dir| {
                    let mut tuple = prefix.clone();
                    tuple.push(dir);
                    tuple
                })
            })
            .collect();
    }
    tuples
}

/// Recursive alpha-beta. Returns the node value and, for maximizing nodes,
/// the moves that reached it.
fn alpha_beta_node(
    state: &GameState,
    depth: u8,
    alpha: i32,
    beta: i32,
    maximizing: bool,
    stats: &mut SearchStats,
) -> (i32, Vec<Direction>) {
    stats.nodes += 1;
    profiler::record_search_node();

    if depth == 0 || state.outcome().is_decided() {
        return (evaluate(state), Vec::new());
    }

    if maximizing {
        max_node(state, depth, alpha, beta, stats)
    } else {
        (min_node(state, depth, alpha, beta, stats), Vec::new())
    }
}

fn max_node(
    state: &GameState,
    depth: u8,
    mut alpha: i32,
    beta: i32,
    stats: &mut SearchStats,
) -> (i32, Vec<Direction>) {
    let mut best = LOSS_SCORE;
    let mut best_moves = Vec::new();

    for dir in Direction::all() {
        let child = apply_agent_move(state, dir);
        let (value, _) = alpha_beta_node(&child, depth - 1, alpha, beta, false, stats);

        if value > best {
            best = value;
            best_moves.clear();
            best_moves.push(dir);
        } else if value == best {
            best_moves.push(dir);
        }

        alpha = alpha.max(value);
        if beta <= alpha {
            stats.cutoffs += 1;
            profiler::record_cutoff();
            break;
        }
    }

    (best, best_moves)
}

fn min_node(state: &GameState, depth: u8, alpha: i32, mut beta: i32, stats: &mut SearchStats) -> i32 {
    let mut worst = WIN_SCORE;

    for joint in joint_moves(state.pursuers().len()) {
        let child = apply_pursuer_moves(state, &joint);
        let (value, _) = alpha_beta_node(&child, depth - 1, alpha, beta, true, stats);

        worst = worst.min(value);
        beta = beta.min(value);
        if beta <= alpha {
            stats.cutoffs += 1;
            profiler::record_cutoff();
            break;
        }
    }

    worst
}

/// Plain minimax without pruning. Same values as the alpha-beta search,
/// at exponentially higher cost; used to check pruning.
pub fn minimax(state: &GameState, depth: u8, maximizing: bool) -> i32 {
    if depth == 0 || state.outcome().is_decided() {
        return evaluate(state);
    }

    if maximizing {
        Direction::all()
            .into_iter()
            .map(|dir| minimax(&apply_agent_move(state, dir), depth - 1, false))
            .max()
            .unwrap_or(LOSS_SCORE)
    } else {
        joint_moves(state.pursuers().len())
            .iter()
            .map(|joint| minimax(&apply_pursuer_moves(state, joint), depth - 1, true))
            .min()
            .unwrap_or(WIN_SCORE)
    }
}

/// Searches root children concurrently, each with a full window.
///
/// Returns the same value as the sequential search. Because no child
/// inherits a raised alpha, the tie set holds exactly the children whose
/// true value equals the best.
fn parallel_root(state: &GameState, depth: u8) -> (i32, Vec<Direction>, SearchStats) {
    let children: Vec<(Direction, i32, SearchStats)> = Direction::all()
        .par_iter()
        .map(|&dir| {
            let mut stats = SearchStats::default();
            let child = apply_agent_move(state, dir);
            let (value, _) =
                alpha_beta_node(&child, depth - 1, LOSS_SCORE, WIN_SCORE, false, &mut stats);
            profiler::merge_thread_local();
            (dir, value, stats)
        })
        .collect();

    let mut stats = SearchStats {
        nodes: 1,
        cutoffs: 0,
    };
    let best = children
        .iter()
        .map(|(_, value, _)| *value)
        .max()
        .unwrap_or(LOSS_SCORE);
    let mut candidates = Vec::new();
    for (dir, value, child_stats) in &children {
        stats.add(*child_stats);
        if *value == best {
            candidates.push(*dir);
        }
    }

    (best, candidates, stats)
}

/// Alpha-beta searcher holding the tie-break randomness source
pub struct Searcher<R: Rng> {
    rng: R,
}

impl Searcher<StdRng> {
    /// Searcher with a deterministic tie-break sequence
    pub fn seeded(seed: u64) -> Self {
        Searcher::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Searcher<R> {
    pub fn new(rng: R) -> Self {
        Searcher { rng }
    }

    /// Single alpha-beta call with explicit bounds.
    ///
    /// Maximizing calls return a uniformly chosen move among those tied for
    /// the best value; minimizing calls and leaves return None.
    pub fn alpha_beta(
        &mut self,
        state: &GameState,
        depth: u8,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> (i32, Option<Direction>) {
        let mut stats = SearchStats::default();
        let (value, candidates) =
            alpha_beta_node(state, depth, alpha, beta, maximizing, &mut stats);
        (value, candidates.choose(&mut self.rng).copied())
    }

    /// Root search for the agent with an open window
    pub fn search(&mut self, state: &GameState, depth: u8) -> SearchResult {
        let mut stats = SearchStats::default();
        let (value, candidates) =
            alpha_beta_node(state, depth, LOSS_SCORE, WIN_SCORE, true, &mut stats);
        profiler::merge_thread_local();
        self.finish(value, candidates, stats)
    }

    /// Root search with the four root children evaluated on the rayon pool
    pub fn search_parallel(&mut self, state: &GameState, depth: u8) -> SearchResult {
        if depth == 0 || state.outcome().is_decided() {
            return self.search(state, depth);
        }
        let (value, candidates, stats) = parallel_root(state, depth);
        self.finish(value, candidates, stats)
    }

    fn finish(&mut self, value: i32, candidates: Vec<Direction>, stats: SearchStats) -> SearchResult {
        let best_move = candidates.choose(&mut self.rng).copied();
        SearchResult {
            value,
            best_move,
            candidates,
            stats,
        }
    }
}
