// Agent policy
//
// The Bot decides the agent's move each turn with the alpha-beta search and
// provides the pursuers' policy: an independent uniform random direction each.
// It never uses the search's minimizing layer to move the real pursuers.

use log::{debug, info};
use rand::seq::IndexedRandom;
use rand::Rng;
use std::time::Instant;

use crate::config::{Config, StrategyPreference};
use crate::search::{SearchStats, Searcher};
use crate::state::GameState;
use crate::types::Direction;

/// Execution strategy based on configuration and hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Children searched one by one in fixed order
    Sequential,
    /// Root children searched concurrently on the rayon pool
    ParallelRoot,
}

/// A decision for one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// None only when the state is already decided
    pub direction: Option<Direction>,
    pub value: i32,
    pub candidates: Vec<Direction>,
    pub stats: SearchStats,
    pub elapsed_ms: u128,
}

/// Search-driven agent with static configuration
pub struct Bot {
    config: Config,
    strategy: ExecutionStrategy,
}

impl Bot {
    /// Creates a new Bot instance with the given configuration
    ///
    /// # Arguments
    /// * `config` - Static configuration that does not change during the bot's lifetime
    pub fn new(config: Config) -> Self {
        let num_cpus = rayon::current_num_threads();
        let strategy = Self::determine_strategy(
            config.search.strategy,
            num_cpus,
            config.search.min_cpus_for_parallel,
        );
        info!(
            "Selected strategy: {:?} (depth={}, cpus={})",
            strategy, config.search.depth, num_cpus
        );
        Bot { config, strategy }
    }

    pub fn strategy(&self) -> ExecutionStrategy {
        self.strategy
    }

    pub fn depth(&self) -> u8 {
        self.config.search.depth
    }

    /// Determines the execution strategy based on preference and hardware
    pub fn determine_strategy(
        preference: StrategyPreference,
        num_cpus: usize,
        min_cpus_for_parallel: usize,
    ) -> ExecutionStrategy {
        match preference {
            StrategyPreference::Sequential => ExecutionStrategy::Sequential,
            StrategyPreference::ParallelRoot => ExecutionStrategy::ParallelRoot,
            StrategyPreference::Auto if num_cpus >= min_cpus_for_parallel => {
                ExecutionStrategy::ParallelRoot
            }
            StrategyPreference::Auto => ExecutionStrategy::Sequential,
        }
    }

    /// Searches the state at the configured depth and picks the agent move.
    /// Ties are broken with `rng`.
    pub fn decide<R: Rng>(&self, state: &GameState, rng: &mut R) -> Decision {
        let start_time = Instant::now();
        let depth = self.config.search.depth;

        let mut searcher = Searcher::new(rng);
        let result = match self.strategy {
            ExecutionStrategy::Sequential => searcher.search(state, depth),
            ExecutionStrategy::ParallelRoot => searcher.search_parallel(state, depth),
        };

        let elapsed_ms = start_time.elapsed().as_millis();
        debug!(
            "Candidates {:?} at value {} ({} nodes, {} cutoffs)",
            result.candidates, result.value, result.stats.nodes, result.stats.cutoffs
        );
        info!(
            "Chose {} (value: {}, depth: {}, time: {}ms)",
            result.best_move.map(|d| d.as_str()).unwrap_or("none"),
            result.value,
            depth,
            elapsed_ms
        );

        Decision {
            direction: result.best_move,
            value: result.value,
            candidates: result.candidates,
            stats: result.stats,
            elapsed_ms,
        }
    }
}

/// One independent, uniformly random direction per pursuer
pub fn random_pursuer_moves<R: Rng>(rng: &mut R, count: usize) -> Vec<Direction> {
    let all = Direction::all();
    // `all` is never empty, so every draw yields a direction
    (0..count).filter_map(|_| all.choose(rng).copied()).collect()
}
