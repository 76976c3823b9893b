// Game session: the turn loop that drives a real game
//
// Each turn the agent moves by search, then the pursuers take one random
// joint move, then the state is classified. The game ends when it is decided
// or the turn limit is reached.

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;

use crate::bot::{random_pursuer_moves, Bot};
use crate::config::Config;
use crate::debug_logger::DebugLogger;
use crate::rules::{apply_agent_move, apply_pursuer_moves};
use crate::state::GameState;
use crate::types::{Direction, Outcome};

/// Built-in maze used when no board file is configured
pub const CLASSIC_BOARD: &str = include_str!("../boards/classic.txt");

/// What happened in one turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnRecord {
    pub turn: u32,
    pub agent_move: Option<Direction>,
    pub value: i32,
    pub candidates: Vec<Direction>,
    /// Empty when the agent's move already decided the game
    pub pursuer_moves: Vec<Direction>,
    pub score: i32,
    pub outcome: Outcome,
}

/// Final result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSummary {
    pub turns: u32,
    pub score: i32,
    pub outcome: Outcome,
}

pub struct Session {
    state: GameState,
    bot: Bot,
    rng: StdRng,
    logger: DebugLogger,
    turn: u32,
    max_turns: u32,
}

impl Session {
    pub fn new(state: GameState, config: Config, logger: DebugLogger) -> Self {
        let rng = match config.game.seed {
            Some(seed) => {
                info!("Using seed {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };
        let max_turns = config.game.max_turns;

        Session {
            state,
            bot: Bot::new(config),
            rng,
            logger,
            turn: 0,
            max_turns,
        }
    }

    /// Reads the configured board, or the built-in maze
    pub fn load_board(config: &Config) -> Result<GameState, String> {
        let text = match &config.game.board_path {
            Some(path) => fs::read_to_string(path)
                .map_err(|e| format!("Failed to read board file '{}': {}", path, e))?,
            None => CLASSIC_BOARD.to_string(),
        };
        GameState::parse(&text).map_err(|e| format!("Invalid board: {}", e))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn is_over(&self) -> bool {
        self.state.outcome().is_decided() || self.turn >= self.max_turns
    }

    /// Plays one turn. Returns None when the game is already decided.
    pub fn step(&mut self) -> Option<TurnRecord> {
        if self.state.outcome().is_decided() {
            return None;
        }

        let before = self.state.snapshot();
        let decision = self.bot.decide(&self.state, &mut self.rng);

        let mut next = match decision.direction {
            Some(dir) => apply_agent_move(&self.state, dir),
            None => self.state.clone(),
        };

        let mut pursuer_moves = Vec::new();
        if !next.outcome().is_decided() {
            pursuer_moves = random_pursuer_moves(&mut self.rng, next.pursuers().len());
            next = apply_pursuer_moves(&next, &pursuer_moves);
        }

        let record = TurnRecord {
            turn: self.turn,
            agent_move: decision.direction,
            value: decision.value,
            candidates: decision.candidates,
            pursuer_moves: pursuer_moves.clone(),
            score: next.score(),
            outcome: next.outcome(),
        };

        self.logger.log_turn(DebugLogger::entry(
            self.turn,
            before,
            decision.direction,
            pursuer_moves,
            next.score(),
            next.outcome(),
        ));

        self.state = next;
        self.turn += 1;
        Some(record)
    }

    /// Plays until the game is decided or the turn limit is hit, calling
    /// `on_turn` after every turn.
    pub fn run<F>(&mut self, mut on_turn: F) -> GameSummary
    where
        F: FnMut(&TurnRecord, &GameState),
    {
        while !self.is_over() {
            match self.step() {
                Some(record) => on_turn(&record, &self.state),
                None => break,
            }
        }

        let summary = self.summary();
        match summary.outcome {
            Outcome::Won => info!("Agent won in {} turns, score {}", summary.turns, summary.score),
            Outcome::Lost => info!("Agent lost after {} turns, score {}", summary.turns, summary.score),
            Outcome::Undecided => warn!(
                "Turn limit {} reached without a result, score {}",
                self.max_turns, summary.score
            ),
        }
        summary
    }

    pub fn summary(&self) -> GameSummary {
        GameSummary {
            turns: self.turn,
            score: self.state.score(),
            outcome: self.state.outcome(),
        }
    }

    /// Hands back the logger so the caller can await pending writes
    pub fn into_logger(self) -> DebugLogger {
        self.logger
    }
}
