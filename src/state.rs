// Game state module
//
// A GameState is a value: every transition clones it and mutates the copy,
// so search branches never share a grid.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::grid::{BoardError, Grid};
use crate::rules::classify;
use crate::types::{Cell, Outcome, Position};

/// Complete state of one game position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub(crate) grid: Grid,
    pub(crate) agent: Option<Position>,
    /// Index i of a joint move always applies to entry i
    pub(crate) pursuers: Vec<Position>,
    pub(crate) pursuer_count: usize,
    pub(crate) score: i32,
    pub(crate) outcome: Outcome,
}

/// Serializable form of a state, used by the debug log and replay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: Vec<String>,
    pub score: i32,
    pub pursuers: Vec<Position>,
}

impl GameState {
    /// Creates the initial state for a board.
    ///
    /// The grid is scanned row-major once; the scan order of pursuer cells
    /// becomes the pursuer index order for all later joint moves, and the
    /// number found is the pursuer count the outcome check expects.
    pub fn new(grid: Grid) -> Result<Self, BoardError> {
        let mut agents = Vec::new();
        let mut pursuers = Vec::new();
        for (pos, cell) in grid.iter() {
            match cell {
                Cell::Agent => agents.push(pos),
                Cell::Pursuer | Cell::PursuerOnGoal => pursuers.push(pos),
                Cell::Empty | Cell::Wall | Cell::Goal => {}
            }
        }

        if agents.len() != 1 {
            return Err(BoardError::AgentCount(agents.len()));
        }

        let mut state = GameState {
            grid,
            agent: Some(agents[0]),
            pursuer_count: pursuers.len(),
            pursuers,
            score: 0,
            outcome: Outcome::Undecided,
        };
        state.outcome = classify(&state);
        Ok(state)
    }

    /// Parses a text board and builds its initial state
    pub fn parse(text: &str) -> Result<Self, BoardError> {
        Self::new(Grid::parse(text)?)
    }

    /// Rebuilds a mid-game state, keeping the logged pursuer order
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, BoardError> {
        let mut state = Self::parse(&snapshot.rows.join("\n"))?;

        if snapshot.pursuers.len() != state.pursuers.len() {
            return Err(BoardError::PursuerCount {
                expected: state.pursuers.len(),
                got: snapshot.pursuers.len(),
            });
        }
        let on_board: HashSet<Position> = state.pursuers.iter().copied().collect();
        if let Some(stray) = snapshot.pursuers.iter().find(|p| !on_board.contains(p)) {
            return Err(BoardError::NotAPursuer(*stray));
        }
        let distinct: HashSet<Position> = snapshot.pursuers.iter().copied().collect();
        if distinct.len() != on_board.len() {
            return Err(BoardError::PursuerCount {
                expected: on_board.len(),
                got: distinct.len(),
            });
        }

        state.pursuers = snapshot.pursuers.clone();
        state.score = snapshot.score;
        Ok(state)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            rows: self.grid.rows(),
            score: self.score,
            pursuers: self.pursuers.clone(),
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Agent position; None once a pursuer has overwritten the agent
    pub fn agent(&self) -> Option<Position> {
        self.agent
    }

    pub fn pursuers(&self) -> &[Position] {
        &self.pursuers
    }

    /// Number of pursuers a consistent board must hold
    pub fn pursuer_count(&self) -> usize {
        self.pursuer_count
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// True once the agent has been overwritten by a pursuer
    pub fn is_captured(&self) -> bool {
        self.agent.is_none()
    }

    /// Pellets still on the board, including those under pursuers
    pub fn goals_remaining(&self) -> usize {
        self.grid.count(|c| c.is_goal_bearing())
    }
}
