// Transition rules and outcome detection
//
// Illegal moves are not errors: they return an unchanged copy of the input,
// because "doing nothing useful" is still a branch the search must explore.

use log::debug;

use crate::profile;
use crate::state::GameState;
use crate::types::{Cell, Direction, Outcome};

/// Score gained when the agent steps onto a pellet
pub const GOAL_REWARD: i32 = 10;

/// Score lost on every legal agent move
pub const MOVE_COST: i32 = 1;

/// Applies a single agent move and returns the resulting state.
///
/// A move is illegal when the target is off the board or a wall; the input
/// is then returned unchanged. Pursuer cells are not obstacles: walking into
/// one overwrites it and the pursuer count check reports the loss.
pub fn apply_agent_move(state: &GameState, dir: Direction) -> GameState {
    profile!("apply_move", {
        let mut next = state.clone();
        let from = match state.agent {
            Some(pos) => pos,
            None => return next,
        };

        let to = from.offset(dir);
        if !next.grid.passable(to) {
            return next;
        }

        if next.grid.get(to) == Some(Cell::Goal) {
            next.score += GOAL_REWARD;
        }
        next.score -= MOVE_COST;

        next.grid.set(to, Cell::Agent);
        next.grid.set(from, Cell::Empty);
        next.agent = Some(to);
        next.outcome = classify(&next);
        next
    })
}

/// Applies one direction per pursuer, in pursuer index order.
///
/// Each pursuer is processed against the grid as left by the pursuers before
/// it, so a cell vacated earlier in the same joint move can be entered by a
/// later pursuer, while a cell a later pursuer has not yet left cannot.
///
/// # Panics
/// Panics when `dirs` does not hold exactly one direction per pursuer.
pub fn apply_pursuer_moves(state: &GameState, dirs: &[Direction]) -> GameState {
    assert_eq!(
        dirs.len(),
        state.pursuers.len(),
        "joint move needs one direction per pursuer"
    );

    profile!("apply_move", {
        let mut next = state.clone();

        for (i, dir) in dirs.iter().enumerate() {
            let from = next.pursuers[i];
            let to = from.offset(*dir);

            let target = match next.grid.get(to) {
                Some(cell) => cell,
                None => continue,
            };
            if target == Cell::Wall || target.is_pursuer() {
                continue;
            }

            let vacated = match next.grid.get(from) {
                Some(Cell::PursuerOnGoal) => Cell::Goal,
                _ => Cell::Empty,
            };
            next.grid.set(from, vacated);

            let arrived = match target {
                Cell::Goal => Cell::PursuerOnGoal,
                _ => Cell::Pursuer,
            };
            if target == Cell::Agent {
                debug!("Pursuer {} captured the agent at {}", i, to);
                next.agent = None;
            }
            next.grid.set(to, arrived);
            next.pursuers[i] = to;
        }

        next.outcome = classify(&next);
        next
    })
}

/// Classifies a state from its grid alone.
///
/// Won when no pellet remains anywhere (also under pursuers). Otherwise Lost
/// when the board is inconsistent: not exactly one agent cell, or a pursuer
/// cell count different from the configured pursuer count. Capture shows up
/// here as a missing agent cell.
pub fn classify(state: &GameState) -> Outcome {
    let grid = &state.grid;

    if grid.count(|c| c.is_goal_bearing()) == 0 {
        return Outcome::Won;
    }

    let agents = grid.count(|c| c == Cell::Agent);
    let pursuers = grid.count(|c| c.is_pursuer());
    if agents != 1 || pursuers != state.pursuer_count {
        return Outcome::Lost;
    }

    Outcome::Undecided
}
