// Heuristic evaluation
//
// value = score - distance to nearest uncontested pellet - 5 * isolated pellets,
// with the integer extremes standing in for decided games.

use std::collections::{HashSet, VecDeque};

use crate::grid::Grid;
use crate::profile;
use crate::state::GameState;
use crate::types::{Cell, Outcome};

/// Value of a won state; larger than any reachable score
pub const WIN_SCORE: i32 = i32::MAX;

/// Value of a lost state; smaller than any reachable score
pub const LOSS_SCORE: i32 = i32::MIN;

/// Penalty per pellet that has no pellet next to it
pub const ISOLATED_GOAL_PENALTY: i32 = 5;

/// Breadth-first distance from the agent to the nearest `Goal` cell.
///
/// Walls block; pursuer cells do not. A pellet under a pursuer does not
/// count as a target. When no pellet is reachable, or the agent is gone,
/// the grid's cell count is returned so the result stays usable in
/// arithmetic.
pub fn shortest_path_to_goal(state: &GameState) -> i32 {
    profile!("shortest_path", {
        let grid = &state.grid;
        let sentinel = i32::try_from(grid.cell_count()).unwrap_or(i32::MAX);

        let start = match state.agent {
            Some(pos) => pos,
            None => return sentinel,
        };

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back((start, 0));

        while let Some((pos, distance)) = queue.pop_front() {
            if grid.get(pos) == Some(Cell::Goal) {
                return distance;
            }

            for next in grid.neighbors(pos) {
                if grid.passable(next) && visited.insert(next) {
                    queue.push_back((next, distance + 1));
                }
            }
        }

        sentinel
    })
}

/// Counts `Goal` cells none of whose 4-neighbours is a `Goal` cell
pub fn count_isolated_goals(grid: &Grid) -> i32 {
    grid.iter()
        .filter(|(_, cell)| *cell == Cell::Goal)
        .filter(|(pos, _)| {
            !grid
                .neighbors(*pos)
                .any(|n| grid.get(n) == Some(Cell::Goal))
        })
        .count() as i32
}

/// Scores a classified state from the agent's point of view
pub fn evaluate(state: &GameState) -> i32 {
    profile!("eval", {
        match state.outcome {
            Outcome::Won => WIN_SCORE,
            Outcome::Lost => LOSS_SCORE,
            Outcome::Undecided => {
                state.score
                    - shortest_path_to_goal(state)
                    - ISOLATED_GOAL_PENALTY * count_isolated_goals(&state.grid)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{apply_agent_move, apply_pursuer_moves};
    use crate::types::Direction;

    fn board(text: &str) -> GameState {
        GameState::parse(text).unwrap()
    }

    #[test]
    fn test_shortest_path_straight_line() {
        let state = board("P__.\n____\nG___\n");
        assert_eq!(shortest_path_to_goal(&state), 3);
    }

    #[test]
    fn test_shortest_path_routes_around_walls() {
        let state = board("P#.\n_#_\n___\n");
        assert_eq!(shortest_path_to_goal(&state), 6);
    }

    #[test]
    fn test_shortest_path_passes_through_pursuers() {
        let state = board("PG.\n###\n");
        assert_eq!(shortest_path_to_goal(&state), 2);
    }

    #[test]
    fn test_unreachable_goal_returns_cell_count() {
        let state = board("P#.\n_#_\nG#_\n");
        assert_eq!(shortest_path_to_goal(&state), 9);
    }

    #[test]
    fn test_pellet_under_pursuer_is_not_a_target() {
        let state = board("P_g\n###\n");
        assert_eq!(shortest_path_to_goal(&state), 6);
    }

    #[test]
    fn test_captured_agent_returns_cell_count() {
        let state = board("PG.\n___\n");
        let captured = apply_pursuer_moves(&state, &[Direction::Left]);
        assert_eq!(shortest_path_to_goal(&captured), 6);
    }

    #[test]
    fn test_isolated_goals() {
        let grid = Grid::parse(".._.\n____\n.__g\n").unwrap();
        // (0,3) and (2,0) stand alone, the (0,0)-(0,1) pair does not,
        // and the pellet under the pursuer does not count as a neighbour
        assert_eq!(count_isolated_goals(&grid), 2);
    }

    #[test]
    fn test_evaluate_combines_terms() {
        let state = board("P_.\n___\n._G\n");
        // score 0, distance 2, two isolated pellets
        assert_eq!(evaluate(&state), -2 - 10);
        let moved = apply_agent_move(&state, Direction::Right);
        assert_eq!(evaluate(&moved), -1 - 1 - 10);
    }

    #[test]
    fn test_evaluate_terminal_states() {
        let won = apply_agent_move(&board("P.G\n"), Direction::Right);
        assert_eq!(evaluate(&won), WIN_SCORE);

        let lost = apply_pursuer_moves(&board("PG.\n"), &[Direction::Left]);
        assert_eq!(evaluate(&lost), LOSS_SCORE);
    }
}
