// End-to-end game scenarios
//
// Small hand-built boards checked through the public API: transitions,
// outcome classification, the path oracle and the agent's choice.

use pacman_minimax::heuristic::{evaluate, shortest_path_to_goal, LOSS_SCORE, WIN_SCORE};
use pacman_minimax::rules::{apply_agent_move, apply_pursuer_moves, classify};
use pacman_minimax::search::Searcher;
use pacman_minimax::state::GameState;
use pacman_minimax::types::{Cell, Direction, Outcome, Position};

fn board(text: &str) -> GameState {
    GameState::parse(text).unwrap()
}

#[test]
fn test_agent_starts_along_shortest_path() {
    // pellet two steps away in the far corner, pursuer in the opposite corner
    let state = board(".__\n_P_\n__G\n");

    for seed in 0..8 {
        let result = Searcher::seeded(seed).search(&state, 2);
        assert_eq!(result.candidates, vec![Direction::Up, Direction::Left]);
        assert!(
            result.candidates.contains(&result.best_move.unwrap()),
            "seed {} picked {:?}",
            seed,
            result.best_move
        );
    }
}

#[test]
fn test_walled_off_pursuer_does_not_change_the_choice() {
    // same pellet geometry, but the pursuer sits behind a wall column
    let state = board(".__#G\n_P_#_\n___#_\n");

    for seed in 0..8 {
        let result = Searcher::seeded(seed).search(&state, 2);
        assert_eq!(result.value, -7);
        assert_eq!(result.candidates, vec![Direction::Up, Direction::Left]);
        assert!(result.candidates.contains(&result.best_move.unwrap()));
    }

    // the pursuer's reply never matters: every joint move scores the same
    let after_up = apply_agent_move(&state, Direction::Up);
    for dir in Direction::all() {
        let replied = apply_pursuer_moves(&after_up, &[dir]);
        assert_eq!(evaluate(&replied), -7);
    }
}

#[test]
fn test_agent_never_walks_away_from_pellet() {
    let state = board(".__\n_P_\n__G\n");
    for seed in 0..16 {
        let result = Searcher::seeded(seed).search(&state, 2);
        let chosen = result.best_move.unwrap();
        assert_ne!(chosen, Direction::Down);
        assert_ne!(chosen, Direction::Right);
    }
}

#[test]
fn test_board_without_pellets_is_won() {
    let state = board("P_#\n__G\n");
    assert_eq!(state.goals_remaining(), 0);
    assert_eq!(classify(&state), Outcome::Won);
    assert_eq!(state.outcome(), Outcome::Won);
    assert_eq!(evaluate(&state), WIN_SCORE);
}

#[test]
fn test_pursuer_onto_agent_is_lost() {
    let state = board("PG.\n");
    let next = apply_pursuer_moves(&state, &[Direction::Left]);

    assert!(next.is_captured());
    assert_eq!(next.agent(), None);
    assert_eq!(next.grid().get(Position::new(0, 0)), Some(Cell::Pursuer));
    assert_eq!(classify(&next), Outcome::Lost);
    assert_eq!(evaluate(&next), LOSS_SCORE);
}

#[test]
fn test_blocked_agent_moves_leave_state_unchanged() {
    let state = board("P#.\n__G\n");
    assert_eq!(apply_agent_move(&state, Direction::Up), state);
    assert_eq!(apply_agent_move(&state, Direction::Left), state);
    assert_eq!(apply_agent_move(&state, Direction::Right), state);

    let moved = apply_agent_move(&state, Direction::Down);
    assert_ne!(moved, state);
    assert_eq!(moved.score(), -1);
}

#[test]
fn test_unreachable_pellet_gives_sentinel_distance() {
    let state = board("P_#.\n__#_\nG_#_\n");
    assert_eq!(shortest_path_to_goal(&state), 12);
    assert_eq!(state.outcome(), Outcome::Undecided);
}

#[test]
fn test_eating_scores_nine() {
    let state = board("P.\nG_\n");
    let next = apply_agent_move(&state, Direction::Right);
    assert_eq!(next.score(), 9);
    assert_eq!(next.outcome(), Outcome::Won);
}

#[test]
fn test_agent_takes_pellet_directly_above() {
    let state = board(".\nP\n#\nG\n");
    let result = Searcher::seeded(0).search(&state, 3);
    assert_eq!(result.value, WIN_SCORE);
    assert_eq!(result.best_move, Some(Direction::Up));
}
