// Full games written to a debug log and read back by the replay engine

use pacman_minimax::config::Config;
use pacman_minimax::debug_logger::DebugLogger;
use pacman_minimax::replay::ReplayEngine;
use pacman_minimax::session::Session;
use pacman_minimax::state::GameState;
use pacman_minimax::types::Outcome;

const BOARD: &str = "G.#..\n.....\n..P..\n.....\n..#.G\n";

fn test_config(seed: u64, max_turns: u32) -> Config {
    let mut config = Config::default_hardcoded();
    config.search.depth = 2;
    config.game.seed = Some(seed);
    config.game.max_turns = max_turns;
    config
}

#[tokio::test]
async fn test_logged_game_replays_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.jsonl");
    let path_str = path.to_str().unwrap();

    let config = test_config(42, 12);
    let logger = DebugLogger::new(true, path_str).await;
    let state = GameState::parse(BOARD).unwrap();
    let mut session = Session::new(state, config.clone(), logger);

    let mut played = Vec::new();
    let summary = session.run(|record, _| played.push(record.clone()));
    session.into_logger().shutdown().await;

    assert_eq!(summary.turns as usize, played.len());

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    assert_eq!(entries.len(), played.len());

    for (entry, record) in entries.iter().zip(&played) {
        assert_eq!(entry.turn, record.turn);
        assert_eq!(entry.chosen_move, record.agent_move);
        assert_eq!(entry.pursuer_moves, record.pursuer_moves);
        assert_eq!(entry.score, record.score);
        assert_eq!(entry.outcome, record.outcome);
    }

    let results = engine.replay_all(&entries).unwrap();
    assert_eq!(results.len(), entries.len());
    for result in &results {
        assert!(result.matches, "turn {} did not match", result.turn);
        assert!(result.consistent, "turn {} not reproducible", result.turn);
    }

    let stats = engine.generate_stats(&results);
    assert_eq!(stats.mismatches, 0);
    assert_eq!(stats.inconsistent, 0);
}

#[tokio::test]
async fn test_replay_selected_turns() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("game.jsonl");

    let config = test_config(7, 6);
    let logger = DebugLogger::new(true, path.to_str().unwrap()).await;
    let mut session = Session::new(GameState::parse(BOARD).unwrap(), config.clone(), logger);
    let summary = session.run(|_, _| {});
    session.into_logger().shutdown().await;
    assert!(summary.turns >= 1);

    let engine = ReplayEngine::new(config, true);
    let entries = engine.load_log_file(&path).unwrap();

    let results = engine.replay_turns(&entries, &[0]).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].turn, 0);
    assert_eq!(results[0].search_depth, 2);

    assert!(engine.replay_turns(&entries, &[999]).is_err());

    let first = entries[0].chosen_move.unwrap();
    assert!(engine
        .validate_expected_moves(&entries, &[(0, vec![first])])
        .is_ok());
}

#[tokio::test]
async fn test_won_game_ends_log() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("won.jsonl");

    let mut config = test_config(3, 50);
    config.search.depth = 3;
    let logger = DebugLogger::new(true, path.to_str().unwrap()).await;
    let state = GameState::parse(".\n_\nP\n#\nG\n").unwrap();
    let mut session = Session::new(state, config.clone(), logger);
    let summary = session.run(|_, _| {});
    session.into_logger().shutdown().await;

    assert_eq!(summary.outcome, Outcome::Won);
    assert_eq!(summary.turns, 2);

    let engine = ReplayEngine::new(config, false);
    let entries = engine.load_log_file(&path).unwrap();
    assert_eq!(entries.len(), summary.turns as usize);
    let last = entries.last().unwrap();
    assert_eq!(last.outcome, Outcome::Won);
    assert!(last.pursuer_moves.is_empty());
}

#[test]
fn test_missing_log_file_is_an_error() {
    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let err = engine.load_log_file("does/not/exist.jsonl").unwrap_err();
    assert!(err.contains("Failed to open log file"));
}

#[test]
fn test_malformed_log_line_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.jsonl");
    std::fs::write(&path, "{not json}\n").unwrap();

    let engine = ReplayEngine::new(Config::default_hardcoded(), false);
    let err = engine.load_log_file(&path).unwrap_err();
    assert!(err.contains("line 1"));
}
