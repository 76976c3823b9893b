// Replay module for analyzing logged games and debugging decision-making
//
// This module provides functionality to:
// 1. Parse JSONL debug logs
// 2. Re-run the search on each logged position
// 3. Check the logged move is among the re-computed best moves
// 4. Check the logged moves reproduce the logged score and outcome

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::bot::Bot;
use crate::config::Config;
use crate::debug_logger::DebugLogEntry;
use crate::rules::{apply_agent_move, apply_pursuer_moves};
use crate::state::GameState;
use crate::types::Direction;

/// Result of replaying a single turn
#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub turn: u32,
    pub original_move: Option<Direction>,
    pub replayed_move: Option<Direction>,
    pub candidates: Vec<Direction>,
    /// Logged move is one of the re-computed best moves
    pub matches: bool,
    /// Logged moves reproduce the logged score and outcome
    pub consistent: bool,
    pub replayed_value: i32,
    pub search_depth: u8,
    pub computation_time_ms: u128,
}

/// Statistics for a complete replay session
#[derive(Debug, Default)]
pub struct ReplayStats {
    pub total_turns: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub inconsistent: usize,
    pub match_rate: f64,
}

/// Replay engine for analyzing debug logs
pub struct ReplayEngine {
    bot: Bot,
    verbose: bool,
}

impl ReplayEngine {
    /// Creates a new replay engine with the given configuration
    pub fn new(config: Config, verbose: bool) -> Self {
        ReplayEngine {
            bot: Bot::new(config),
            verbose,
        }
    }

    /// Loads all log entries from a JSONL file
    pub fn load_log_file<P: AsRef<Path>>(&self, log_path: P) -> Result<Vec<DebugLogEntry>, String> {
        let file = File::open(log_path.as_ref())
            .map_err(|e| format!("Failed to open log file: {}", e))?;

        let reader = BufReader::new(file);
        let mut entries = Vec::new();

        for (line_num, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| format!("Failed to read line {}: {}", line_num + 1, e))?;

            if line.trim().is_empty() {
                continue;
            }

            let entry: DebugLogEntry = serde_json::from_str(&line)
                .map_err(|e| format!("Failed to parse JSON on line {}: {}", line_num + 1, e))?;

            entries.push(entry);
        }

        info!("Loaded {} log entries", entries.len());
        Ok(entries)
    }

    /// Replays a single log entry and compares the result
    pub fn replay_entry(&self, entry: &DebugLogEntry) -> Result<ReplayResult, String> {
        if self.verbose {
            info!("Replaying turn {}...", entry.turn);
        }

        let state = GameState::from_snapshot(&entry.snapshot)
            .map_err(|e| format!("Turn {}: invalid snapshot: {}", entry.turn, e))?;

        let mut rng = StdRng::seed_from_u64(u64::from(entry.turn));
        let decision = self.bot.decide(&state, &mut rng);

        let matches = match entry.chosen_move {
            Some(dir) => decision.candidates.contains(&dir),
            None => decision.direction.is_none(),
        };
        let consistent = Self::check_transition(&state, entry);

        let result = ReplayResult {
            turn: entry.turn,
            original_move: entry.chosen_move,
            replayed_move: decision.direction,
            candidates: decision.candidates,
            matches,
            consistent,
            replayed_value: decision.value,
            search_depth: self.bot.depth(),
            computation_time_ms: decision.elapsed_ms,
        };

        if self.verbose {
            if matches {
                info!(
                    "Turn {}: ✓ MATCH - {} among {:?} (value: {}, time: {}ms)",
                    entry.turn,
                    Self::move_name(entry.chosen_move),
                    result.candidates,
                    result.replayed_value,
                    result.computation_time_ms
                );
            } else {
                warn!(
                    "Turn {}: ✗ MISMATCH - Original: {}, Best now: {:?} (value: {}, time: {}ms)",
                    entry.turn,
                    Self::move_name(entry.chosen_move),
                    result.candidates,
                    result.replayed_value,
                    result.computation_time_ms
                );
            }
            if !consistent {
                warn!(
                    "Turn {}: logged moves do not reproduce score {} / outcome {}",
                    entry.turn,
                    entry.score,
                    entry.outcome.as_str()
                );
            }
        }

        Ok(result)
    }

    /// Applies the logged moves and compares with the logged result
    fn check_transition(state: &GameState, entry: &DebugLogEntry) -> bool {
        let mut next = match entry.chosen_move {
            Some(dir) => apply_agent_move(state, dir),
            None => state.clone(),
        };
        if !entry.pursuer_moves.is_empty() {
            if entry.pursuer_moves.len() != next.pursuers().len() {
                return false;
            }
            next = apply_pursuer_moves(&next, &entry.pursuer_moves);
        }
        next.score() == entry.score && next.outcome() == entry.outcome
    }

    /// Replays all entries in a log file
    pub fn replay_all(&self, entries: &[DebugLogEntry]) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for entry in entries {
            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", entry.turn, e);
                }
            }
        }

        Ok(results)
    }

    /// Replays specific turns from a log file
    pub fn replay_turns(
        &self,
        entries: &[DebugLogEntry],
        turn_numbers: &[u32],
    ) -> Result<Vec<ReplayResult>, String> {
        let mut results = Vec::new();

        for turn_num in turn_numbers {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn_num)
                .ok_or_else(|| format!("Turn {} not found in log file", turn_num))?;

            match self.replay_entry(entry) {
                Ok(result) => results.push(result),
                Err(e) => {
                    warn!("Failed to replay turn {}: {}", turn_num, e);
                }
            }
        }

        Ok(results)
    }

    /// Generates statistics from replay results
    pub fn generate_stats(&self, results: &[ReplayResult]) -> ReplayStats {
        let total_turns = results.len();
        let matches = results.iter().filter(|r| r.matches).count();
        let inconsistent = results.iter().filter(|r| !r.consistent).count();
        let mismatches = total_turns - matches;
        let match_rate = if total_turns > 0 {
            (matches as f64 / total_turns as f64) * 100.0
        } else {
            0.0
        };

        ReplayStats {
            total_turns,
            matches,
            mismatches,
            inconsistent,
            match_rate,
        }
    }

    /// Prints a detailed report of replay results
    pub fn print_report(&self, results: &[ReplayResult]) {
        let stats = self.generate_stats(results);

        println!("\n═══════════════════════════════════════════════════════════");
        println!("                    REPLAY REPORT");
        println!("═══════════════════════════════════════════════════════════");
        println!("Total Turns:    {}", stats.total_turns);
        println!("Matches:        {} ({:.1}%)", stats.matches, stats.match_rate);
        println!("Mismatches:     {}", stats.mismatches);
        println!("Inconsistent:   {}", stats.inconsistent);
        println!("═══════════════════════════════════════════════════════════\n");

        if !results.is_empty() {
            let avg_time: f64 = results
                .iter()
                .map(|r| r.computation_time_ms as f64)
                .sum::<f64>()
                / results.len() as f64;

            println!("Search Depth:               {}", self.bot.depth());
            println!("Average Computation Time:   {:.1}ms\n", avg_time);
        }

        let mismatches: Vec<_> = results.iter().filter(|r| !r.matches).collect();
        if !mismatches.is_empty() {
            println!("═══════════════════════════════════════════════════════════");
            println!("                  DETAILED MISMATCHES");
            println!("═══════════════════════════════════════════════════════════");

            for result in mismatches {
                println!(
                    "Turn {}: {} → {:?} (value: {}, time: {}ms)",
                    result.turn,
                    Self::move_name(result.original_move),
                    result.candidates,
                    result.replayed_value,
                    result.computation_time_ms
                );
            }
            println!();
        }
    }

    /// Validates that specific expected moves were made
    pub fn validate_expected_moves(
        &self,
        entries: &[DebugLogEntry],
        expected_moves: &[(u32, Vec<Direction>)], // (turn, acceptable_moves)
    ) -> Result<(), String> {
        for (turn, acceptable) in expected_moves {
            let entry = entries
                .iter()
                .find(|e| e.turn == *turn)
                .ok_or_else(|| format!("Turn {} not found in log", turn))?;

            let actual_move = entry
                .chosen_move
                .ok_or_else(|| format!("Turn {}: no move was logged", turn))?;

            if !acceptable.contains(&actual_move) {
                return Err(format!(
                    "Turn {}: Expected one of {:?}, but got {}",
                    turn,
                    acceptable.iter().map(|d| d.as_str()).collect::<Vec<_>>(),
                    actual_move.as_str()
                ));
            }
        }

        Ok(())
    }

    fn move_name(dir: Option<Direction>) -> &'static str {
        dir.map(|d| d.as_str()).unwrap_or("none")
    }
}
