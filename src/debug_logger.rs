// Debug logging module for asynchronous game state logging
//
// Turn records are handed to a background writer task over a channel so the
// game loop never waits on disk. Each turn becomes one JSONL line.

use log::error;
use serde::{Deserialize, Serialize};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::state::Snapshot;
use crate::types::{Direction, Outcome};

/// Represents a single debug log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugLogEntry {
    pub turn: u32,
    /// State the agent decided from
    pub snapshot: Snapshot,
    pub chosen_move: Option<Direction>,
    pub pursuer_moves: Vec<Direction>,
    /// Score after both moves
    pub score: i32,
    /// Outcome after both moves
    pub outcome: Outcome,
    pub timestamp: String,
}

/// Handle to the background JSONL writer. Disabled loggers drop entries.
pub struct DebugLogger {
    sender: Option<mpsc::UnboundedSender<DebugLogEntry>>,
    writer: Option<JoinHandle<()>>,
}

impl DebugLogger {
    /// Creates a new debug logger
    /// If enabled is true, initializes the log file (truncating if it exists)
    pub async fn new(enabled: bool, log_file_path: &str) -> Self {
        if !enabled {
            return DebugLogger::disabled();
        }

        let file = match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_file_path)
            .await
        {
            Ok(file) => file,
            Err(e) => {
                error!("Failed to create debug log file '{}': {}", log_file_path, e);
                return DebugLogger::disabled();
            }
        };

        log::info!("Debug logging enabled: {}", log_file_path);
        let (sender, mut receiver) = mpsc::unbounded_channel::<DebugLogEntry>();

        let writer = tokio::spawn(async move {
            let mut file = file;
            while let Some(entry) = receiver.recv().await {
                let json_line = match serde_json::to_string(&entry) {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Failed to serialize debug log entry: {}", e);
                        continue;
                    }
                };
                if let Err(e) = file.write_all(format!("{}\n", json_line).as_bytes()).await {
                    error!("Failed to write debug log entry: {}", e);
                }
            }
            if let Err(e) = file.flush().await {
                error!("Failed to flush debug log: {}", e);
            }
        });

        DebugLogger {
            sender: Some(sender),
            writer: Some(writer),
        }
    }

    /// Creates a disabled debug logger (no-op)
    pub fn disabled() -> Self {
        DebugLogger {
            sender: None,
            writer: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sender.is_some()
    }

    /// Queues one turn for writing (fire-and-forget)
    pub fn log_turn(&self, entry: DebugLogEntry) {
        if let Some(sender) = &self.sender {
            if sender.send(entry).is_err() {
                error!("Debug log writer has stopped; dropping entry");
            }
        }
    }

    /// Builds an entry stamped with the current time
    pub fn entry(
        turn: u32,
        snapshot: Snapshot,
        chosen_move: Option<Direction>,
        pursuer_moves: Vec<Direction>,
        score: i32,
        outcome: Outcome,
    ) -> DebugLogEntry {
        DebugLogEntry {
            turn,
            snapshot,
            chosen_move,
            pursuer_moves,
            score,
            outcome,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Closes the channel and waits until every queued entry is on disk
    pub async fn shutdown(mut self) {
        self.sender.take();
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.await {
                error!("Debug log writer panicked: {}", e);
            }
        }
    }
}
