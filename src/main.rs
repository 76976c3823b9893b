use log::{error, info};
use std::env;
use std::process;
use std::time::{Duration, Instant};

use pacman_minimax::config::Config;
use pacman_minimax::debug_logger::DebugLogger;
use pacman_minimax::profiler;
use pacman_minimax::session::{GameSummary, Session};
use pacman_minimax::types::Outcome;

#[tokio::main]
async fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }

    env_logger::init();

    info!("Starting Pacman...");

    // Load configuration once at startup
    let config = Config::load_or_default();
    if config.profiling.enabled {
        profiler::enable();
    }

    let state = match Session::load_board(&config) {
        Ok(state) => state,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    let logger = DebugLogger::new(config.debug.enabled, &config.debug.log_file_path).await;
    let turn_delay = Duration::from_millis(config.game.turn_delay_ms);
    let start_time = Instant::now();

    // The search is CPU bound; keep it off the async workers
    let game = tokio::task::spawn_blocking(move || {
        let mut session = Session::new(state, config, logger);
        println!("{}", session.state().grid());
        let summary = session.run(|record, state| {
            println!(
                "Turn {}: agent {} | pursuers {:?}",
                record.turn,
                record.agent_move.map(|d| d.as_str()).unwrap_or("none"),
                record.pursuer_moves
            );
            println!("{}", state.grid());
            println!("Score: {}\n", state.score());
            if !turn_delay.is_zero() {
                std::thread::sleep(turn_delay);
            }
        });
        (summary, session.into_logger())
    });

    let (summary, logger): (GameSummary, DebugLogger) = match game.await {
        Ok(result) => result,
        Err(e) => {
            error!("Game loop panicked: {}", e);
            process::exit(1);
        }
    };

    match summary.outcome {
        Outcome::Won => println!("You won! Final score: {}", summary.score),
        Outcome::Lost => println!("You lost! Final score: {}", summary.score),
        Outcome::Undecided => println!(
            "Stopped after {} turns without a result. Final score: {}",
            summary.turns, summary.score
        ),
    }

    profiler::merge_thread_local();
    profiler::print_report(start_time.elapsed().as_millis() as u64);

    logger.shutdown().await;
}
