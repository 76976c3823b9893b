// Library exports for the pursuit game engine
// This allows the replay tool, tests and benchmarks to use the core search logic

pub mod bot;
pub mod config;
pub mod debug_logger;
pub mod grid;
pub mod heuristic;
pub mod profiler;
pub mod replay;
pub mod rules;
pub mod search;
pub mod session;
pub mod state;
pub mod types;
