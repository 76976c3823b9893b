// Configuration module for reading Pacman.toml

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Main configuration structure containing all tunable parameters
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub search: SearchConfig,
    pub game: GameConfig,
    pub debug: DebugConfig,
    pub profiling: ProfilingConfig,
}

/// How the root of the search is evaluated
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrategyPreference {
    /// Single-threaded, children in fixed order
    Sequential,
    /// Root children on the rayon pool
    ParallelRoot,
    /// ParallelRoot when enough CPUs are available
    Auto,
}

/// Search constants
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SearchConfig {
    /// Plies searched per agent decision (agent and pursuer turns each count)
    pub depth: u8,
    pub strategy: StrategyPreference,
    pub min_cpus_for_parallel: usize,
}

/// Driving loop settings
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct GameConfig {
    pub max_turns: u32,
    /// Seed for tie-breaks and the pursuer random walk; entropy when absent
    pub seed: Option<u64>,
    /// Text board to play; the built-in maze when absent
    pub board_path: Option<String>,
    pub turn_delay_ms: u64,
}

/// Debug configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct DebugConfig {
    pub enabled: bool,
    pub log_file_path: String,
}

/// Performance profiling configuration
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProfilingConfig {
    pub enabled: bool,
}

impl Config {
    /// Loads configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the Pacman.toml configuration file
    ///
    /// # Returns
    /// * `Result<Config, String>` - Parsed configuration or error message
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, String> {
        let config: Config =
            toml::from_str(contents).map_err(|e| format!("Failed to parse config file: {}", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads default configuration from Pacman.toml in the working directory
    pub fn load_default() -> Result<Self, String> {
        Self::from_file("Pacman.toml")
    }

    /// Creates a configuration with hardcoded default values as fallback
    /// This should match the constants defined in Pacman.toml
    pub fn default_hardcoded() -> Self {
        Config {
            search: SearchConfig {
                depth: 3,
                strategy: StrategyPreference::Sequential,
                min_cpus_for_parallel: 2,
            },
            game: GameConfig {
                max_turns: 1000,
                seed: None,
                board_path: None,
                turn_delay_ms: 0,
            },
            debug: DebugConfig {
                enabled: false,
                log_file_path: "pacman_debug.jsonl".to_string(),
            },
            profiling: ProfilingConfig { enabled: false },
        }
    }

    /// Attempts to load from file, falls back to hardcoded defaults on error
    pub fn load_or_default() -> Self {
        Self::load_default().unwrap_or_else(|e| {
            eprintln!(
                "Warning: Could not load Pacman.toml ({}), using hardcoded defaults",
                e
            );
            Self::default_hardcoded()
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.search.depth == 0 {
            return Err("search.depth must be at least 1".to_string());
        }
        if self.debug.enabled && self.debug.log_file_path.trim().is_empty() {
            return Err("debug.log_file_path must be set when debug is enabled".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_can_be_created() {
        let config = Config::default_hardcoded();
        assert_eq!(config.search.depth, 3);
        assert_eq!(config.search.strategy, StrategyPreference::Sequential);
    }

    #[test]
    fn test_pacman_toml_can_be_parsed() {
        let result = Config::from_file("Pacman.toml");
        assert!(
            result.is_ok(),
            "Failed to parse Pacman.toml: {:?}",
            result.err()
        );
    }

    #[test]
    fn test_all_config_values_match_hardcoded_defaults() {
        let file_config = Config::from_file("Pacman.toml").expect("Pacman.toml should be parseable");
        assert_eq!(file_config, Config::default_hardcoded());
    }

    #[test]
    fn test_optional_game_fields() {
        let config = Config::from_toml_str(
            r#"
            [search]
            depth = 2
            strategy = "auto"
            min_cpus_for_parallel = 4

            [game]
            max_turns = 10
            seed = 99
            board_path = "boards/tiny.txt"
            turn_delay_ms = 5

            [debug]
            enabled = true
            log_file_path = "out.jsonl"

            [profiling]
            enabled = true
            "#,
        )
        .unwrap();
        assert_eq!(config.search.strategy, StrategyPreference::Auto);
        assert_eq!(config.game.seed, Some(99));
        assert_eq!(config.game.board_path.as_deref(), Some("boards/tiny.txt"));
    }

    #[test]
    fn test_zero_depth_is_rejected() {
        let mut text = fs::read_to_string("Pacman.toml").unwrap();
        text = text.replace("depth = 3", "depth = 0");
        assert!(Config::from_toml_str(&text).is_err());
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_file("nonexistent.toml");
        assert!(result.is_err());
    }
}
