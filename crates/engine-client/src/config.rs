//! Engine configuration from environment variables

use std::env;

/// Analysis settings for the external UCI engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Path to the engine binary
    pub engine_path: String,

    /// Search depth per position
    pub depth: u32,

    /// Number of parallel principal variations to request
    pub multi_pv: u32,

    /// Engine worker threads
    pub threads: u32,

    /// Transposition table size in MiB
    pub hash_mb: u32,

    /// Log engine traffic line by line
    pub debug: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            engine_path: "/usr/local/bin/stockfish".to_string(),
            depth: 18,
            multi_pv: 3,
            threads: 1,
            hash_mb: 256,
            debug: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or unparsable.
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            engine_path: env::var("ENGINE_PATH").unwrap_or(defaults.engine_path),
            depth: env_number("ENGINE_DEPTH").unwrap_or(defaults.depth),
            multi_pv: env_number("ENGINE_MULTIPV").unwrap_or(defaults.multi_pv),
            threads: env_number("ENGINE_THREADS").unwrap_or(defaults.threads),
            hash_mb: env_number("ENGINE_HASH_MB").unwrap_or(defaults.hash_mb),
            debug: env::var("ENGINE_DEBUG").is_ok(),
        }
    }
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
