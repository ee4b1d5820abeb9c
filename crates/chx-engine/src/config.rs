//! Engine configuration: defaults, environment overrides, and strategy names.

use std::num::ParseIntError;
use std::str::FromStr;

use chx_core::Color;
use thiserror::Error;

use crate::eval::EvalStrategy;
use crate::search::SearchStrategy;
use crate::search::negamax::MAX_PLY;

/// Environment variable holding the number of parallel worker slots.
pub const THREADS_ENV: &str = "CHX_THREADS";

/// Deepest search the engine accepts, in plies.
pub const MAX_DEPTH: u8 = (MAX_PLY - 1) as u8;

/// Errors from building or editing an [`EngineConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("unknown search strategy `{0}` (expected minimax, alphabeta or mtdf)")]
    UnknownSearch(String),

    #[error("unknown evaluation `{0}` (expected simple or original)")]
    UnknownEval(String),

    #[error("search depth must be between 1 and {max}, got {depth}")]
    DepthOutOfRange { depth: u32, max: u8 },

    #[error("invalid {THREADS_ENV} value `{value}`")]
    InvalidThreads {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Search depth for each side, in plies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SideDepths {
    pub white: u8,
    pub black: u8,
}

impl SideDepths {
    /// The same depth for both sides.
    pub fn uniform(depth: u8) -> Result<Self, ConfigError> {
        let depth = check_depth(u32::from(depth))?;
        Ok(Self {
            white: depth,
            black: depth,
        })
    }

    pub fn for_side(&self, color: Color) -> u8 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Change one side's depth.
    pub fn set(&mut self, color: Color, depth: u32) -> Result<(), ConfigError> {
        let depth = check_depth(depth)?;
        match color {
            Color::White => self.white = depth,
            Color::Black => self.black = depth,
        }
        Ok(())
    }
}

impl Default for SideDepths {
    fn default() -> Self {
        Self { white: 3, black: 3 }
    }
}

fn check_depth(depth: u32) -> Result<u8, ConfigError> {
    match u8::try_from(depth) {
        Ok(d) if (1..=MAX_DEPTH).contains(&d) => Ok(d),
        _ => Err(ConfigError::DepthOutOfRange {
            depth,
            max: MAX_DEPTH,
        }),
    }
}

/// Everything that shapes a think call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Parallel worker slots; 0 searches serially on the calling thread.
    pub threads: usize,
    /// Remaining depth at which younger siblings may be dispatched.
    pub parallel_min_depth: u8,
    /// Dispatched siblings outstanding before a join barrier.
    pub max_pending_tasks: usize,
    pub tt_buckets: usize,
    pub use_tt: bool,
    pub search: SearchStrategy,
    pub eval: EvalStrategy,
    pub depth: SideDepths,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            threads: default_threads(),
            parallel_min_depth: 3,
            max_pending_tasks: 3,
            tt_buckets: 1 << 16,
            use_tt: true,
            search: SearchStrategy::AlphaBeta,
            eval: EvalStrategy::Original,
            depth: SideDepths::default(),
        }
    }
}

impl EngineConfig {
    /// Defaults, with `CHX_THREADS` applied when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(THREADS_ENV) {
            config.threads = parse_threads(&value)?;
        }
        Ok(config)
    }
}

/// One fewer than the available cores: the calling thread searches too.
fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(0)
}

fn parse_threads(value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|source| ConfigError::InvalidThreads {
            value: value.to_string(),
            source,
        })
}

impl FromStr for SearchStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" => Ok(SearchStrategy::Minimax),
            "alphabeta" | "alpha-beta" | "ab" => Ok(SearchStrategy::AlphaBeta),
            "mtdf" | "mtd-f" => Ok(SearchStrategy::Mtdf),
            _ => Err(ConfigError::UnknownSearch(s.to_string())),
        }
    }
}

impl FromStr for EvalStrategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        match s.to_ascii_lowercase().as_str() {
            "simple" => Ok(EvalStrategy::Simple),
            "original" => Ok(EvalStrategy::Original),
            _ => Err(ConfigError::UnknownEval(s.to_string())),
        }
    }
}
