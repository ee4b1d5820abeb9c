//! Search and evaluation for chx.

pub mod book;
pub mod config;
pub mod eval;
pub mod search;

pub use book::{BookError, LineBook, NoBook, OpeningBook};
pub use config::{ConfigError, EngineConfig, MAX_DEPTH, SideDepths, THREADS_ENV};
pub use eval::{EvalStrategy, evaluate};
pub use search::control::CancelToken;
pub use search::scheduler::{LoopbackWorker, RemoteWorker, SearchJob};
pub use search::{Engine, SearchResult, SearchStrategy, find_best_move};
