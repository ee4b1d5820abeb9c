//! Search algorithms and move ordering.

pub mod control;
pub mod heuristics;
pub mod negamax;
pub mod ordering;
pub mod scheduler;
pub mod tt;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use chx_core::{Move, Position, apply_move};
use tracing::{debug, info};

use crate::book::OpeningBook;
use crate::config::{EngineConfig, MAX_DEPTH, SideDepths};
use crate::eval::EvalStrategy;
use control::{Aborted, CancelToken};
use heuristics::{HistoryTable, Line, PvRegister};
use negamax::{INF, MATE_THRESHOLD, Scored, SearchContext};
use scheduler::{RemoteBackend, RemoteWorker, SlotBudget};
use tt::TranspositionTable;

/// Initial MTD-f window half-width, in centipawns.
const MTDF_MARGIN: i32 = 4;

/// Missed MTD-f windows before falling back to the full remaining window.
const MTDF_MAX_MISSES: u32 = 4;

/// Which tree search drives a think call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SearchStrategy {
    /// Plain minimax: full windows, no pruning, no transposition table.
    Minimax,
    /// Iterative-deepening alpha-beta.
    #[default]
    AlphaBeta,
    /// Iterative deepening with MTD-f narrow-window re-searches.
    Mtdf,
}

impl SearchStrategy {
    pub const fn name(self) -> &'static str {
        match self {
            SearchStrategy::Minimax => "minimax",
            SearchStrategy::AlphaBeta => "alphabeta",
            SearchStrategy::Mtdf => "mtdf",
        }
    }
}

impl fmt::Display for SearchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a completed search.
#[derive(Debug, Clone, Default)]
pub struct SearchResult {
    /// Best move at the deepest completed iteration; `None` when the root
    /// has no legal move or no iteration completed.
    pub best_move: Option<Move>,
    /// Evaluation score in centipawns from the mover's perspective.
    pub score: i32,
    /// Principal variation of the deepest completed iteration.
    pub pv: Vec<Move>,
    /// Depth reached.
    pub depth: u8,
    /// Search and quiescence nodes visited, across all threads.
    pub nodes: u64,
}

struct Remote {
    worker: Box<dyn RemoteWorker>,
    slots: usize,
}

/// Iterative-deepening searcher owning the transposition table and the
/// shared ordering state.
pub struct Engine {
    config: EngineConfig,
    tt: TranspositionTable,
    history: HistoryTable,
    pv: PvRegister,
    remote: Option<Remote>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            tt: TranspositionTable::new(config.tt_buckets),
            history: HistoryTable::new(),
            pv: PvRegister::new(),
            remote: None,
            config,
        }
    }

    /// Attach a remote backend used when every thread slot is busy.
    pub fn with_remote(mut self, worker: impl RemoteWorker + 'static, slots: usize) -> Self {
        self.remote = Some(Remote {
            worker: Box::new(worker),
            slots,
        });
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable access; changes apply from the next think call.
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    /// Search `position` to `depth` plies (clamped to `1..=MAX_DEPTH`).
    pub fn think(&mut self, position: &Position, depth: u8) -> SearchResult {
        self.think_with_stop(position, depth, &CancelToken::new())
    }

    /// As [`think`](Self::think), abandoning the search once `stop` is
    /// cancelled. The last completed iteration is returned.
    pub fn think_with_stop(&mut self, position: &Position, depth: u8, stop: &CancelToken) -> SearchResult {
        let start = Instant::now();
        let target = depth.clamp(1, MAX_DEPTH);
        self.prepare();

        let strategy = self.config.search;
        let prune = strategy != SearchStrategy::Minimax;
        let nodes = AtomicU64::new(0);
        let threads = SlotBudget::new(self.config.threads);
        let remote_slots = SlotBudget::new(self.remote.as_ref().map_or(0, |r| r.slots));
        let ctx = SearchContext {
            tt: (prune && self.config.use_tt).then_some(&self.tt),
            history: &self.history,
            pv: &self.pv,
            nodes: &nodes,
            threads: &threads,
            remote: self.remote.as_ref().map(|r| RemoteBackend {
                worker: r.worker.as_ref(),
                slots: &remote_slots,
            }),
            eval: self.config.eval,
            prune,
            parallel_min_depth: self.config.parallel_min_depth.max(1),
            max_pending: self.config.max_pending_tasks.max(1),
        };

        let mut root = position.clone();
        root.reset_ply();

        let mut result = SearchResult::default();
        // Minimax has no use for shallower passes: nothing orders its moves.
        let first = if prune { 1 } else { target };
        for d in first..=target {
            let outcome = match strategy {
                SearchStrategy::Mtdf if d > 1 => mtdf(&ctx, &root, result.score, d, stop),
                _ => ctx.search(&root, d, -INF, INF, stop),
            };
            let Ok(scored) = outcome else {
                debug!(depth = d, "iteration aborted");
                break;
            };

            self.pv.publish(&scored.line);
            result = SearchResult {
                best_move: scored.line.first(),
                score: scored.score,
                pv: scored.line.as_slice().to_vec(),
                depth: d,
                nodes: nodes.load(Ordering::Relaxed),
            };
            debug!(
                depth = d,
                score = result.score,
                nodes = result.nodes,
                pv = %format_line(&result.pv),
                "iteration complete"
            );

            // Deeper search cannot improve on a forced mate.
            if scored.score.abs() > MATE_THRESHOLD {
                break;
            }
        }
        result.nodes = nodes.load(Ordering::Relaxed);

        info!(
            best = %result.best_move.map_or_else(|| "none".to_string(), |m| m.to_string()),
            score = result.score,
            depth = result.depth,
            nodes = result.nodes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            strategy = %strategy,
            "search finished"
        );
        result
    }

    /// Pick a move for the side to move: a legal book reply if the book
    /// has one for `history`, otherwise a search at that side's depth.
    pub fn choose_move(&mut self, position: &Position, history: &[Move], book: &dyn OpeningBook) -> Option<Move> {
        if let Some(mv) = book.book_move(history) {
            if apply_move(position, mv).is_ok() {
                debug!(%mv, "book move");
                return Some(mv);
            }
            debug!(%mv, "book move is illegal here, searching instead");
        }
        let depth = self.config.depth.for_side(position.side_to_move());
        self.think(position, depth).best_move
    }

    /// Reset per-think state, resizing the table if the config changed.
    fn prepare(&mut self) {
        let buckets = self.config.tt_buckets.max(1);
        if self.tt.len() == buckets {
            self.tt.clear();
        } else {
            self.tt = TranspositionTable::new(buckets);
        }
        self.history.clear();
        self.pv.clear();
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Search `position` with a fresh engine and return the move to play.
///
/// The side to move searches to its entry in `per_side_depth`. Returns
/// `None` only when the position has no legal move.
pub fn find_best_move(
    position: &Position,
    per_side_depth: SideDepths,
    search: SearchStrategy,
    eval: EvalStrategy,
) -> Option<Move> {
    let config = EngineConfig {
        search,
        eval,
        depth: per_side_depth,
        ..EngineConfig::default()
    };
    let depth = per_side_depth.for_side(position.side_to_move());
    Engine::new(config).think(position, depth).best_move
}

/// MTD-f: converge on the root score with narrow-window searches around
/// `guess`.
///
/// The window half-width starts at [`MTDF_MARGIN`] and doubles on every
/// miss; after [`MTDF_MAX_MISSES`] misses the whole remaining
/// `[lower, upper]` range is searched. The returned line comes from the
/// last pass that did not fail low, since a fail-low root proves nothing
/// about its move.
fn mtdf(ctx: &SearchContext<'_>, root: &Position, guess: i32, depth: u8, stop: &CancelToken) -> Result<Scored, Aborted> {
    let mut lower = -INF;
    let mut upper = INF;
    let mut g = guess.clamp(-INF, INF);
    let mut margin = MTDF_MARGIN;
    let mut misses = 0;
    let mut line = Line::new();

    while lower < upper {
        let (alpha, beta) = if misses >= MTDF_MAX_MISSES {
            ((lower - 1).max(-INF), (upper + 1).min(INF))
        } else {
            ((g - margin).max(lower - 1), (g + margin).min(upper + 1))
        };

        let scored = ctx.search(root, depth, alpha, beta, stop)?;
        g = scored.score;
        debug!(depth, alpha, beta, score = g, "mtdf pass");

        if g <= alpha {
            upper = g;
        } else {
            line = scored.line;
            lower = g;
            if g < beta {
                upper = g;
            }
        }

        if g <= alpha || g >= beta {
            misses += 1;
            margin = margin.saturating_mul(2);
        }
        if lower > upper {
            // Inconsistent bounds from path-dependent draws; trust the last pass.
            break;
        }
    }

    if line.is_empty() {
        // Every pass failed low, so no move was ever proven; search once in full.
        return ctx.search(root, depth, -INF, INF, stop);
    }
    Ok(Scored { score: g, line })
}

fn format_line(line: &[Move]) -> String {
    line.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" ")
}
