//! Negamax alpha-beta search with quiescence and Young-Brothers-Wait
//! parallel dispatch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread::{self, Scope};

use chx_core::{Move, Position, generate_captures, generate_pseudo_legal};
use tracing::trace;

use crate::eval::{EvalStrategy, evaluate};
use crate::search::control::{Aborted, CancelToken};
use crate::search::heuristics::{HistoryTable, Line, PvRegister};
use crate::search::ordering::MovePicker;
use crate::search::scheduler::{RemoteBackend, SearchJob, SlotBudget, Task, join_worker};
use crate::search::tt::TranspositionTable;

/// Score representing an unreachable upper/lower bound.
pub const INF: i32 = 10_000;

/// Base score for checkmate (adjusted by ply for mate distance).
pub const MATE_SCORE: i32 = 10_000;

/// Scores above this threshold indicate a forced mate.
pub const MATE_THRESHOLD: i32 = 9_000;

/// Score of a drawn position.
pub const DRAW: i32 = 0;

/// Maximum search depth (in plies) for array sizing.
pub const MAX_PLY: usize = 64;

/// A node's score with the line that produced it.
#[derive(Debug, Clone, Copy)]
pub struct Scored {
    pub score: i32,
    pub line: Line,
}

impl Scored {
    pub fn leaf(score: i32) -> Self {
        Self {
            score,
            line: Line::new(),
        }
    }
}

/// Everything a search node reads besides its own position and window.
///
/// Shared by reference with every worker thread of a think call.
pub struct SearchContext<'a> {
    /// `None` disables probing and storing.
    pub tt: Option<&'a TranspositionTable>,
    pub history: &'a HistoryTable,
    pub pv: &'a PvRegister,
    pub nodes: &'a AtomicU64,
    pub threads: &'a SlotBudget,
    pub remote: Option<RemoteBackend<'a>>,
    pub eval: EvalStrategy,
    /// `false` searches plain minimax: full windows and no cutoffs.
    pub prune: bool,
    /// Remaining depth at which younger siblings may be dispatched.
    pub parallel_min_depth: u8,
    /// Dispatched siblings outstanding before the node joins them.
    pub max_pending: usize,
}

/// Running state of one node's move loop.
struct Node {
    alpha: i32,
    beta: i32,
    best: Scored,
    cutoff: bool,
}

impl Node {
    /// Merge a child's result. Returns `true` on a beta cutoff.
    fn absorb(&mut self, mv: Move, child: Scored, prune: bool) -> bool {
        let score = -child.score;
        if score > self.best.score {
            self.best = Scored {
                score,
                line: Line::extend(mv, &child.line),
            };
        }
        if prune && score > self.alpha {
            self.alpha = score;
        }
        self.cutoff = prune && self.alpha >= self.beta;
        self.cutoff
    }
}

impl SearchContext<'_> {
    /// Score `position` to `depth` plies within `(alpha, beta)`, from the
    /// side to move's point of view.
    ///
    /// Returns `Err(Aborted)` once `cancel` (or any ancestor token) fires;
    /// such a result must be discarded.
    pub fn search(
        &self,
        position: &Position,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        cancel: &CancelToken,
    ) -> Result<Scored, Aborted> {
        cancel.check()?;

        // Leaf: resolve captures first
        if depth == 0 {
            return self.quiesce(position, alpha, beta, cancel).map(Scored::leaf);
        }
        self.nodes.fetch_add(1, Ordering::Relaxed);

        let ply = position.ply();
        if ply > 0 && (position.is_fifty_move_draw() || position.is_repetition_draw()) {
            return Ok(Scored::leaf(DRAW));
        }

        // The root always searches so it has a move to report.
        if ply > 0
            && let Some(tt) = self.tt
            && let Some(bounds) = tt.probe(position, depth)
        {
            if bounds.lower >= beta {
                return Ok(Scored::leaf(bounds.lower));
            }
            if bounds.upper <= alpha {
                return Ok(Scored::leaf(bounds.upper));
            }
            alpha = alpha.max(bounds.lower);
            beta = beta.min(bounds.upper);
            if alpha >= beta {
                return Ok(Scored::leaf(alpha));
            }
        }

        let moves = generate_pseudo_legal(position);
        let history = (ply > 0).then_some(self.history);
        let mut picker = MovePicker::new(&moves, position, self.pv.get(ply), history);

        let mut node = Node {
            alpha,
            beta,
            best: Scored::leaf(-INF),
            cutoff: false,
        };
        let mut legal = 0usize;
        let siblings = cancel.child();

        thread::scope(|scope| -> Result<(), Aborted> {
            let mut pending: Vec<(Move, Task<'_>)> = Vec::with_capacity(self.max_pending);

            while let Some(mv) = picker.pick_next() {
                let Ok(child) = position.apply(mv) else {
                    continue;
                };
                legal += 1;

                // Young brothers wait: the eldest is always searched here.
                if legal > 1 && depth >= self.parallel_min_depth {
                    let task = self.dispatch(scope, child, depth - 1, -node.beta, -node.alpha, &siblings);
                    pending.push((mv, task));
                    if pending.len() >= self.max_pending {
                        self.join_pending(&mut pending, &mut node, depth, &siblings)?;
                    }
                } else {
                    let scored = self.search(&child, depth - 1, -node.beta, -node.alpha, &siblings)?;
                    self.merge(&mut node, mv, scored, depth, &siblings);
                }

                if node.cutoff {
                    break;
                }
            }
            self.join_pending(&mut pending, &mut node, depth, &siblings)
        })?;

        // No legal moves: checkmate or stalemate
        if legal == 0 {
            let score = if position.is_in_check(position.side_to_move()) {
                -MATE_SCORE + i32::from(ply)
            } else {
                DRAW
            };
            return Ok(Scored::leaf(score));
        }

        if let Some(tt) = self.tt {
            let best = node.best.score;
            let (lower, upper) = if best >= beta {
                (best, INF)
            } else if best <= alpha {
                (-INF, best)
            } else {
                (best, best)
            };
            tt.store(position, depth, lower, upper);
        }

        Ok(node.best)
    }

    /// Fold a finished child into `node`, cancelling outstanding siblings
    /// and rewarding the move on a cutoff.
    fn merge(&self, node: &mut Node, mv: Move, child: Scored, depth: u8, siblings: &CancelToken) {
        if node.absorb(mv, child, self.prune) {
            siblings.cancel();
            if !mv.is_noisy() {
                self.history.reward(mv, depth);
            }
        }
    }

    /// Join a batch of dispatched siblings in dispatch order.
    ///
    /// After a cutoff the remaining siblings are only waited for; their
    /// results are discarded.
    fn join_pending(
        &self,
        pending: &mut Vec<(Move, Task<'_>)>,
        node: &mut Node,
        depth: u8,
        siblings: &CancelToken,
    ) -> Result<(), Aborted> {
        for (mv, task) in pending.drain(..) {
            let result = match task {
                Task::Inline(_) if node.cutoff => continue,
                Task::Inline(child) => self.search(&child, depth - 1, -node.beta, -node.alpha, siblings),
                Task::Thread(handle) | Task::Remote(handle) => join_worker(handle),
            };
            if node.cutoff {
                trace!(%mv, depth, "discarded aborted sibling");
                continue;
            }
            // Siblings are only cancelled after a cutoff, so an abort here
            // came from an ancestor.
            let scored = result?;
            self.merge(node, mv, scored, depth, siblings);
        }
        Ok(())
    }

    /// Hand a younger sibling to the first backend with a free slot.
    fn dispatch<'scope, 'env>(
        &'env self,
        scope: &'scope Scope<'scope, 'env>,
        child: Position,
        depth: u8,
        alpha: i32,
        beta: i32,
        cancel: &'env CancelToken,
    ) -> Task<'scope> {
        if let Some(slot) = self.threads.try_acquire() {
            trace!(depth, alpha, beta, "spawning worker thread");
            return Task::Thread(scope.spawn(move || {
                let _slot = slot;
                self.search(&child, depth, alpha, beta, cancel)
            }));
        }

        if let Some(remote) = self.remote
            && let Some(slot) = remote.slots.try_acquire()
        {
            trace!(depth, alpha, beta, "dispatching to remote worker");
            let job = SearchJob {
                position: child,
                depth,
                alpha,
                beta,
                eval: self.eval,
                prune: self.prune,
            };
            return Task::Remote(scope.spawn(move || {
                let _slot = slot;
                remote.worker.search(&job, cancel).map(Scored::leaf).ok_or(Aborted)
            }));
        }

        Task::Inline(child)
    }

    /// Quiescence search: resolve captures before trusting the static eval.
    ///
    /// The mover's static eval and the static eval of every legal quiet
    /// child act as floors; only captures and promotions are searched
    /// further. Fails hard: the result is clamped to `[alpha, beta]`.
    fn quiesce(&self, position: &Position, mut alpha: i32, beta: i32, cancel: &CancelToken) -> Result<i32, Aborted> {
        cancel.check()?;
        self.nodes.fetch_add(1, Ordering::Relaxed);

        // Stand-pat: the side to move can choose not to capture
        alpha = alpha.max(evaluate(position, self.eval));
        if alpha >= beta {
            return Ok(beta);
        }

        for &mv in generate_pseudo_legal(position).as_slice().iter().filter(|m| !m.is_noisy()) {
            let Ok(child) = position.apply(mv) else {
                continue;
            };
            alpha = alpha.max(-evaluate(&child, self.eval));
            if alpha >= beta {
                return Ok(beta);
            }
        }

        let captures = generate_captures(position);
        let mut picker = MovePicker::new(&captures, position, Move::NULL, None);
        while let Some(mv) = picker.pick_next() {
            let Ok(child) = position.apply(mv) else {
                continue;
            };
            let score = -self.quiesce(&child, -beta, -alpha, cancel)?;
            if score >= beta {
                return Ok(beta);
            }
            alpha = alpha.max(score);
        }

        Ok(alpha)
    }
}
