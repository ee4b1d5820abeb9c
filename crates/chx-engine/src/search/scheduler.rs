//! Task backends for Young-Brothers-Wait dispatch.
//!
//! A search node that fans out turns each younger sibling into a [`Task`]:
//! a scoped worker thread when a thread slot is free, a [`RemoteWorker`]
//! call when a remote slot is free, and otherwise a deferred inline search
//! that runs on the node's own thread when the batch is joined. Running out
//! of slots is not an error; the search degrades to serial.

use std::panic;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::thread::ScopedJoinHandle;

use chx_core::Position;

use crate::eval::EvalStrategy;
use crate::search::control::{Aborted, CancelToken};
use crate::search::heuristics::{HistoryTable, PvRegister};
use crate::search::negamax::{Scored, SearchContext};

/// Counting semaphore for parallel slots that never blocks.
#[derive(Debug)]
pub struct SlotBudget {
    free: AtomicUsize,
}

impl SlotBudget {
    pub fn new(slots: usize) -> Self {
        Self {
            free: AtomicUsize::new(slots),
        }
    }

    /// Take a slot if one is free. The slot returns when the guard drops.
    pub fn try_acquire(&self) -> Option<SlotGuard<'_>> {
        self.free
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
            .ok()
            .map(|_| SlotGuard { budget: self })
    }

    /// Slots currently free.
    pub fn available(&self) -> usize {
        self.free.load(Ordering::Acquire)
    }
}

/// A held slot of a [`SlotBudget`].
#[derive(Debug)]
pub struct SlotGuard<'a> {
    budget: &'a SlotBudget,
}

impl Drop for SlotGuard<'_> {
    fn drop(&mut self) {
        self.budget.free.fetch_add(1, Ordering::AcqRel);
    }
}

/// A child search handed to a [`RemoteWorker`].
///
/// The score a worker returns is from the point of view of the side to
/// move in `position`, exactly as a local search of the same window.
#[derive(Debug, Clone)]
pub struct SearchJob {
    pub position: Position,
    pub depth: u8,
    pub alpha: i32,
    pub beta: i32,
    pub eval: EvalStrategy,
    /// `false` for plain minimax (full windows, no cutoffs).
    pub prune: bool,
}

/// A backend that searches jobs somewhere other than this process's
/// worker threads. The transport is the implementor's concern.
pub trait RemoteWorker: Send + Sync {
    /// Search `job` to completion, or return `None` once `cancel` fires.
    fn search(&self, job: &SearchJob, cancel: &CancelToken) -> Option<i32>;
}

/// A [`RemoteWorker`] that runs each job serially on the calling thread.
///
/// Useful as a stand-in backend and for exercising the remote path.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoopbackWorker;

impl RemoteWorker for LoopbackWorker {
    fn search(&self, job: &SearchJob, cancel: &CancelToken) -> Option<i32> {
        let history = HistoryTable::new();
        let pv = PvRegister::new();
        let nodes = AtomicU64::new(0);
        let threads = SlotBudget::new(0);
        let ctx = SearchContext {
            tt: None,
            history: &history,
            pv: &pv,
            nodes: &nodes,
            threads: &threads,
            remote: None,
            eval: job.eval,
            prune: job.prune,
            parallel_min_depth: u8::MAX,
            max_pending: 1,
        };
        ctx.search(&job.position, job.depth, job.alpha, job.beta, cancel)
            .ok()
            .map(|scored| scored.score)
    }
}

/// A remote worker together with its slot budget.
#[derive(Clone, Copy)]
pub struct RemoteBackend<'a> {
    pub worker: &'a dyn RemoteWorker,
    pub slots: &'a SlotBudget,
}

/// One dispatched younger sibling.
pub enum Task<'scope> {
    /// No slot was free; search on the joining thread.
    Inline(Position),
    Thread(ScopedJoinHandle<'scope, Result<Scored, Aborted>>),
    Remote(ScopedJoinHandle<'scope, Result<Scored, Aborted>>),
}

/// Wait for a worker, re-raising its panic on this thread.
pub fn join_worker(handle: ScopedJoinHandle<'_, Result<Scored, Aborted>>) -> Result<Scored, Aborted> {
    handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload))
}
