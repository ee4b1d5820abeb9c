//! Cooperative cancellation for a tree of search tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Signal that a subtree was cancelled. Its result must be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aborted;

/// A cancellation flag that also observes every ancestor's flag.
///
/// Each search node that fans out creates a [`child`](CancelToken::child)
/// token for its dispatched siblings. Cancelling that token stops the
/// siblings (and everything below them) without touching the rest of the
/// tree, while cancelling the root token stops the whole think call.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<Node>,
}

#[derive(Debug, Default)]
struct Node {
    cancelled: AtomicBool,
    parent: Option<Arc<Node>>,
}

impl CancelToken {
    /// A fresh root token.
    pub fn new() -> Self {
        Self::default()
    }

    /// A token cancelled whenever `self` (or any ancestor) is.
    pub fn child(&self) -> CancelToken {
        CancelToken {
            inner: Arc::new(Node {
                cancelled: AtomicBool::new(false),
                parent: Some(Arc::clone(&self.inner)),
            }),
        }
    }

    /// Request cancellation of this token and all of its descendants.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::Release);
    }

    /// Whether this token or any ancestor has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        let mut node = Some(&self.inner);
        while let Some(n) = node {
            if n.cancelled.load(Ordering::Acquire) {
                return true;
            }
            node = n.parent.as_ref();
        }
        false
    }

    /// `Err(Aborted)` once cancelled, for use with `?`.
    #[inline]
    pub fn check(&self) -> Result<(), Aborted> {
        if self.is_cancelled() { Err(Aborted) } else { Ok(()) }
    }
}
