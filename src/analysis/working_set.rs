//! The working set: methods whose dependency sets have emptied and which
//! have not been handed to the driver before.

use crate::analysis::lookup::MethodId;
use im::{HashSet, Vector};

/// A queue of ready methods with a history that persists across
/// recomputations, so each method is enqueued at most once ever.
#[derive(Debug, Clone, Default)]
pub struct WorkingSet {
    queue: Vector<MethodId>,
    history: HashSet<MethodId>,
}

impl WorkingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current queue, cloned so the caller can iterate while mutating
    /// the table.
    pub fn snapshot(&self) -> Vector<MethodId> {
        self.queue.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Rebuild the queue from the given ready candidates, in order,
    /// skipping any candidate seen by an earlier recomputation.
    pub(crate) fn recompute(&mut self, candidates: impl IntoIterator<Item = MethodId>) {
        self.queue = Vector::new();
        for id in candidates {
            if !self.history.contains(&id) {
                self.history.insert(id);
                self.queue.push_back(id);
            }
        }
    }
}
