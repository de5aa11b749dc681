use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::app::domain::content::{ContentTree, NodeId, TreeId};

/// Quiet period after the last mutation before a highlight pass runs.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Observing,
    Debouncing,
}

/// Watches one content root for structural changes and debounces them into
/// a single pending highlight pass.
///
/// Time is passed in by the caller, so the only timer is the `pending`
/// deadline owned here. A new mutation replaces the deadline; `stop` drops it.
#[derive(Debug)]
pub struct MutationWatcher {
    delay: Duration,
    target: Option<(TreeId, NodeId)>,
    pending: Option<Instant>,
}

impl Default for MutationWatcher {
    fn default() -> Self {
        Self::new(DEBOUNCE_DELAY)
    }
}

impl MutationWatcher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            target: None,
            pending: None,
        }
    }

    pub fn state(&self) -> WatchState {
        match (self.target, self.pending) {
            (None, _) => WatchState::Idle,
            (Some(_), None) => WatchState::Observing,
            (Some(_), Some(_)) => WatchState::Debouncing,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.target.map(|(_, root)| root)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending
    }

    /// Observe `root` in `tree`, replacing any previous target. Records
    /// logged before this call are discarded.
    pub fn start(&mut self, tree: &mut ContentTree, root: NodeId) {
        self.stop();
        tree.take_mutations();
        self.target = Some((tree.id(), root));
        debug!("Observing content root {:?} of tree {:?}", root, tree.id());
    }

    /// Stop observing and cancel the pending pass. Safe to call when idle.
    pub fn stop(&mut self) {
        if self.target.is_some() {
            debug!("Stopped observing content root");
        }
        self.target = None;
        self.pending = None;
    }

    /// Drain `tree`'s mutation log. Any record inside the observed subtree
    /// restarts the debounce timer from `now`. Returns how many records
    /// qualified.
    pub fn observe(&mut self, tree: &mut ContentTree, now: Instant) -> usize {
        let Some((tree_id, root)) = self.target else {
            return 0;
        };
        if tree.id() != tree_id {
            return 0;
        }

        let qualifying = tree
            .take_mutations()
            .iter()
            .filter(|record| tree.contains(root, record.target))
            .count();
        if qualifying > 0 {
            trace!("{} mutation(s), pass rescheduled", qualifying);
            self.pending = Some(now + self.delay);
        }
        qualifying
    }

    /// True exactly once per debounced burst, when `now` reaches the deadline.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.pending {
            Some(deadline) if now >= deadline && self.target.is_some() => {
                self.pending = None;
                true
            }
            _ => false,
        }
    }
}
