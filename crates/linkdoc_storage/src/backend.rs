//! The transactional substrate.
//!
//! A [`Backend`] hands out immutable snapshots and commits change sets
//! atomically. Commits are optimistic: a change set whose read set no
//! longer holds is rejected with [`CommitOutcome::Conflict`] and nothing is
//! applied.

use std::sync::Arc;

use linkdoc_foundation::{EntityRef, Link, Result};
use parking_lot::RwLock;

use crate::changes::ChangeSet;
use crate::state::{Conflict, StoreState};

/// Details of a successful commit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitReceipt {
    /// The commit version now visible to readers.
    pub version: u64,
    /// Entities whose version was bumped.
    pub touched: Vec<EntityRef>,
    /// Links inserted.
    pub added: Vec<Link>,
    /// Outgoing links of the written entity that were removed.
    pub removed: Vec<Link>,
    /// Links from other entities that were pruned.
    pub pruned: Vec<Link>,
}

/// The result of a commit attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommitOutcome {
    /// Every operation is now visible.
    Committed(CommitReceipt),
    /// The read set was stale; nothing was applied.
    Conflict(Conflict),
}

impl CommitOutcome {
    /// Returns true if the change set was applied.
    #[must_use]
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Storage substrate that provides snapshot reads and atomic commits.
pub trait Backend: Send + Sync {
    /// Returns the latest committed state.
    ///
    /// # Errors
    ///
    /// Returns [`linkdoc_foundation::ErrorKind::Backend`] if the substrate is
    /// unavailable.
    fn snapshot(&self) -> Result<Arc<StoreState>>;

    /// Validates and applies `changes` as one unit.
    ///
    /// # Errors
    ///
    /// Returns [`linkdoc_foundation::ErrorKind::Backend`] if the substrate
    /// fails. A stale read set is not an error; it yields
    /// [`CommitOutcome::Conflict`].
    fn commit(&self, changes: ChangeSet) -> Result<CommitOutcome>;
}

impl<B: Backend + ?Sized> Backend for Arc<B> {
    fn snapshot(&self) -> Result<Arc<StoreState>> {
        (**self).snapshot()
    }

    fn commit(&self, changes: ChangeSet) -> Result<CommitOutcome> {
        (**self).commit(changes)
    }
}

/// In-process backend.
///
/// Readers clone the current `Arc<StoreState>` under a read lock and never
/// wait on a commit in progress for longer than that clone. Writers build
/// the next state and swap it in under the write lock.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    state: RwLock<Arc<StoreState>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend seeded with `state`.
    #[must_use]
    pub fn from_state(state: StoreState) -> Self {
        Self {
            state: RwLock::new(Arc::new(state)),
        }
    }

    /// Returns the latest committed state.
    #[must_use]
    pub fn current(&self) -> Arc<StoreState> {
        self.state.read().clone()
    }
}

impl Backend for MemoryBackend {
    fn snapshot(&self) -> Result<Arc<StoreState>> {
        Ok(self.current())
    }

    fn commit(&self, changes: ChangeSet) -> Result<CommitOutcome> {
        let mut guard = self.state.write();

        if let Some(conflict) = guard.validate(&changes) {
            tracing::debug!(
                target: "linkdoc::storage",
                entity = %conflict.entity,
                expected = conflict.expected,
                actual = conflict.actual,
                "read set is stale"
            );
            return Ok(CommitOutcome::Conflict(conflict));
        }

        let applied = guard.apply(&changes);
        let version = applied.state.version();
        *guard = Arc::new(applied.state);
        drop(guard);

        tracing::debug!(
            target: "linkdoc::storage",
            entity = %changes.entity(),
            version,
            touched = applied.touched.len(),
            "commit applied"
        );

        Ok(CommitOutcome::Committed(CommitReceipt {
            version,
            touched: applied.touched,
            added: applied.added,
            removed: applied.removed,
            pruned: applied.pruned,
        }))
    }
}
