//! Immutable store snapshots.
//!
//! A [`StoreState`] bundles the document store, the edge index and the
//! per-entity commit versions. Every field is `Arc`- or `im`-backed, so a
//! snapshot costs O(1) to take and stays valid for as long as a reader holds
//! it, no matter what commits afterwards.

use std::collections::BTreeSet;
use std::sync::Arc;

use linkdoc_foundation::{Document, EntityRef, Link, LtMap};

use crate::changes::{ChangeSet, Operation};
use crate::document::DocumentStore;
use crate::edge::EdgeIndex;

/// A read-set entry that no longer holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Conflict {
    /// The entity whose version moved.
    pub entity: EntityRef,
    /// Version the change set was built against.
    pub expected: u64,
    /// Version found at commit time.
    pub actual: u64,
}

/// The result of applying a change set to a state.
#[derive(Clone, Debug)]
pub struct Applied {
    /// The new state.
    pub state: StoreState,
    /// Entities whose version was bumped, in ascending order.
    pub touched: Vec<EntityRef>,
    /// Links inserted into the edge index.
    pub added: Vec<Link>,
    /// Outgoing links of the written entity that were removed.
    pub removed: Vec<Link>,
    /// Links from other entities that were pruned.
    pub pruned: Vec<Link>,
}

/// A consistent view of documents, links and versions.
#[derive(Clone, Debug, Default)]
pub struct StoreState {
    documents: Arc<DocumentStore>,
    edges: Arc<EdgeIndex>,
    /// Commit version at which each entity last changed.
    ///
    /// Only entities with a document or a link have an entry.
    versions: LtMap<EntityRef, u64>,
    /// Version of the last commit applied.
    version: u64,
}

impl StoreState {
    /// Creates an empty state at version 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The document store.
    #[must_use]
    pub fn documents(&self) -> &DocumentStore {
        &self.documents
    }

    /// The edge index.
    #[must_use]
    pub fn edges(&self) -> &EdgeIndex {
        &self.edges
    }

    /// Version of the last commit applied to this state.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version at which `entity` last changed, or 0 if it is unknown.
    #[must_use]
    pub fn entity_version(&self, entity: &EntityRef) -> u64 {
        self.versions.get(entity).copied().unwrap_or(0)
    }

    /// Gets the document for `entity`.
    #[must_use]
    pub fn document(&self, entity: &EntityRef) -> Option<&Document> {
        self.documents.get(entity)
    }

    /// Returns true if a document is stored for `entity`.
    #[must_use]
    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.documents.contains(entity)
    }

    /// Number of entities carrying a version entry.
    #[must_use]
    pub fn tracked_entities(&self) -> usize {
        self.versions.len()
    }

    /// Checks the change set's read set against this state.
    ///
    /// Returns the first entry whose version has moved.
    #[must_use]
    pub fn validate(&self, changes: &ChangeSet) -> Option<Conflict> {
        changes.expected().iter().find_map(|(entity, expected)| {
            let actual = self.entity_version(entity);
            (actual != *expected).then(|| Conflict {
                entity: entity.clone(),
                expected: *expected,
                actual,
            })
        })
    }

    /// Applies every operation of `changes` to a copy of this state.
    ///
    /// The copy is stamped with the next commit version. `self` is never
    /// modified. The read set is not checked here; see [`Self::validate`].
    #[must_use]
    pub fn apply(&self, changes: &ChangeSet) -> Applied {
        let mut next = self.clone();
        let version = self.version + 1;
        let entity = changes.entity();

        let mut touched = BTreeSet::new();
        touched.insert(entity.clone());
        let mut added = Vec::new();
        let mut removed = Vec::new();
        let mut pruned = Vec::new();

        for operation in changes.operations() {
            match operation {
                Operation::PutDocument(document) => {
                    Arc::make_mut(&mut next.documents).put(entity.clone(), document.clone());
                }
                Operation::RemoveDocument => {
                    Arc::make_mut(&mut next.documents).remove(entity);
                }
                Operation::ReplaceOutgoing(links) => {
                    let delta = Arc::make_mut(&mut next.edges).replace_outgoing(entity, links, version);
                    touched.extend(delta.affected_targets().cloned());
                    added.extend(delta.added);
                    removed.extend(delta.removed);
                }
                Operation::RemoveAllOutgoing => {
                    let gone = Arc::make_mut(&mut next.edges).remove_all_outgoing(entity);
                    touched.extend(gone.iter().map(|link| link.target().clone()));
                    removed.extend(gone);
                }
                Operation::PruneIncoming => {
                    let gone = Arc::make_mut(&mut next.edges).prune_incoming(entity);
                    touched.extend(gone.iter().map(|link| link.source().clone()));
                    pruned.extend(gone);
                }
            }
        }

        for entity in &touched {
            if next.documents.contains(entity) || next.edges.references(entity) {
                next.versions.insert_mut(entity.clone(), version);
            } else {
                next.versions.remove_mut(entity);
            }
        }
        next.version = version;

        Applied {
            state: next,
            touched: touched.into_iter().collect(),
            added,
            removed,
            pruned,
        }
    }
}
