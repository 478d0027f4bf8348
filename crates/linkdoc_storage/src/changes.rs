//! Write sets.
//!
//! A [`ChangeSet`] describes every mutation one call makes to a single
//! entity, together with the entity versions the caller's decision was based
//! on. A backend either applies all of it or none of it.

use linkdoc_foundation::{Document, EntityRef, Error, LinkSet, Result};

/// One mutation inside a change set. Each operation acts on the change set's entity.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Store or replace the document body.
    PutDocument(Document),
    /// Remove the document body.
    RemoveDocument,
    /// Reconcile the outgoing link set to exactly these links.
    ReplaceOutgoing(LinkSet),
    /// Remove every outgoing link.
    RemoveAllOutgoing,
    /// Remove every link pointing at the entity.
    PruneIncoming,
}

/// A validated, ordered write set for one entity.
#[derive(Clone, Debug)]
pub struct ChangeSet {
    entity: EntityRef,
    expected: Vec<(EntityRef, u64)>,
    operations: Vec<Operation>,
}

impl ChangeSet {
    /// Starts an empty change set for `entity`.
    #[must_use]
    pub fn new(entity: EntityRef) -> Self {
        Self {
            entity,
            expected: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Requires `entity` to still be at `version` when the change set commits.
    #[must_use]
    pub fn expect_version(mut self, entity: EntityRef, version: u64) -> Self {
        self.expected.push((entity, version));
        self
    }

    /// Stores or replaces the document body.
    #[must_use]
    pub fn put_document(mut self, document: Document) -> Self {
        self.operations.push(Operation::PutDocument(document));
        self
    }

    /// Removes the document body.
    #[must_use]
    pub fn remove_document(mut self) -> Self {
        self.operations.push(Operation::RemoveDocument);
        self
    }

    /// Replaces the outgoing link set.
    ///
    /// # Errors
    ///
    /// Returns [`linkdoc_foundation::ErrorKind::MalformedLink`] if any link
    /// has a source other than this change set's entity. Nothing is recorded
    /// in that case.
    pub fn replace_outgoing(mut self, links: LinkSet) -> Result<Self> {
        if let Some(bad) = links.iter().find(|link| link.source() != &self.entity) {
            return Err(Error::malformed_link(self.entity.clone(), bad.clone()));
        }
        self.operations.push(Operation::ReplaceOutgoing(links));
        Ok(self)
    }

    /// Removes every outgoing link.
    #[must_use]
    pub fn remove_all_outgoing(mut self) -> Self {
        self.operations.push(Operation::RemoveAllOutgoing);
        self
    }

    /// Removes every link pointing at the entity.
    #[must_use]
    pub fn prune_incoming(mut self) -> Self {
        self.operations.push(Operation::PruneIncoming);
        self
    }

    /// The entity this change set writes.
    #[must_use]
    pub fn entity(&self) -> &EntityRef {
        &self.entity
    }

    /// Entity versions that must still hold at commit time.
    #[must_use]
    pub fn expected(&self) -> &[(EntityRef, u64)] {
        &self.expected
    }

    /// The operations, in application order.
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Returns true if the change set has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}
