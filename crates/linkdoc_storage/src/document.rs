//! Document body storage.
//!
//! Documents are grouped by [`TypeScope`] so that listing every document of
//! one type never scans other types.

use linkdoc_foundation::{Document, EntityRef, LtMap, TypeScope};

/// Stores document bodies keyed by entity.
///
/// Built on persistent maps, so cloning is O(1) and a clone is an
/// unaffected snapshot of the store at that moment.
#[derive(Clone, Debug, Default)]
pub struct DocumentStore {
    /// Scope -> entity -> body.
    by_scope: LtMap<TypeScope, LtMap<EntityRef, Document>>,
    /// Total number of stored documents.
    len: usize,
}

impl DocumentStore {
    /// Creates a new empty document store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces the body for `entity`.
    ///
    /// Returns the previous body, if any.
    pub fn put(&mut self, entity: EntityRef, document: Document) -> Option<Document> {
        let previous = self
            .by_scope
            .entry_or_default(entity.scope())
            .insert_mut(entity, document);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Gets the body for `entity`.
    #[must_use]
    pub fn get(&self, entity: &EntityRef) -> Option<&Document> {
        self.by_scope
            .get(&entity.scope())
            .and_then(|docs| docs.get(entity))
    }

    /// Returns true if a body is stored for `entity`.
    #[must_use]
    pub fn contains(&self, entity: &EntityRef) -> bool {
        self.get(entity).is_some()
    }

    /// Removes the body for `entity`. Removing a missing entity is a no-op.
    pub fn remove(&mut self, entity: &EntityRef) -> Option<Document> {
        let scope = entity.scope();
        let docs = self.by_scope.get_mut(&scope)?;
        let removed = docs.remove_mut(entity)?;
        if docs.is_empty() {
            self.by_scope.remove_mut(&scope);
        }
        self.len -= 1;
        Some(removed)
    }

    /// Returns every document stored under `scope`.
    ///
    /// Ordering is unspecified. The result is a copy and does not track later writes.
    #[must_use]
    pub fn list_by_type(&self, scope: &TypeScope) -> Vec<Document> {
        self.by_scope
            .get(scope)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Iterates the entities stored under `scope`.
    pub fn entities_of(&self, scope: &TypeScope) -> impl Iterator<Item = &EntityRef> {
        self.by_scope
            .get(scope)
            .into_iter()
            .flat_map(|docs| docs.keys())
    }

    /// Iterates every stored `(entity, document)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityRef, &Document)> {
        self.by_scope.values().flat_map(|docs| docs.iter())
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
