//! String-keyed persistence facade.
//!
//! This is the surface an outer layer (for example an HTTP resource) holds as
//! `Arc<dyn Persistence>`. Writes report success as a boolean; a delete
//! refused by [`DeletePolicy::FailIfIncomingLinks`] is `Ok(false)`.

use linkdoc_foundation::{Document, EntityRef, LinkSet, Result, TypeScope};
use linkdoc_storage::{Backend, DeletePolicy};

use crate::engine::ConsistencyEngine;

/// Document persistence with link-aware integrity.
pub trait Persistence: Send + Sync {
    /// Reads one document.
    ///
    /// # Errors
    ///
    /// Fails on an empty key component or a backend failure. A missing
    /// document is `Ok(None)`.
    fn read(&self, namespace: &str, entity_type: &str, id: &str) -> Result<Option<Document>>;

    /// Lists every document of one type.
    ///
    /// # Errors
    ///
    /// Fails on an empty key component or a backend failure.
    fn find_all(&self, namespace: &str, entity_type: &str) -> Result<Vec<Document>>;

    /// Stores a document and replaces its outgoing links.
    ///
    /// # Errors
    ///
    /// Fails on an empty key component, a link not originating from the
    /// document, or a backend failure.
    fn create_or_overwrite(
        &self,
        namespace: &str,
        entity_type: &str,
        id: &str,
        document: Document,
        outgoing_links: LinkSet,
    ) -> Result<bool>;

    /// Deletes a document. Returns `Ok(false)` if incoming links block it.
    ///
    /// # Errors
    ///
    /// Fails on an empty key component or a backend failure.
    fn delete(
        &self,
        namespace: &str,
        entity_type: &str,
        id: &str,
        policy: DeletePolicy,
    ) -> Result<bool>;
}

impl<B: Backend> Persistence for ConsistencyEngine<B> {
    fn read(&self, namespace: &str, entity_type: &str, id: &str) -> Result<Option<Document>> {
        let entity = EntityRef::parse(namespace, entity_type, id)?;
        ConsistencyEngine::read(self, &entity)
    }

    fn find_all(&self, namespace: &str, entity_type: &str) -> Result<Vec<Document>> {
        let scope = TypeScope::parse(namespace, entity_type)?;
        ConsistencyEngine::find_all(self, &scope)
    }

    fn create_or_overwrite(
        &self,
        namespace: &str,
        entity_type: &str,
        id: &str,
        document: Document,
        outgoing_links: LinkSet,
    ) -> Result<bool> {
        let entity = EntityRef::parse(namespace, entity_type, id)?;
        ConsistencyEngine::create_or_overwrite(self, &entity, document, outgoing_links)?;
        Ok(true)
    }

    fn delete(
        &self,
        namespace: &str,
        entity_type: &str,
        id: &str,
        policy: DeletePolicy,
    ) -> Result<bool> {
        let entity = EntityRef::parse(namespace, entity_type, id)?;
        Ok(ConsistencyEngine::delete(self, &entity, policy)?.is_success())
    }
}
