//! The consistency engine.
//!
//! Every mutation is planned against an immutable snapshot and committed as a
//! single change set. If a concurrent commit invalidated the plan, the call
//! takes a fresh snapshot and plans again, up to the configured bound.

use std::sync::Arc;
use std::thread;

use linkdoc_foundation::{
    Document, EntityRef, Error, ErrorContext, Link, LinkSet, Result, TypeScope,
};
use linkdoc_storage::{Backend, ChangeSet, CommitOutcome, DeletePolicy, MemoryBackend, StoreState};

use crate::config::EngineConfig;

/// The result of a delete call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The document and its outgoing links are gone.
    Deleted {
        /// Links from other documents that were removed.
        pruned: usize,
    },
    /// No document was stored; nothing changed.
    Absent,
    /// Other documents still link here; nothing changed.
    Blocked {
        /// The blocking links, in ascending order.
        incoming: Vec<Link>,
    },
}

impl DeleteOutcome {
    /// Returns true unless the delete was blocked.
    #[must_use]
    pub fn is_success(&self) -> bool {
        !self.is_blocked()
    }

    /// Returns true if incoming links blocked the delete.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        matches!(self, Self::Blocked { .. })
    }
}

/// What a planning pass decided.
enum Plan<T> {
    /// Nothing to commit.
    Done(T),
    /// Commit these changes; on success return the value.
    Commit(ChangeSet, T),
}

/// Keeps documents and the link index consistent with each other.
///
/// All methods take `&self`; the engine can be shared across threads behind
/// an `Arc`.
#[derive(Debug)]
pub struct ConsistencyEngine<B: Backend = MemoryBackend> {
    backend: B,
    config: EngineConfig,
}

impl ConsistencyEngine<MemoryBackend> {
    /// Creates an engine over an empty in-memory backend.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryBackend::new())
    }
}

impl Default for ConsistencyEngine<MemoryBackend> {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl<B: Backend> ConsistencyEngine<B> {
    /// Creates an engine over `backend` with the default configuration.
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            config: EngineConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Stores `document` under `entity` and makes `links` its exact outgoing set.
    ///
    /// Links that were recorded before and are still supplied are left in
    /// place. Targets of the links are never created.
    ///
    /// # Errors
    ///
    /// - [`linkdoc_foundation::ErrorKind::MalformedLink`] if a link does not
    ///   originate from `entity`. Nothing is written.
    /// - [`linkdoc_foundation::ErrorKind::Backend`] if the backend fails.
    /// - [`linkdoc_foundation::ErrorKind::CommitConflict`] if retries run out.
    pub fn create_or_overwrite(
        &self,
        entity: &EntityRef,
        document: Document,
        links: LinkSet,
    ) -> Result<()> {
        const OPERATION: &str = "create_or_overwrite";

        let changes = ChangeSet::new(entity.clone())
            .put_document(document.clone())
            .replace_outgoing(links.clone())
            .map_err(|err| {
                err.with_context(
                    ErrorContext::new()
                        .with_operation(OPERATION)
                        .with_entity(entity.clone()),
                )
            })?;

        self.execute(OPERATION, entity, |snapshot| {
            if self.config.skip_unchanged_overwrites
                && snapshot.document(entity) == Some(&document)
                && snapshot.edges().current_outgoing(entity) == links
            {
                tracing::trace!(
                    target: "linkdoc::engine",
                    entity = %entity,
                    "overwrite is unchanged, skipping commit"
                );
                return Plan::Done(());
            }
            Plan::Commit(changes.clone(), ())
        })
    }

    /// Deletes the document stored under `entity` according to `policy`.
    ///
    /// Links whose source is `entity` itself never block the delete; they go
    /// with the rest of its outgoing links.
    ///
    /// # Errors
    ///
    /// - [`linkdoc_foundation::ErrorKind::Backend`] if the backend fails.
    /// - [`linkdoc_foundation::ErrorKind::CommitConflict`] if retries run out.
    ///
    /// A delete blocked by incoming links is not an error; it returns
    /// [`DeleteOutcome::Blocked`].
    pub fn delete(&self, entity: &EntityRef, policy: DeletePolicy) -> Result<DeleteOutcome> {
        let outcome = self.execute("delete", entity, |snapshot| {
            if !snapshot.contains(entity) {
                return Plan::Done(DeleteOutcome::Absent);
            }

            let mut incoming: Vec<Link> = snapshot
                .edges()
                .incoming(entity)
                .into_iter()
                .filter(|link| link.source() != entity)
                .collect();
            incoming.sort();

            let changes = ChangeSet::new(entity.clone())
                .expect_version(entity.clone(), snapshot.entity_version(entity))
                .remove_document()
                .remove_all_outgoing();

            if policy.blocks_on_incoming() && !incoming.is_empty() {
                Plan::Done(DeleteOutcome::Blocked { incoming })
            } else if policy.prunes_incoming() {
                Plan::Commit(
                    changes.prune_incoming(),
                    DeleteOutcome::Deleted {
                        pruned: incoming.len(),
                    },
                )
            } else {
                Plan::Commit(changes, DeleteOutcome::Deleted { pruned: 0 })
            }
        })?;

        match &outcome {
            DeleteOutcome::Blocked { incoming } => tracing::info!(
                target: "linkdoc::engine",
                entity = %entity,
                %policy,
                incoming = incoming.len(),
                "delete blocked by incoming links"
            ),
            DeleteOutcome::Absent => tracing::debug!(
                target: "linkdoc::engine",
                entity = %entity,
                "delete of absent document"
            ),
            DeleteOutcome::Deleted { .. } => {}
        }
        Ok(outcome)
    }

    /// Returns the document stored under `entity`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`linkdoc_foundation::ErrorKind::Backend`] if the backend fails.
    pub fn read(&self, entity: &EntityRef) -> Result<Option<Document>> {
        let snapshot = self.load("read", Some(entity), None)?;
        Ok(snapshot.document(entity).cloned())
    }

    /// Returns every document of one type. Ordering is unspecified.
    ///
    /// # Errors
    ///
    /// Returns [`linkdoc_foundation::ErrorKind::Backend`] if the backend fails.
    pub fn find_all(&self, scope: &TypeScope) -> Result<Vec<Document>> {
        let snapshot = self.load("find_all", None, None)?;
        Ok(snapshot.documents().list_by_type(scope))
    }

    /// Returns the links recorded as owned by `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`linkdoc_foundation::ErrorKind::Backend`] if the backend fails.
    pub fn outgoing(&self, entity: &EntityRef) -> Result<LinkSet> {
        let snapshot = self.load("outgoing", Some(entity), None)?;
        Ok(snapshot.edges().current_outgoing(entity))
    }

    /// Returns the links pointing at `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`linkdoc_foundation::ErrorKind::Backend`] if the backend fails.
    pub fn incoming(&self, entity: &EntityRef) -> Result<LinkSet> {
        let snapshot = self.load("incoming", Some(entity), None)?;
        Ok(snapshot.edges().incoming(entity))
    }

    /// Returns a consistent snapshot of the whole store.
    ///
    /// # Errors
    ///
    /// Returns [`linkdoc_foundation::ErrorKind::Backend`] if the backend fails.
    pub fn snapshot(&self) -> Result<Arc<StoreState>> {
        self.load("snapshot", None, None)
    }

    /// Plans against a snapshot and commits, retrying on conflict.
    fn execute<T>(
        &self,
        operation: &'static str,
        entity: &EntityRef,
        mut plan: impl FnMut(&StoreState) -> Plan<T>,
    ) -> Result<T> {
        let attempts = self.config.max_attempts();

        for attempt in 1..=attempts {
            let snapshot = self.load(operation, Some(entity), Some(attempt))?;
            let (changes, value) = match plan(&snapshot) {
                Plan::Done(value) => return Ok(value),
                Plan::Commit(changes, value) => (changes, value),
            };

            match self
                .backend
                .commit(changes)
                .map_err(|err| self.backend_failure(err, operation, Some(entity), Some(attempt)))?
            {
                CommitOutcome::Committed(receipt) => {
                    tracing::debug!(
                        target: "linkdoc::engine",
                        operation,
                        entity = %entity,
                        version = receipt.version,
                        added = receipt.added.len(),
                        removed = receipt.removed.len(),
                        pruned = receipt.pruned.len(),
                        "committed"
                    );
                    return Ok(value);
                }
                CommitOutcome::Conflict(conflict) if attempt < attempts => {
                    let backoff = self.config.backoff_for(attempt - 1);
                    tracing::warn!(
                        target: "linkdoc::engine",
                        operation,
                        entity = %entity,
                        conflicting = %conflict.entity,
                        attempt,
                        ?backoff,
                        "commit conflict, retrying"
                    );
                    thread::sleep(backoff);
                }
                CommitOutcome::Conflict(conflict) => {
                    tracing::warn!(
                        target: "linkdoc::engine",
                        operation,
                        entity = %entity,
                        conflicting = %conflict.entity,
                        attempts,
                        "commit conflict, giving up"
                    );
                }
            }
        }

        Err(Error::commit_conflict(entity.clone(), attempts).with_context(
            ErrorContext::new()
                .with_operation(operation)
                .with_entity(entity.clone())
                .with_attempt(attempts),
        ))
    }

    fn load(
        &self,
        operation: &'static str,
        entity: Option<&EntityRef>,
        attempt: Option<usize>,
    ) -> Result<Arc<StoreState>> {
        self.backend
            .snapshot()
            .map_err(|err| self.backend_failure(err, operation, entity, attempt))
    }

    fn backend_failure(
        &self,
        err: Error,
        operation: &'static str,
        entity: Option<&EntityRef>,
        attempt: Option<usize>,
    ) -> Error {
        tracing::error!(
            target: "linkdoc::engine",
            operation,
            entity = entity.map(tracing::field::display),
            attempt,
            error = %err,
            "backend failure"
        );
        if err.context.is_some() {
            return err;
        }
        let mut context = ErrorContext::new().with_operation(operation);
        if let Some(entity) = entity {
            context = context.with_entity(entity.clone());
        }
        if let Some(attempt) = attempt {
            context = context.with_attempt(attempt);
        }
        err.with_context(context)
    }
}
