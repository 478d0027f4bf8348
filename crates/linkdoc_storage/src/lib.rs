//! Document storage, link indices, and transactional store state for linkdoc.
//!
//! This crate provides:
//! - [`DocumentStore`] - Document bodies keyed by entity, listable by type
//! - [`EdgeIndex`] - Forward and reverse link indices kept in lockstep
//! - [`StoreState`] - Immutable snapshot of both, with per-entity versions
//! - [`ChangeSet`] - Write set validated and applied as one commit
//! - [`Backend`] / [`MemoryBackend`] - The transactional substrate seam

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod backend;
pub mod changes;
pub mod document;
pub mod edge;
pub mod policy;
pub mod state;

pub use backend::{Backend, CommitOutcome, CommitReceipt, MemoryBackend};
pub use changes::{ChangeSet, Operation};
pub use document::DocumentStore;
pub use edge::{EdgeIndex, LinkDelta};
pub use policy::DeletePolicy;
pub use state::{Applied, Conflict, StoreState};
