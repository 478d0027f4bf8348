//! linkdoc - Document store with a bidirectional link index
//!
//! This crate re-exports all layers of the linkdoc system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: linkdoc_engine      : Consistency engine, delete policies, persistence facade
//! Layer 1: linkdoc_storage     : Document store, edge index, snapshots, backends
//! Layer 0: linkdoc_foundation  : Core types (EntityRef, Link, Document, Error)
//! ```

pub use linkdoc_engine as engine;
pub use linkdoc_foundation as foundation;
pub use linkdoc_storage as storage;

pub use linkdoc_engine::{ConsistencyEngine, DeleteOutcome, DeletePolicy, EngineConfig, Persistence};
pub use linkdoc_foundation::{Document, EntityRef, Error, ErrorKind, Link, LinkSet, Result, TypeScope};
