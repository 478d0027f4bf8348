//! Consistency engine and persistence facade for linkdoc.
//!
//! This crate provides:
//! - [`ConsistencyEngine`] - Atomic create-or-overwrite and policy-driven delete
//! - [`DeleteOutcome`] - Deleted, absent, or blocked by incoming links
//! - [`EngineConfig`] - Commit retry and overwrite settings
//! - [`Persistence`] - String-keyed facade for outer layers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod engine;
pub mod persistence;

pub use config::EngineConfig;
pub use engine::{ConsistencyEngine, DeleteOutcome};
pub use persistence::Persistence;

pub use linkdoc_storage::DeletePolicy;
