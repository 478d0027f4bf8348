//! Core types, documents, and persistent collections for linkdoc.
//!
//! This crate provides:
//! - [`EntityRef`] - Compound `(namespace, entity_type, id)` document identity
//! - [`Link`] - Directed, labelled edge between two entities
//! - [`Document`] - Shared JSON document body
//! - [`Error`] - Error type with categorised kinds
//! - Persistent collections ([`LtSet`], [`LtMap`])

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod collections;
pub mod document;
pub mod entity;
pub mod error;
pub mod link;

pub use collections::{LtMap, LtSet};
pub use document::Document;
pub use entity::{EntityRef, TypeScope};
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use link::{Link, LinkSet};
