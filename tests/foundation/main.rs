//! Integration tests for Layer 0: Foundation
//!
//! Tests for core types: EntityRef, Link, Document, Error, and persistent collections.

mod documents;
mod identities;
