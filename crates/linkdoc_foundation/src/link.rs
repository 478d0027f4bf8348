//! Directed links between entities.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::collections::LtSet;
use crate::entity::EntityRef;

/// A set of links, as supplied to and returned from the store.
pub type LinkSet = LtSet<Link>;

/// A directed edge from `source` to `target`.
///
/// `path` is the location inside the source document where the reference
/// occurs; `relation` is an opaque label. A link is identified by the full
/// `(source, path, relation, target)` tuple.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Link {
    source: EntityRef,
    path: Arc<str>,
    relation: Arc<str>,
    target: EntityRef,
}

impl Link {
    /// Creates a new link.
    #[must_use]
    pub fn new(
        source: EntityRef,
        path: impl Into<Arc<str>>,
        relation: impl Into<Arc<str>>,
        target: EntityRef,
    ) -> Self {
        Self {
            source,
            path: path.into(),
            relation: relation.into(),
            target,
        }
    }

    /// The entity owning this link.
    #[must_use]
    pub fn source(&self) -> &EntityRef {
        &self.source
    }

    /// Location of the reference inside the source document.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Relation label.
    #[must_use]
    pub fn relation(&self) -> &str {
        &self.relation
    }

    /// The referenced entity.
    #[must_use]
    pub fn target(&self) -> &EntityRef {
        &self.target
    }
}

impl fmt::Debug for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Link({} {} -[{}]-> {})",
            self.source, self.path, self.relation, self.target
        )
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -[{}]-> {}", self.source, self.relation, self.target)
    }
}
