//! Compound document identities.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Compound identity of a stored document: `(namespace, entity_type, id)`.
///
/// Equality, hashing and ordering cover all three fields. The fields are
/// reference counted so the many copies held by the indices are cheap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityRef {
    namespace: Arc<str>,
    entity_type: Arc<str>,
    id: Arc<str>,
}

impl EntityRef {
    /// Creates a new entity reference.
    #[must_use]
    pub fn new(
        namespace: impl Into<Arc<str>>,
        entity_type: impl Into<Arc<str>>,
        id: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    /// Creates a reference, rejecting empty components.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ErrorKind::InvalidEntityRef`] if any component
    /// is empty.
    pub fn parse(namespace: &str, entity_type: &str, id: &str) -> Result<Self> {
        reject_empty(&[
            ("namespace", namespace),
            ("entity type", entity_type),
            ("id", id),
        ])?;
        Ok(Self::new(namespace, entity_type, id))
    }

    /// The namespace component.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The entity type component.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// The id component.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The `(namespace, entity_type)` scope this entity is listed under.
    #[must_use]
    pub fn scope(&self) -> TypeScope {
        TypeScope {
            namespace: Arc::clone(&self.namespace),
            entity_type: Arc::clone(&self.entity_type),
        }
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityRef({self})")
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}/{}", self.namespace, self.entity_type, self.id)
    }
}

/// A `(namespace, entity_type)` pair: the unit of type-scoped listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeScope {
    namespace: Arc<str>,
    entity_type: Arc<str>,
}

impl TypeScope {
    /// Creates a new type scope.
    #[must_use]
    pub fn new(namespace: impl Into<Arc<str>>, entity_type: impl Into<Arc<str>>) -> Self {
        Self {
            namespace: namespace.into(),
            entity_type: entity_type.into(),
        }
    }

    /// The namespace component.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The entity type component.
    #[must_use]
    pub fn entity_type(&self) -> &str {
        &self.entity_type
    }

    /// Creates a scope, rejecting empty components.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::ErrorKind::InvalidEntityRef`] if either
    /// component is empty.
    pub fn parse(namespace: &str, entity_type: &str) -> Result<Self> {
        reject_empty(&[("namespace", namespace), ("entity type", entity_type)])?;
        Ok(Self::new(namespace, entity_type))
    }

    /// Builds the entity reference for `id` within this scope.
    #[must_use]
    pub fn entity(&self, id: impl Into<Arc<str>>) -> EntityRef {
        EntityRef {
            namespace: Arc::clone(&self.namespace),
            entity_type: Arc::clone(&self.entity_type),
            id: id.into(),
        }
    }
}

impl fmt::Display for TypeScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.namespace, self.entity_type)
    }
}

fn reject_empty(components: &[(&str, &str)]) -> Result<()> {
    match components.iter().find(|(_, value)| value.is_empty()) {
        Some((name, _)) => Err(Error::invalid_entity_ref(format!("empty {name}"))),
        None => Ok(()),
    }
}
