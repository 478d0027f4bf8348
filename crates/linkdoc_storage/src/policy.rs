//! Delete policies.

use std::fmt;
use std::str::FromStr;

use linkdoc_foundation::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What happens when a document that other documents link to is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum DeletePolicy {
    /// Refuse the delete while any link points at the document.
    FailIfIncomingLinks,
    /// Delete and strip every link pointing at the document from the index.
    DeleteIncomingLinks,
}

impl DeletePolicy {
    /// Returns true if incoming links block the delete.
    #[must_use]
    pub fn blocks_on_incoming(self) -> bool {
        matches!(self, Self::FailIfIncomingLinks)
    }

    /// Returns true if incoming links are pruned on delete.
    #[must_use]
    pub fn prunes_incoming(self) -> bool {
        matches!(self, Self::DeleteIncomingLinks)
    }

    /// The wire name, e.g. `FAIL_IF_INCOMING_LINKS`.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FailIfIncomingLinks => "FAIL_IF_INCOMING_LINKS",
            Self::DeleteIncomingLinks => "DELETE_INCOMING_LINKS",
        }
    }
}

impl fmt::Display for DeletePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "FAIL_IF_INCOMING_LINKS" => Ok(Self::FailIfIncomingLinks),
            "DELETE_INCOMING_LINKS" => Ok(Self::DeleteIncomingLinks),
            other => Err(Error::unknown_delete_policy(other)),
        }
    }
}
