//! Link storage with bidirectional indices.
//!
//! Links are owned by their source entity. Two indices are kept:
//! - Forward: source -> link -> commit version the link was inserted at
//! - Reverse: target -> set of links pointing at it
//!
//! Every mutation goes through `insert_link`/`remove_link`, which update both
//! sides together, so a link is never present in one index but not the other.

use linkdoc_foundation::{EntityRef, Link, LinkSet, LtMap, LtSet};

/// Links added and removed by one reconciliation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkDelta {
    /// Links that were not recorded before.
    pub added: Vec<Link>,
    /// Recorded links that are gone.
    pub removed: Vec<Link>,
}

impl LinkDelta {
    /// Returns true if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Targets whose incoming set changed.
    pub fn affected_targets(&self) -> impl Iterator<Item = &EntityRef> {
        self.added
            .iter()
            .chain(self.removed.iter())
            .map(Link::target)
    }
}

/// Stores link edges between entities.
#[derive(Clone, Debug, Default)]
pub struct EdgeIndex {
    /// Forward index: source -> link -> insertion version.
    forward: LtMap<EntityRef, LtMap<Link, u64>>,
    /// Reverse index: target -> links pointing at it.
    reverse: LtMap<EntityRef, LtSet<Link>>,
    /// Total number of links.
    len: usize,
}

impl EdgeIndex {
    /// Creates a new empty edge index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the links currently owned by `source`.
    #[must_use]
    pub fn current_outgoing(&self, source: &EntityRef) -> LinkSet {
        self.forward
            .get(source)
            .map(|links| links.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Returns the links pointing at `target`.
    #[must_use]
    pub fn incoming(&self, target: &EntityRef) -> LinkSet {
        self.reverse.get(target).cloned().unwrap_or_default()
    }

    /// Returns true if any link points at `target`.
    #[must_use]
    pub fn has_incoming(&self, target: &EntityRef) -> bool {
        self.reverse.get(target).is_some_and(|links| !links.is_empty())
    }

    /// Returns true if `source` owns any link.
    #[must_use]
    pub fn has_outgoing(&self, source: &EntityRef) -> bool {
        self.forward.get(source).is_some_and(|links| !links.is_empty())
    }

    /// Returns the commit version at which `link` was inserted.
    #[must_use]
    pub fn inserted_at(&self, link: &Link) -> Option<u64> {
        self.forward
            .get(link.source())
            .and_then(|links| links.get(link))
            .copied()
    }

    /// Checks if a specific link is recorded.
    #[must_use]
    pub fn contains(&self, link: &Link) -> bool {
        self.inserted_at(link).is_some()
    }

    /// Replaces the outgoing set of `source` with `new_links`.
    ///
    /// Only the symmetric difference is touched: links present in both the
    /// old and new set keep their index entries (and insertion version).
    /// Every link in `new_links` must have `source` as its source.
    pub fn replace_outgoing(
        &mut self,
        source: &EntityRef,
        new_links: &LinkSet,
        version: u64,
    ) -> LinkDelta {
        debug_assert!(
            new_links.iter().all(|link| link.source() == source),
            "replace_outgoing given a link owned by another entity"
        );

        let current = self.current_outgoing(source);
        let removed: Vec<Link> = current.difference(new_links).into_iter().collect();
        let added: Vec<Link> = new_links.difference(&current).into_iter().collect();

        for link in &removed {
            self.remove_link(link);
        }
        for link in &added {
            self.insert_link(link.clone(), version);
        }

        LinkDelta { added, removed }
    }

    /// Removes every link owned by `source`.
    pub fn remove_all_outgoing(&mut self, source: &EntityRef) -> Vec<Link> {
        let removed: Vec<Link> = self.current_outgoing(source).into_iter().collect();
        for link in &removed {
            self.remove_link(link);
        }
        removed
    }

    /// Removes every link pointing at `target`, from both indices.
    ///
    /// The owning sources simply end up with fewer recorded links.
    pub fn prune_incoming(&mut self, target: &EntityRef) -> Vec<Link> {
        let pruned: Vec<Link> = self.incoming(target).into_iter().collect();
        for link in &pruned {
            self.remove_link(link);
        }
        pruned
    }

    fn insert_link(&mut self, link: Link, version: u64) {
        let previous = self
            .forward
            .entry_or_default(link.source().clone())
            .insert_mut(link.clone(), version);
        if previous.is_none() {
            self.len += 1;
        }
        self.reverse
            .entry_or_default(link.target().clone())
            .insert_mut(link);
    }

    fn remove_link(&mut self, link: &Link) {
        if let Some(links) = self.forward.get_mut(link.source()) {
            if links.remove_mut(link).is_some() {
                self.len -= 1;
            }
            if links.is_empty() {
                self.forward.remove_mut(link.source());
            }
        }
        if let Some(links) = self.reverse.get_mut(link.target()) {
            links.remove_mut(link);
            if links.is_empty() {
                self.reverse.remove_mut(link.target());
            }
        }
    }

    /// Returns true if `entity` appears as source or target of any link.
    #[must_use]
    pub fn references(&self, entity: &EntityRef) -> bool {
        self.has_outgoing(entity) || self.has_incoming(entity)
    }

    /// Iterates every recorded link.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.forward.values().flat_map(|links| links.keys())
    }

    /// Returns the total number of links.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no links are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Verifies that the forward and reverse indices describe the same links.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let forward_count: usize = self.forward.values().map(LtMap::len).sum();
        let reverse_count: usize = self.reverse.values().map(LtSet::len).sum();
        if forward_count != self.len || reverse_count != self.len {
            return false;
        }
        let forward_ok = self.forward.iter().all(|(source, links)| {
            !links.is_empty()
                && links.keys().all(|link| {
                    link.source() == source
                        && self
                            .reverse
                            .get(link.target())
                            .is_some_and(|rev| rev.contains(link))
                })
        });
        let reverse_ok = self.reverse.iter().all(|(target, links)| {
            !links.is_empty()
                && links
                    .iter()
                    .all(|link| link.target() == target && self.contains(link))
        });
        forward_ok && reverse_ok
    }
}
