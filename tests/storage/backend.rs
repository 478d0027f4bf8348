//! Integration tests for store snapshots and the memory backend
//!
//! Tests atomic visibility, optimistic validation, and version tracking.

use std::sync::Arc;
use std::thread;

use linkdoc_foundation::{Document, EntityRef, Link, LinkSet};
use linkdoc_storage::{Backend, ChangeSet, CommitOutcome, MemoryBackend, StoreState};
use serde_json::json;

fn agreement() -> EntityRef {
    EntityRef::new("data", "provisionagreement", "100")
}

fn contact(id: &str) -> EntityRef {
    EntityRef::new("data", "contact", id)
}

fn upsert(entity: &EntityRef, targets: &[&str]) -> ChangeSet {
    let links: LinkSet = targets
        .iter()
        .enumerate()
        .map(|(slot, t)| {
            Link::new(
                entity.clone(),
                format!("/contacts/{slot}"),
                "CONTACTS_HAS_REF_TO",
                contact(t),
            )
        })
        .collect();
    ChangeSet::new(entity.clone())
        .put_document(Document::new(json!({ "id": entity.id() })))
        .replace_outgoing(links)
        .unwrap()
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn snapshot_outlives_later_commits() {
    let backend = MemoryBackend::new();
    backend.commit(upsert(&agreement(), &["101", "102"])).unwrap();
    let old = backend.snapshot().unwrap();

    let delete = ChangeSet::new(agreement())
        .remove_document()
        .remove_all_outgoing();
    backend.commit(delete).unwrap();

    assert!(old.contains(&agreement()));
    assert_eq!(old.edges().len(), 2);
    let new = backend.snapshot().unwrap();
    assert!(!new.contains(&agreement()));
    assert!(new.edges().is_empty());
}

#[test]
fn versions_increase_per_commit() {
    let backend = MemoryBackend::new();
    for i in 0..5 {
        backend.commit(upsert(&contact(&i.to_string()), &[])).unwrap();
    }
    let state = backend.snapshot().unwrap();

    assert_eq!(state.version(), 5);
    assert_eq!(state.entity_version(&contact("0")), 1);
    assert_eq!(state.entity_version(&contact("4")), 5);
}

#[test]
fn adding_a_link_bumps_the_target() {
    let backend = MemoryBackend::new();
    backend.commit(upsert(&contact("101"), &[])).unwrap();
    let before = backend.snapshot().unwrap().entity_version(&contact("101"));

    backend.commit(upsert(&agreement(), &["101"])).unwrap();

    let after = backend.snapshot().unwrap().entity_version(&contact("101"));
    assert!(after > before);
}

#[test]
fn unrelated_commits_leave_versions_alone() {
    let backend = MemoryBackend::new();
    backend.commit(upsert(&contact("101"), &[])).unwrap();
    let seen = backend.snapshot().unwrap().entity_version(&contact("101"));

    backend.commit(upsert(&contact("102"), &[])).unwrap();

    let delete = ChangeSet::new(contact("101"))
        .expect_version(contact("101"), seen)
        .remove_document()
        .remove_all_outgoing();
    assert!(backend.commit(delete).unwrap().is_committed());
}

// =============================================================================
// Apply
// =============================================================================

#[test]
fn apply_reports_pruned_sources() {
    let state = StoreState::new();
    let state = state.apply(&upsert(&contact("101"), &[])).state;
    let state = state.apply(&upsert(&agreement(), &["101"])).state;

    let applied = state.apply(
        &ChangeSet::new(contact("101"))
            .remove_document()
            .remove_all_outgoing()
            .prune_incoming(),
    );

    assert_eq!(applied.pruned.len(), 1);
    assert_eq!(applied.touched, {
        let mut t = vec![agreement(), contact("101")];
        t.sort();
        t
    });
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn concurrent_commits_all_land() {
    let backend = Arc::new(MemoryBackend::new());

    thread::scope(|s| {
        for worker in 0..8 {
            let backend = Arc::clone(&backend);
            s.spawn(move || {
                for i in 0..25 {
                    let entity = EntityRef::new("data", "contact", format!("{worker}-{i}"));
                    let outcome = backend.commit(upsert(&entity, &["hub"])).unwrap();
                    assert!(matches!(outcome, CommitOutcome::Committed(_)));
                }
            });
        }
    });

    let state = backend.snapshot().unwrap();
    assert_eq!(state.version(), 200);
    assert_eq!(state.documents().len(), 200);
    assert_eq!(state.edges().incoming(&contact("hub")).len(), 200);
    assert!(state.edges().is_consistent());
}

#[test]
fn readers_never_see_partial_commits() {
    let backend = MemoryBackend::new();
    let a = agreement();

    thread::scope(|s| {
        s.spawn(|| {
            for round in 0..200 {
                let targets: Vec<String> = (0..4).map(|i| format!("{}", round * 4 + i)).collect();
                let refs: Vec<&str> = targets.iter().map(String::as_str).collect();
                backend.commit(upsert(&a, &refs)).unwrap();
            }
        });
        s.spawn(|| {
            for _ in 0..200 {
                let snapshot = backend.snapshot().unwrap();
                let outgoing = snapshot.edges().current_outgoing(&a);
                assert!(outgoing.is_empty() || outgoing.len() == 4);
                assert!(snapshot.edges().is_consistent());
            }
        });
    });
}
