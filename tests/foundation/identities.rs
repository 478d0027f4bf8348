//! Integration tests for entity references and links
//!
//! Tests identity, ordering, scoping, and link equality.

use std::collections::HashSet;

use linkdoc_foundation::{EntityRef, ErrorKind, Link, LinkSet, TypeScope};

fn contact(id: &str) -> EntityRef {
    EntityRef::new("data", "contact", id)
}

fn agreement() -> EntityRef {
    EntityRef::new("data", "provisionagreement", "100")
}

// =============================================================================
// EntityRef
// =============================================================================

#[test]
fn entity_ref_identity_covers_all_components() {
    let a = EntityRef::new("data", "contact", "101");
    assert_eq!(a, contact("101"));
    assert_ne!(a, EntityRef::new("other", "contact", "101"));
    assert_ne!(a, EntityRef::new("data", "person", "101"));
    assert_ne!(a, contact("102"));
}

#[test]
fn entity_ref_works_as_hash_key() {
    let set: HashSet<EntityRef> = [contact("101"), contact("101"), contact("102")]
        .into_iter()
        .collect();
    assert_eq!(set.len(), 2);
}

#[test]
fn entity_ref_display() {
    assert_eq!(contact("101").to_string(), "/data/contact/101");
    assert_eq!(format!("{:?}", contact("101")), "EntityRef(/data/contact/101)");
}

#[test]
fn entity_ref_parse_rejects_empty_parts() {
    assert!(EntityRef::parse("data", "contact", "101").is_ok());
    for (ns, ty, id) in [("", "contact", "1"), ("data", "", "1"), ("data", "contact", "")] {
        let err = EntityRef::parse(ns, ty, id).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::InvalidEntityRef(_)));
    }
}

#[test]
fn entity_ref_ordering_is_lexicographic() {
    let mut refs = vec![contact("2"), EntityRef::new("a", "z", "9"), contact("10")];
    refs.sort();
    assert_eq!(refs[0], EntityRef::new("a", "z", "9"));
    assert_eq!(refs[1], contact("10"));
    assert_eq!(refs[2], contact("2"));
}

// =============================================================================
// TypeScope
// =============================================================================

#[test]
fn scope_round_trip() {
    let scope = contact("101").scope();
    assert_eq!(scope, TypeScope::new("data", "contact"));
    assert_eq!(scope.entity("101"), contact("101"));
    assert_eq!(scope.to_string(), "/data/contact");
}

// =============================================================================
// Link
// =============================================================================

#[test]
fn link_identity_is_full_tuple() {
    let a = Link::new(agreement(), "/friend", "FRIEND_HAS_REF_TO", contact("103"));

    assert_eq!(
        a,
        Link::new(agreement(), "/friend", "FRIEND_HAS_REF_TO", contact("103"))
    );
    assert_ne!(
        a,
        Link::new(agreement(), "/contacts/0", "FRIEND_HAS_REF_TO", contact("103"))
    );
    assert_ne!(
        a,
        Link::new(agreement(), "/friend", "CONTACTS_HAS_REF_TO", contact("103"))
    );
    assert_ne!(
        a,
        Link::new(agreement(), "/friend", "FRIEND_HAS_REF_TO", contact("104"))
    );
}

#[test]
fn link_set_deduplicates() {
    let link = Link::new(agreement(), "/friend", "FRIEND_HAS_REF_TO", contact("103"));
    let set: LinkSet = [link.clone(), link.clone()].into_iter().collect();
    assert_eq!(set.len(), 1);
    assert!(set.contains(&link));
}

#[test]
fn link_display() {
    let link = Link::new(agreement(), "/friend", "FRIEND_HAS_REF_TO", contact("103"));
    assert_eq!(
        link.to_string(),
        "/data/provisionagreement/100 -[FRIEND_HAS_REF_TO]-> /data/contact/103"
    );
    assert_eq!(link.path(), "/friend");
    assert_eq!(link.relation(), "FRIEND_HAS_REF_TO");
}
