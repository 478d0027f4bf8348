//! Integration tests for the string-keyed persistence facade

use std::sync::Arc;

use linkdoc_engine::{ConsistencyEngine, DeletePolicy, EngineConfig, Persistence};
use linkdoc_foundation::{Document, EntityRef, Link, LinkSet};
use serde_json::json;

fn facade() -> Arc<dyn Persistence> {
    Arc::new(ConsistencyEngine::in_memory().with_config(EngineConfig::high_contention()))
}

#[test]
fn facade_round_trip() {
    let store = facade();
    let body = Document::new(json!({ "firstName": "Donald" }));

    assert!(
        store
            .create_or_overwrite("data", "contact", "102", body.clone(), LinkSet::new())
            .unwrap()
    );
    assert_eq!(store.read("data", "contact", "102").unwrap(), Some(body));
    assert!(store.read("data", "contact", "404").unwrap().is_none());
    assert!(store.find_all("data", "nothing").unwrap().is_empty());
}

#[test]
fn facade_rejects_foreign_links() {
    let store = facade();
    let foreign: LinkSet = [Link::new(
        EntityRef::new("data", "contact", "101"),
        "/friend",
        "FRIEND_HAS_REF_TO",
        EntityRef::new("data", "contact", "102"),
    )]
    .into_iter()
    .collect();

    let result = store.create_or_overwrite("data", "contact", "999", Document::new(json!({})), foreign);

    assert!(result.unwrap_err().is_contract_violation());
    assert!(store.read("data", "contact", "999").unwrap().is_none());
}

#[test]
fn facade_delete_reports_blocked_as_false() {
    let store = facade();
    let child = EntityRef::new("data", "contact", "101");
    let link = Link::new(
        EntityRef::new("data", "provisionagreement", "100"),
        "/contacts/0",
        "CONTACTS_HAS_REF_TO",
        child,
    );
    store
        .create_or_overwrite("data", "contact", "101", Document::new(json!({})), LinkSet::new())
        .unwrap();
    store
        .create_or_overwrite(
            "data",
            "provisionagreement",
            "100",
            Document::new(json!({})),
            [link].into_iter().collect(),
        )
        .unwrap();

    assert!(
        !store
            .delete("data", "contact", "101", DeletePolicy::FailIfIncomingLinks)
            .unwrap()
    );
    assert!(store.read("data", "contact", "101").unwrap().is_some());
}
