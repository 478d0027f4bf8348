//! Integration tests for document bodies
//!
//! Tests structural equality, pointer lookup, and cheap sharing.

use linkdoc_foundation::Document;
use serde_json::json;

#[test]
fn equality_ignores_key_order() {
    let a = Document::new(json!({ "firstName": "Ole", "lastName": "Duck" }));
    let b = Document::new(json!({ "lastName": "Duck", "firstName": "Ole" }));
    assert_eq!(a, b);
}

#[test]
fn equality_is_structural() {
    let a = Document::new(json!({ "contacts": [{ "ref": "101" }] }));
    let b = Document::new(json!({ "contacts": [{ "ref": "102" }] }));
    assert_ne!(a, b);
}

#[test]
fn pointer_reads_nested_values() {
    let doc = Document::new(json!({
        "support": { "technicalSupport": [{ "ref": "104" }] }
    }));
    assert_eq!(
        doc.pointer("/support/technicalSupport/0/ref"),
        Some(&json!("104"))
    );
    assert!(doc.pointer("/support/otherSupport").is_none());
}

#[test]
fn clones_share_the_body() {
    let doc = Document::from(json!({ "name": "Sirius" }));
    let copy = doc.clone();
    assert!(doc.ptr_eq(&copy));
    assert!(!doc.ptr_eq(&Document::new(json!({ "name": "Sirius" }))));
    assert_eq!(copy.to_value(), json!({ "name": "Sirius" }));
}

#[test]
fn display_is_compact_json() {
    let doc = Document::new(json!({ "a": 1 }));
    assert_eq!(doc.to_string(), r#"{"a":1}"#);
}
