//! Engine-level checks over the sample data set.

use linkdoc::{ConsistencyEngine, DeleteOutcome, DeletePolicy, Document, LinkSet};

use crate::fixtures::{
    CONTACT_IDS, agreement_ref, contact_ref, contacts, friend_link, sirius, sirius_links,
    sirius_links_without_friend,
};

fn seeded() -> ConsistencyEngine {
    let engine = ConsistencyEngine::in_memory();
    engine
        .create_or_overwrite(&agreement_ref(), Document::new(sirius()), sirius_links())
        .unwrap();
    for (id, doc) in contacts() {
        engine
            .create_or_overwrite(&contact_ref(id), doc, LinkSet::new())
            .unwrap();
    }
    engine
}

#[test]
fn every_contact_is_referenced() {
    let engine = seeded();

    let counts: Vec<usize> = CONTACT_IDS
        .iter()
        .map(|id| engine.incoming(&contact_ref(id)).unwrap().len())
        .collect();

    assert_eq!(counts, vec![1, 1, 2, 2, 2]);
    assert_eq!(engine.outgoing(&agreement_ref()).unwrap().len(), 8);
}

#[test]
fn each_contact_blocks_under_fail_policy() {
    let engine = seeded();

    for id in CONTACT_IDS {
        let outcome = engine
            .delete(&contact_ref(id), DeletePolicy::FailIfIncomingLinks)
            .unwrap();
        assert!(outcome.is_blocked(), "contact {id} should be blocked");
    }
    assert_eq!(engine.snapshot().unwrap().documents().len(), 6);
}

#[test]
fn removing_friend_keeps_other_reference_to_same_contact() {
    let engine = seeded();
    let mut body = sirius();
    body.as_object_mut().unwrap().remove("friend");

    engine
        .create_or_overwrite(&agreement_ref(), Document::new(body), sirius_links_without_friend())
        .unwrap();

    let incoming = engine.incoming(&contact_ref("103")).unwrap();
    assert_eq!(incoming.len(), 1);
    assert!(!incoming.contains(&friend_link()));
    assert!(
        engine
            .delete(&contact_ref("103"), DeletePolicy::FailIfIncomingLinks)
            .unwrap()
            .is_blocked()
    );
}

#[test]
fn pruning_contacts_empties_agreement_links_only() {
    let engine = seeded();
    let agreement_body = engine.read(&agreement_ref()).unwrap();

    let mut pruned = 0;
    for id in CONTACT_IDS {
        match engine
            .delete(&contact_ref(id), DeletePolicy::DeleteIncomingLinks)
            .unwrap()
        {
            DeleteOutcome::Deleted { pruned: n } => pruned += n,
            other => panic!("unexpected outcome for {id}: {other:?}"),
        }
    }

    assert_eq!(pruned, 8);
    assert!(engine.outgoing(&agreement_ref()).unwrap().is_empty());
    assert_eq!(engine.read(&agreement_ref()).unwrap(), agreement_body);
    assert_eq!(
        engine
            .delete(&agreement_ref(), DeletePolicy::FailIfIncomingLinks)
            .unwrap(),
        DeleteOutcome::Deleted { pruned: 0 }
    );

    let snapshot = engine.snapshot().unwrap();
    assert!(snapshot.edges().is_empty());
    assert_eq!(snapshot.tracked_entities(), 0);
}
