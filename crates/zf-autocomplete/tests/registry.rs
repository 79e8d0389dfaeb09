// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

mod common;

use common::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;
use zf_autocomplete::{
    BindError, BindingOptions, ElementKind, ExplicitOnly, FieldSpec, FormDocument,
};
use zf_domain_types::CandidateKind;
use zf_lookup::MockLookup;

#[test]
fn scanning_twice_binds_once() {
    let lookup = Arc::new(MockLookup::new());
    let mut session = session(&lookup);
    let IntakePage { doc, zip, .. } = intake_page();

    assert_eq!(session.scan(&doc), vec![zip]);
    assert!(session.scan(&doc).is_empty());
    assert_eq!(session.bindings().count(), 1);
}

#[test]
fn register_rejects_double_and_unknown_bindings() {
    let lookup = Arc::new(MockLookup::new());
    let mut session = session(&lookup);
    let mut doc = FormDocument::new();
    let street = doc.insert_element(None, FieldSpec::text("street"));
    let state = doc.insert_element(None, FieldSpec::text("state").with_kind(ElementKind::Select));

    session.register(&doc, street, BindingOptions::address()).unwrap();
    assert_eq!(
        session.register(&doc, street, BindingOptions::zip()),
        Err(BindError::AlreadyBound(street))
    );
    assert_eq!(
        session.register(&doc, state, BindingOptions::zip()),
        Err(BindError::NotTextInput(state))
    );

    let removed = doc.remove_element(street).unwrap().id;
    assert!(session.unregister(removed));
    assert_eq!(
        session.register(&doc, removed, BindingOptions::zip()),
        Err(BindError::UnknownElement(removed))
    );
    assert!(session.binding(street).is_none());
}

#[test]
fn explicit_only_discovers_nothing() {
    let lookup = Arc::new(MockLookup::new());
    let mut session = session(&lookup).with_discovery(ExplicitOnly);
    let IntakePage { doc, zip, .. } = intake_page();

    assert!(session.scan(&doc).is_empty());
    session.register(&doc, zip, BindingOptions::zip()).unwrap();
    assert_eq!(session.binding(zip).unwrap().kind(), CandidateKind::Zip);
}

#[tokio::test(start_paused = true)]
async fn observe_binds_late_inputs_and_drops_removed_ones() {
    let lookup = Arc::new(MockLookup::new());
    let mut session = session(&lookup);
    let IntakePage { mut doc, zip, .. } = intake_page();

    let first = session.observe(&doc);
    assert_eq!(first.bound, vec![zip]);
    assert!(session.observe(&doc).is_empty());

    let late = doc.insert_element(None, FieldSpec::text("").with_placeholder("Postal code"));
    let second = session.observe(&doc);
    assert_eq!(second.bound, vec![late]);
    assert!(second.removed.is_empty());

    type_text(&mut session, &mut doc, late, "90");
    doc.remove_element(late);
    let third = session.observe(&doc);
    assert_eq!(third.removed, vec![late]);
    assert!(!session.is_bound(late));

    time::advance(Duration::from_secs(1)).await;
    settle().await;
    assert_eq!(session.pump(), 0);
    assert_eq!(lookup.call_count(), 0);
    assert_eq!(session.bindings().count(), 1);
}

#[tokio::test(start_paused = true)]
async fn rebinding_after_removal_keeps_the_cache() {
    let lookup = Arc::new(MockLookup::new().with_response("90", vec![beverly_hills()]));
    let mut session = session(&lookup);
    let IntakePage { mut doc, zip, .. } = intake_page();
    session.observe(&doc);

    type_text(&mut session, &mut doc, zip, "90");
    next_search(&mut session).await;
    doc.remove_element(zip);
    session.observe(&doc);

    let replacement = doc.insert_element(None, FieldSpec::text("zip"));
    assert_eq!(session.observe(&doc).bound, vec![replacement]);
    let state = session.binding(replacement).unwrap().state();
    assert!(!state.container_created);
    assert_eq!(state.highlighted_index, -1);

    type_text(&mut session, &mut doc, replacement, "90");
    next_search(&mut session).await;
    assert_eq!(lookup.call_count(), 1);
    assert!(session.binding(replacement).unwrap().state().container_created);
}
