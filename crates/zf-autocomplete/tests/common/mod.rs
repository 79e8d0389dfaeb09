// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

#![allow(dead_code)]

use std::sync::Arc;
use zf_autocomplete::{
    AutocompleteSession, ElementId, EventOutcome, FieldSpec, FormDocument, PageEvent,
    SearchOutcome, SessionMessage,
};
use zf_config::AutocompleteSettings;
use zf_domain_types::{Candidate, CandidateKind};
use zf_lookup::MockLookup;

pub fn beverly_hills() -> Candidate {
    Candidate::new("90210", "Beverly Hills", "CA", "Los Angeles")
        .with_coordinates(34.0901, -118.4065)
}

pub fn rodeo_drive() -> Candidate {
    Candidate::new("90210", "Beverly Hills", "CA", "Los Angeles")
        .with_display("1 Rodeo Dr, Beverly Hills, CA 90210")
        .with_kind(CandidateKind::Address)
}

pub fn session(lookup: &Arc<MockLookup>) -> AutocompleteSession {
    session_with(lookup, AutocompleteSettings::default())
}

pub fn session_with(
    lookup: &Arc<MockLookup>,
    settings: AutocompleteSettings,
) -> AutocompleteSession {
    AutocompleteSession::new(settings, lookup.clone())
}

/// Let spawned timer and lookup tasks run on the paused runtime
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

pub fn type_text(
    session: &mut AutocompleteSession,
    doc: &mut FormDocument,
    element: ElementId,
    text: &str,
) -> EventOutcome {
    doc.set_value(element, text);
    session.handle_event(doc, PageEvent::Input { element })
}

pub async fn next_search(session: &mut AutocompleteSession) -> SearchOutcome {
    match session.next_message().await {
        Some(SessionMessage::SearchCompleted(outcome)) => outcome,
        other => panic!("expected a search result, got {other:?}"),
    }
}

pub struct IntakePage {
    pub doc: FormDocument,
    pub zip: ElementId,
    pub city: ElementId,
    pub state: ElementId,
    pub county: ElementId,
    pub notes_county: ElementId,
}

/// A service intake form with a discoverable ZIP input
pub fn intake_page() -> IntakePage {
    let mut doc = FormDocument::new();
    let form = doc.add_form("intake");
    let zip = doc.insert_element(
        Some(form),
        FieldSpec::text("zipCode").with_class("zip-autocomplete"),
    );
    let city = doc.insert_element(Some(form), FieldSpec::text("customerCity").with_value("Old"));
    let state = doc.insert_element(Some(form), FieldSpec::text("customerState"));
    let county = doc.insert_element(Some(form), FieldSpec::text("serviceCountyName"));
    let notes_county =
        doc.insert_element(Some(form), FieldSpec::text("previousCounty").with_value("Orange"));
    IntakePage {
        doc,
        zip,
        city,
        state,
        county,
        notes_county,
    }
}
