// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Writing a committed candidate into the page
//!
//! Related fields are resolved per [`FieldAttribute`] in three tiers:
//!
//! 1. an explicit [`FieldMapping`] target, always overwritten;
//! 2. the first present name from the attribute's priority list, always
//!    overwritten;
//! 3. every field whose name or id contains one of the attribute's
//!    fallback substrings, written only while empty.
//!
//! Tiers 2 and 3 are heuristics and can be switched off. The search scope
//! is the trigger's enclosing form, or the whole document for inputs
//! outside any form.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use zf_domain_types::{Candidate, CandidateKind, FieldAttribute};

use crate::document::{DocumentEvent, ElementId, ElementKind, FieldElement, FormDocument, FormId};

/// Where an explicitly mapped value goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldTarget {
    Element(ElementId),
    /// Matched against `name` and then the DOM id, within the trigger's scope
    Name(String),
}

/// Declarative per-binding field mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    /// Receives the ZIP code (useful for address bindings)
    pub zip: Option<FieldTarget>,
    pub city: Option<FieldTarget>,
    pub state: Option<FieldTarget>,
    pub county: Option<FieldTarget>,
}

impl FieldMapping {
    pub fn target(&self, attribute: FieldAttribute) -> Option<&FieldTarget> {
        match attribute {
            FieldAttribute::City => self.city.as_ref(),
            FieldAttribute::State => self.state.as_ref(),
            FieldAttribute::County => self.county.as_ref(),
        }
    }

    pub fn with(mut self, attribute: FieldAttribute, target: FieldTarget) -> Self {
        let slot = match attribute {
            FieldAttribute::City => &mut self.city,
            FieldAttribute::State => &mut self.state,
            FieldAttribute::County => &mut self.county,
        };
        *slot = Some(target);
        self
    }

    pub fn with_zip(mut self, target: FieldTarget) -> Self {
        self.zip = Some(target);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeRule {
    /// Exact names in priority order; the first one present wins
    pub exact_names: Vec<String>,
    /// Lowercase substrings for the fill-if-empty pass
    pub patterns: Vec<String>,
}

impl AttributeRule {
    fn new(exact_names: &[&str], patterns: &[&str]) -> Self {
        Self {
            exact_names: exact_names.iter().map(|s| s.to_string()).collect(),
            patterns: patterns.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn matches_pattern(&self, element: &FieldElement) -> bool {
        let name = element.name.to_lowercase();
        let id = element.dom_id.to_lowercase();
        self.patterns
            .iter()
            .any(|p| (!name.is_empty() && name.contains(p)) || (!id.is_empty() && id.contains(p)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoFillRules {
    pub city: AttributeRule,
    pub state: AttributeRule,
    pub county: AttributeRule,
}

impl Default for AutoFillRules {
    fn default() -> Self {
        Self {
            city: AttributeRule::new(
                &[
                    "customerCity",
                    "serviceCity",
                    "callerCity",
                    "billingCity",
                    "shippingCity",
                    "city",
                ],
                &["city", "town", "municipality"],
            ),
            state: AttributeRule::new(
                &[
                    "customerState",
                    "serviceState",
                    "callerState",
                    "billingState",
                    "shippingState",
                    "state",
                ],
                &["state", "province", "region"],
            ),
            county: AttributeRule::new(
                &[
                    "customerCounty",
                    "serviceCounty",
                    "callerCounty",
                    "billingCounty",
                    "shippingCounty",
                    "county",
                ],
                &["county", "parish", "borough"],
            ),
        }
    }
}

impl AutoFillRules {
    pub fn rule(&self, attribute: FieldAttribute) -> &AttributeRule {
        match attribute {
            FieldAttribute::City => &self.city,
            FieldAttribute::State => &self.state,
            FieldAttribute::County => &self.county,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillSource {
    Trigger,
    Mapped,
    ExactName,
    Pattern,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilledField {
    pub element: ElementId,
    pub attribute: Option<FieldAttribute>,
    pub value: String,
    pub source: FillSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AutoFillReport {
    pub filled: Vec<FilledField>,
    /// Pattern matches left alone because they already had content
    pub skipped_non_empty: Vec<ElementId>,
}

impl AutoFillReport {
    pub fn value_of(&self, element: ElementId) -> Option<&str> {
        self.filled
            .iter()
            .rev()
            .find(|f| f.element == element)
            .map(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, Default)]
pub struct FieldAutoFillEngine {
    rules: AutoFillRules,
    heuristics: bool,
}

impl FieldAutoFillEngine {
    pub fn new(rules: AutoFillRules, heuristics: bool) -> Self {
        Self { rules, heuristics }
    }

    pub fn with_heuristics(heuristics: bool) -> Self {
        Self::new(AutoFillRules::default(), heuristics)
    }

    pub fn rules(&self) -> &AutoFillRules {
        &self.rules
    }

    /// Commit `candidate` on `trigger`: fill related fields, then the trigger
    /// itself, dispatching a `Change` per written field and one `ZipSelected`.
    pub fn apply(
        &self,
        doc: &mut FormDocument,
        trigger: ElementId,
        candidate: &Candidate,
        mapping: &FieldMapping,
        kind: CandidateKind,
    ) -> AutoFillReport {
        let mut report = AutoFillReport::default();
        let Some(scope) = doc.element(trigger).map(|e| e.form) else {
            warn!(element = %trigger, "selection on an element that left the document");
            return report;
        };

        if let Some(target) = &mapping.zip {
            match resolve_target(doc, trigger, scope, target) {
                Some(element) => write(
                    doc,
                    &mut report,
                    element,
                    None,
                    &candidate.zip_code,
                    FillSource::Mapped,
                ),
                None => warn!(?target, "mapped zip target not found"),
            }
        }

        for attribute in FieldAttribute::ALL {
            let value = candidate.value_for(attribute);
            if value.is_empty() {
                continue;
            }

            if let Some(target) = mapping.target(attribute) {
                if let Some(element) = resolve_target(doc, trigger, scope, target) {
                    write(doc, &mut report, element, Some(attribute), value, FillSource::Mapped);
                    continue;
                }
                warn!(%attribute, ?target, "mapped field not found");
            }

            if !self.heuristics {
                continue;
            }

            let rule = self.rules.rule(attribute);
            let exact = rule.exact_names.iter().find_map(|name| {
                doc.elements_in_scope(scope)
                    .find(|e| e.id != trigger && e.is_named(name))
                    .map(|e| e.id)
            });
            if let Some(element) = exact {
                write(doc, &mut report, element, Some(attribute), value, FillSource::ExactName);
                continue;
            }

            let (empty, occupied): (Vec<_>, Vec<_>) = doc
                .elements_in_scope(scope)
                .filter(|e| e.id != trigger && e.kind != ElementKind::Hidden)
                .filter(|e| rule.matches_pattern(e))
                .partition(|e| e.is_empty());
            let empty: Vec<ElementId> = empty.into_iter().map(|e| e.id).collect();
            report.skipped_non_empty.extend(occupied.into_iter().map(|e| e.id));
            for element in empty {
                write(doc, &mut report, element, Some(attribute), value, FillSource::Pattern);
            }
        }

        let own_value = match kind {
            CandidateKind::Zip => candidate.zip_code.clone(),
            CandidateKind::Address => candidate.formatted_address(),
        };
        write(doc, &mut report, trigger, None, &own_value, FillSource::Trigger);
        doc.dispatch(DocumentEvent::ZipSelected {
            element: trigger,
            candidate: candidate.clone(),
        });

        report
    }
}

fn resolve_target(
    doc: &FormDocument,
    trigger: ElementId,
    scope: Option<FormId>,
    target: &FieldTarget,
) -> Option<ElementId> {
    match target {
        FieldTarget::Element(id) => Some(*id).filter(|id| *id != trigger && doc.contains(*id)),
        FieldTarget::Name(name) => doc
            .elements_in_scope(scope)
            .find(|e| e.id != trigger && e.is_named(name))
            .map(|e| e.id),
    }
}

fn write(
    doc: &mut FormDocument,
    report: &mut AutoFillReport,
    element: ElementId,
    attribute: Option<FieldAttribute>,
    value: &str,
    source: FillSource,
) {
    if !doc.set_value(element, value) {
        return;
    }
    debug!(%element, ?attribute, ?source, value, "filled field");
    doc.dispatch(DocumentEvent::Change { element });
    report.filled.push(FilledField {
        element,
        attribute,
        value: value.to_string(),
        source,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldSpec;

    fn beverly_hills() -> Candidate {
        Candidate::new("90210", "Beverly Hills", "CA", "Los Angeles")
    }

    #[test]
    fn exact_names_overwrite_and_patterns_fill_only_empty() {
        let mut doc = FormDocument::new();
        let form = doc.add_form("intake");
        let zip = doc.insert_element(Some(form), FieldSpec::text("zipCode"));
        let city =
            doc.insert_element(Some(form), FieldSpec::text("customerCity").with_value("Old"));
        let county_empty =
            doc.insert_element(Some(form), FieldSpec::text("").with_id("homeCountyName"));
        let county_full =
            doc.insert_element(Some(form), FieldSpec::text("mailingCounty").with_value("Kept"));

        let engine = FieldAutoFillEngine::with_heuristics(true);
        let report = engine.apply(
            &mut doc,
            zip,
            &beverly_hills(),
            &FieldMapping::default(),
            CandidateKind::Zip,
        );

        assert_eq!(doc.value(zip), Some("90210"));
        assert_eq!(doc.value(city), Some("Beverly Hills"));
        assert_eq!(doc.value(county_empty), Some("Los Angeles"));
        assert_eq!(doc.value(county_full), Some("Kept"));
        assert_eq!(report.skipped_non_empty, vec![county_full]);
    }

    #[test]
    fn first_priority_name_wins() {
        let mut doc = FormDocument::new();
        let zip = doc.insert_element(None, FieldSpec::text("zip"));
        let billing = doc.insert_element(None, FieldSpec::text("billingCity").with_value("x"));
        let service = doc.insert_element(None, FieldSpec::text("serviceCity").with_value("y"));

        FieldAutoFillEngine::with_heuristics(true).apply(
            &mut doc,
            zip,
            &beverly_hills(),
            &FieldMapping::default(),
            CandidateKind::Zip,
        );
        assert_eq!(doc.value(service), Some("Beverly Hills"));
        assert_eq!(doc.value(billing), Some("x"));
    }

    #[test]
    fn fill_stays_inside_the_trigger_form() {
        let mut doc = FormDocument::new();
        let billing = doc.add_form("billing");
        let shipping = doc.add_form("shipping");
        let zip = doc.insert_element(Some(billing), FieldSpec::text("zip"));
        let billing_city = doc.insert_element(Some(billing), FieldSpec::text("city"));
        let shipping_city = doc.insert_element(Some(shipping), FieldSpec::text("city"));

        FieldAutoFillEngine::with_heuristics(true).apply(
            &mut doc,
            zip,
            &beverly_hills(),
            &FieldMapping::default(),
            CandidateKind::Zip,
        );
        assert_eq!(doc.value(billing_city), Some("Beverly Hills"));
        assert_eq!(doc.value(shipping_city), Some(""));
    }

    #[test]
    fn events_end_with_one_selection() {
        let mut doc = FormDocument::new();
        let zip = doc.insert_element(None, FieldSpec::text("zip"));
        let state = doc.insert_element(None, FieldSpec::text("state"));
        let candidate = beverly_hills();

        FieldAutoFillEngine::with_heuristics(true).apply(
            &mut doc,
            zip,
            &candidate,
            &FieldMapping::default(),
            CandidateKind::Zip,
        );
        let events = doc.drain_events();
        assert_eq!(
            events,
            vec![
                DocumentEvent::Change { element: state },
                DocumentEvent::Change { element: zip },
                DocumentEvent::ZipSelected { element: zip, candidate },
            ]
        );
    }

    #[test]
    fn mapping_works_without_heuristics() {
        let mut doc = FormDocument::new();
        let address = doc.insert_element(None, FieldSpec::text("street"));
        let postal = doc.insert_element(None, FieldSpec::text("postal").with_value("00000"));
        let town = doc.insert_element(None, FieldSpec::text("town"));
        let city = doc.insert_element(None, FieldSpec::text("city"));
        let mapping = FieldMapping::default()
            .with_zip(FieldTarget::Name("postal".into()))
            .with(FieldAttribute::City, FieldTarget::Element(town));
        let candidate = beverly_hills().with_display("1 Rodeo Dr, Beverly Hills, CA 90210");

        let report = FieldAutoFillEngine::with_heuristics(false).apply(
            &mut doc,
            address,
            &candidate,
            &mapping,
            CandidateKind::Address,
        );
        assert_eq!(doc.value(postal), Some("90210"));
        assert_eq!(doc.value(town), Some("Beverly Hills"));
        assert_eq!(doc.value(city), Some(""));
        assert_eq!(report.value_of(address), Some("1 Rodeo Dr, Beverly Hills, CA 90210"));
    }

    #[test]
    fn hidden_fields_are_not_pattern_targets() {
        let mut doc = FormDocument::new();
        let zip = doc.insert_element(None, FieldSpec::text("zip"));
        let hidden = doc.insert_element(
            None,
            FieldSpec::text("cityHidden").with_kind(ElementKind::Hidden),
        );
        FieldAutoFillEngine::with_heuristics(true).apply(
            &mut doc,
            zip,
            &beverly_hills(),
            &FieldMapping::default(),
            CandidateKind::Zip,
        );
        assert_eq!(doc.value(hidden), Some(""));
    }
}
