// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Host page model
//!
//! The engine never touches a browser. The host keeps its inputs in a
//! [`FormDocument`], mirrors user typing with [`FormDocument::set_value`]
//! and drains the [`DocumentEvent`]s the engine dispatches when it writes
//! values back.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use zf_domain_types::Candidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    #[default]
    TextInput,
    TextArea,
    Select,
    Hidden,
}

/// Attributes of a field as the host describes it
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSpec {
    pub kind: ElementKind,
    pub name: String,
    /// The element's DOM-style `id` attribute
    #[serde(rename = "id")]
    pub dom_id: String,
    pub placeholder: String,
    pub classes: Vec<String>,
    pub value: String,
}

impl FieldSpec {
    pub fn text(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: ElementKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_id(mut self, dom_id: impl Into<String>) -> Self {
        self.dom_id = dom_id.into();
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// A field living in a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldElement {
    pub id: ElementId,
    pub form: Option<FormId>,
    pub kind: ElementKind,
    pub name: String,
    pub dom_id: String,
    pub placeholder: String,
    pub classes: Vec<String>,
    pub value: String,
}

impl FieldElement {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// True when either `name` or the DOM id equals `candidate`
    pub fn is_named(&self, candidate: &str) -> bool {
        self.name == candidate || self.dom_id == candidate
    }

    pub fn is_empty(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Notifications dispatched on elements when the engine writes to them
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DocumentEvent {
    /// Generic value-changed notification
    Change { element: ElementId },
    /// A suggestion was committed on this input
    ZipSelected {
        element: ElementId,
        candidate: Candidate,
    },
}

impl DocumentEvent {
    pub fn element(&self) -> ElementId {
        match self {
            DocumentEvent::Change { element } | DocumentEvent::ZipSelected { element, .. } => {
                *element
            }
        }
    }
}

/// Serializable page description the CLI and fixtures build documents from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PageDescription {
    pub forms: Vec<FormDescription>,
    /// Fields outside any form
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FormDescription {
    pub name: String,
    pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, Default)]
pub struct FormDocument {
    forms: BTreeMap<FormId, String>,
    elements: BTreeMap<ElementId, FieldElement>,
    next_id: u64,
    revision: u64,
    events: Vec<DocumentEvent>,
}

impl FormDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(page: PageDescription) -> Self {
        let mut doc = Self::new();
        for form in page.forms {
            let form_id = doc.add_form(form.name);
            for field in form.fields {
                doc.insert_element(Some(form_id), field);
            }
        }
        for field in page.fields {
            doc.insert_element(None, field);
        }
        doc
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_form(&mut self, name: impl Into<String>) -> FormId {
        let id = FormId(self.next());
        self.forms.insert(id, name.into());
        id
    }

    pub fn form_name(&self, form: FormId) -> Option<&str> {
        self.forms.get(&form).map(String::as_str)
    }

    /// Insert a field, inside `form` or at document level
    pub fn insert_element(&mut self, form: Option<FormId>, spec: FieldSpec) -> ElementId {
        let id = ElementId(self.next());
        let form = form.filter(|f| self.forms.contains_key(f));
        self.elements.insert(
            id,
            FieldElement {
                id,
                form,
                kind: spec.kind,
                name: spec.name,
                dom_id: spec.dom_id,
                placeholder: spec.placeholder,
                classes: spec.classes,
                value: spec.value,
            },
        );
        self.revision += 1;
        id
    }

    pub fn remove_element(&mut self, id: ElementId) -> Option<FieldElement> {
        let removed = self.elements.remove(&id);
        if removed.is_some() {
            self.revision += 1;
        }
        removed
    }

    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    pub fn element(&self, id: ElementId) -> Option<&FieldElement> {
        self.elements.get(&id)
    }

    pub fn element_mut(&mut self, id: ElementId) -> Option<&mut FieldElement> {
        self.elements.get_mut(&id)
    }

    pub fn value(&self, id: ElementId) -> Option<&str> {
        self.elements.get(&id).map(|e| e.value.as_str())
    }

    /// Set a value without dispatching anything (what typing does)
    pub fn set_value(&mut self, id: ElementId, value: impl Into<String>) -> bool {
        match self.element_mut(id) {
            Some(element) => {
                element.value = value.into();
                true
            }
            None => false,
        }
    }

    /// Elements in document order
    pub fn elements(&self) -> impl Iterator<Item = &FieldElement> {
        self.elements.values()
    }

    /// Members of `form`, or every element when `form` is `None`
    pub fn elements_in_scope(&self, form: Option<FormId>) -> impl Iterator<Item = &FieldElement> {
        self.elements.values().filter(move |e| form.is_none() || e.form == form)
    }

    /// First element whose name or DOM id equals `name`
    pub fn find(&self, name: &str) -> Option<ElementId> {
        self.elements.values().find(|e| e.is_named(name)).map(|e| e.id)
    }

    /// Bumped on every insertion and removal
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn dispatch(&mut self, event: DocumentEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[DocumentEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<DocumentEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_is_form_or_whole_document() {
        let mut doc = FormDocument::new();
        let billing = doc.add_form("billing");
        let in_form = doc.insert_element(Some(billing), FieldSpec::text("billingCity"));
        let outside = doc.insert_element(None, FieldSpec::text("city"));

        let scoped: Vec<_> = doc.elements_in_scope(Some(billing)).map(|e| e.id).collect();
        assert_eq!(scoped, vec![in_form]);
        let all: Vec<_> = doc.elements_in_scope(None).map(|e| e.id).collect();
        assert_eq!(all, vec![in_form, outside]);
    }

    #[test]
    fn revision_tracks_structure_not_values() {
        let mut doc = FormDocument::new();
        let id = doc.insert_element(None, FieldSpec::text("zip"));
        let after_insert = doc.revision();
        doc.set_value(id, "90210");
        assert_eq!(doc.revision(), after_insert);
        doc.remove_element(id);
        assert!(doc.revision() > after_insert);
        assert!(doc.remove_element(id).is_none());
    }

    #[test]
    fn page_description_from_json() {
        let page: PageDescription = serde_json::from_str(
            r#"{
                "forms": [{ "name": "intake", "fields": [
                    { "name": "zipCode", "classes": ["zip-autocomplete"] },
                    { "name": "customerCity", "value": "Old" }
                ]}],
                "fields": [{ "id": "search", "placeholder": "Search" }]
            }"#,
        )
        .unwrap();
        let doc = FormDocument::from_description(page);
        let zip = doc.find("zipCode").unwrap();
        assert!(doc.element(zip).unwrap().has_class("zip-autocomplete"));
        assert_eq!(doc.value(doc.find("customerCity").unwrap()), Some("Old"));
        assert_eq!(doc.element(doc.find("search").unwrap()).unwrap().form, None);
    }
}
