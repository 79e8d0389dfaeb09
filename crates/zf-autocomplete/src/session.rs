// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Session context: shared cache, lookup, registry of bindings
//!
//! A host creates one [`AutocompleteSession`] per page. Inputs get bound
//! either explicitly with [`AutocompleteSession::register`] or through the
//! session's [`DiscoveryStrategy`] via [`AutocompleteSession::scan`] and the
//! polling [`AutocompleteSession::observe`]. Page interaction is forwarded
//! as [`PageEvent`]s; asynchronous work (debounce timers, lookups, blur
//! grace periods) reports back through [`SessionMessage`]s which the host
//! feeds in with [`AutocompleteSession::pump`] or
//! [`AutocompleteSession::next_message`].

use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};
use zf_config::AutocompleteSettings;
use zf_lookup::{FallbackCatalog, RemoteLookup};

use crate::autofill::{AutoFillReport, FieldAutoFillEngine};
use crate::binding::{AutocompleteBinding, BindingOptions, BindingOrigin};
use crate::cache::SuggestionCache;
use crate::discovery::{DiscoveryStrategy, HeuristicDiscovery};
use crate::document::{ElementId, ElementKind, FormDocument};
use crate::error::BindError;
use crate::list_view::{Key, Overlay};
use crate::search::{SearchContext, SearchOutcome};

/// Results of background work addressed to one binding
#[derive(Debug, Clone, PartialEq)]
pub enum SessionMessage {
    SearchCompleted(SearchOutcome),
    BlurGraceElapsed { element: ElementId, generation: u64 },
}

impl SessionMessage {
    pub fn element(&self) -> ElementId {
        match self {
            SessionMessage::SearchCompleted(outcome) => outcome.element,
            SessionMessage::BlurGraceElapsed { element, .. } => *element,
        }
    }
}

/// Where a document-level click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Element(ElementId),
    /// Inside the overlay anchored to this input
    Overlay(ElementId),
    Elsewhere,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageEvent {
    /// The input's value changed; read it from the document
    Input { element: ElementId },
    KeyDown { element: ElementId, key: Key },
    Focus { element: ElementId },
    Blur { element: ElementId },
    Hover { element: ElementId, row: usize },
    SuggestionClick { element: ElementId, row: usize },
    Click { target: ClickTarget },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Unbound element or a key the overlay does not handle
    Ignored,
    Handled,
    SearchScheduled { seq: u64 },
    Selected(AutoFillReport),
    /// Overlays that were closed
    Dismissed(Vec<ElementId>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObserveReport {
    pub bound: Vec<ElementId>,
    pub removed: Vec<ElementId>,
}

impl ObserveReport {
    pub fn is_empty(&self) -> bool {
        self.bound.is_empty() && self.removed.is_empty()
    }
}

pub struct AutocompleteSession {
    context: SearchContext,
    discovery: Box<dyn DiscoveryStrategy>,
    autofill: FieldAutoFillEngine,
    bindings: BTreeMap<ElementId, AutocompleteBinding>,
    sender: UnboundedSender<SessionMessage>,
    receiver: UnboundedReceiver<SessionMessage>,
    observed_revision: Option<u64>,
    focused: Option<ElementId>,
}

impl std::fmt::Debug for AutocompleteSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteSession")
            .field("context", &self.context)
            .field("bindings", &self.bindings.keys().collect::<Vec<_>>())
            .field("observed_revision", &self.observed_revision)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

impl AutocompleteSession {
    /// Session with the fallback list and discovery taken from `settings`
    pub fn new(settings: AutocompleteSettings, lookup: Arc<dyn RemoteLookup>) -> Self {
        let fallback = FallbackCatalog::from_settings(&settings);
        let discovery = HeuristicDiscovery::from_settings(&settings.discovery);
        let autofill = FieldAutoFillEngine::with_heuristics(settings.discovery.heuristics);
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            context: SearchContext::new(settings, lookup, fallback),
            discovery: Box::new(discovery),
            autofill,
            bindings: BTreeMap::new(),
            sender,
            receiver,
            observed_revision: None,
            focused: None,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackCatalog) -> Self {
        self.context.fallback = Arc::new(fallback);
        self
    }

    pub fn with_discovery(mut self, discovery: impl DiscoveryStrategy + 'static) -> Self {
        self.discovery = Box::new(discovery);
        self
    }

    pub fn with_autofill(mut self, autofill: FieldAutoFillEngine) -> Self {
        self.autofill = autofill;
        self
    }

    pub fn settings(&self) -> &AutocompleteSettings {
        &self.context.settings
    }

    pub fn cache(&self) -> &SuggestionCache {
        &self.context.cache
    }

    pub fn context(&self) -> &SearchContext {
        &self.context
    }

    pub fn binding(&self, element: ElementId) -> Option<&AutocompleteBinding> {
        self.bindings.get(&element)
    }

    pub fn bindings(&self) -> impl Iterator<Item = &AutocompleteBinding> {
        self.bindings.values()
    }

    pub fn is_bound(&self, element: ElementId) -> bool {
        self.bindings.contains_key(&element)
    }

    pub fn overlay(&self, element: ElementId) -> Option<Overlay> {
        self.bindings.get(&element).and_then(AutocompleteBinding::overlay)
    }

    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    fn attach(&mut self, element: ElementId, options: BindingOptions, origin: BindingOrigin) {
        info!(%element, kind = %options.kind, ?origin, "autocomplete bound");
        let debounce = self.context.settings.debounce();
        self.bindings
            .insert(element, AutocompleteBinding::new(element, options, origin, debounce));
    }

    /// Bind every unbound element the discovery strategy accepts.
    /// Returns the newly bound elements; a second scan binds nothing.
    pub fn scan(&mut self, doc: &FormDocument) -> Vec<ElementId> {
        let found: Vec<_> = doc
            .elements()
            .filter(|e| !self.bindings.contains_key(&e.id))
            .filter_map(|e| self.discovery.classify(e).map(|kind| (e.id, kind)))
            .collect();
        for (element, kind) in &found {
            let options = BindingOptions {
                kind: *kind,
                ..BindingOptions::default()
            };
            self.attach(*element, options, BindingOrigin::Discovered);
        }
        found.into_iter().map(|(element, _)| element).collect()
    }

    /// Explicitly bind `element`
    pub fn register(
        &mut self,
        doc: &FormDocument,
        element: ElementId,
        options: BindingOptions,
    ) -> Result<(), BindError> {
        let field = doc.element(element).ok_or(BindError::UnknownElement(element))?;
        if self.bindings.contains_key(&element) {
            return Err(BindError::AlreadyBound(element));
        }
        if !matches!(field.kind, ElementKind::TextInput | ElementKind::TextArea) {
            return Err(BindError::NotTextInput(element));
        }
        self.attach(element, options, BindingOrigin::Registered);
        Ok(())
    }

    pub fn unregister(&mut self, element: ElementId) -> bool {
        match self.bindings.remove(&element) {
            Some(mut binding) => {
                binding.teardown();
                if self.focused == Some(element) {
                    self.focused = None;
                }
                info!(%element, "autocomplete unbound");
                true
            }
            None => false,
        }
    }

    /// Polling observer for pages that do not register late inputs:
    /// when the document structure changed since the last call, bind new
    /// matches and drop bindings whose element disappeared.
    pub fn observe(&mut self, doc: &FormDocument) -> ObserveReport {
        if self.observed_revision == Some(doc.revision()) {
            return ObserveReport::default();
        }
        self.observed_revision = Some(doc.revision());

        let gone: Vec<_> = self
            .bindings
            .keys()
            .copied()
            .filter(|element| !doc.contains(*element))
            .collect();
        for element in &gone {
            self.unregister(*element);
        }
        let report = ObserveReport {
            bound: self.scan(doc),
            removed: gone,
        };
        if !report.is_empty() {
            debug!(revision = doc.revision(), ?report, "document change observed");
        }
        report
    }

    pub fn handle_event(&mut self, doc: &mut FormDocument, event: PageEvent) -> EventOutcome {
        match event {
            PageEvent::Input { element } => {
                let Some(binding) = self.bindings.get_mut(&element) else {
                    return EventOutcome::Ignored;
                };
                let raw = doc.value(element).unwrap_or_default().to_string();
                self.focused = Some(element);
                let seq = binding.on_input(&raw, &self.context, &self.sender);
                EventOutcome::SearchScheduled { seq }
            }
            PageEvent::KeyDown { element, key } => match self.bindings.get_mut(&element) {
                Some(binding) => binding.on_key(key, doc, &self.autofill),
                None => EventOutcome::Ignored,
            },
            PageEvent::Focus { element } => match self.bindings.get_mut(&element) {
                Some(binding) => {
                    self.focused = Some(element);
                    binding.on_focus();
                    EventOutcome::Handled
                }
                None => EventOutcome::Ignored,
            },
            PageEvent::Blur { element } => match self.bindings.get_mut(&element) {
                Some(binding) => {
                    if self.focused == Some(element) {
                        self.focused = None;
                    }
                    binding.on_blur(self.context.settings.blur_grace(), &self.sender);
                    EventOutcome::Handled
                }
                None => EventOutcome::Ignored,
            },
            PageEvent::Hover { element, row } => match self.bindings.get_mut(&element) {
                Some(binding) => {
                    if binding.on_hover(row) {
                        EventOutcome::Handled
                    } else {
                        EventOutcome::Ignored
                    }
                }
                None => EventOutcome::Ignored,
            },
            PageEvent::SuggestionClick { element, row } => match self.bindings.get_mut(&element) {
                Some(binding) => binding.on_suggestion_click(row, doc, &self.autofill),
                None => EventOutcome::Ignored,
            },
            PageEvent::Click { target } => {
                let keep = match target {
                    ClickTarget::Element(element) | ClickTarget::Overlay(element) => Some(element),
                    ClickTarget::Elsewhere => None,
                };
                let closed: Vec<_> = self
                    .bindings
                    .values_mut()
                    .filter(|binding| Some(binding.element()) != keep)
                    .filter_map(|binding| binding.dismiss().then(|| binding.element()))
                    .collect();
                if closed.is_empty() {
                    EventOutcome::Ignored
                } else {
                    EventOutcome::Dismissed(closed)
                }
            }
        }
    }

    /// Route one message to its binding. Returns whether it changed anything.
    pub fn apply(&mut self, message: SessionMessage) -> bool {
        let element = message.element();
        let Some(binding) = self.bindings.get_mut(&element) else {
            debug!(%element, "message for a removed binding");
            return false;
        };
        match message {
            SessionMessage::SearchCompleted(outcome) => {
                binding.apply_outcome(outcome, self.context.settings.discard_stale_responses)
            }
            SessionMessage::BlurGraceElapsed { generation, .. } => {
                binding.on_blur_elapsed(generation)
            }
        }
    }

    /// Apply every message that is already waiting. Returns how many arrived.
    pub fn pump(&mut self) -> usize {
        let mut count = 0;
        while let Ok(message) = self.receiver.try_recv() {
            self.apply(message);
            count += 1;
        }
        count
    }

    /// Wait for the next message, apply it and hand back what it was.
    pub async fn next_message(&mut self) -> Option<SessionMessage> {
        let message = self.receiver.recv().await?;
        self.apply(message.clone());
        Some(message)
    }
}
