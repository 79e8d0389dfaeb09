// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};
use zf_domain_types::{Candidate, CandidateKind};

use crate::autofill::{AutoFillReport, FieldAutoFillEngine, FieldMapping};
use crate::document::{ElementId, FormDocument};
use crate::list_view::{Key, ListKeyResult, Overlay, SuggestionListView};
use crate::search::{DebouncedSearchController, SearchContext, SearchOutcome, SearchResult};
use crate::session::{EventOutcome, SessionMessage};

pub type BindingKind = CandidateKind;

/// Called with the committed candidate after the fields were filled
pub type SelectionCallback = Arc<dyn Fn(ElementId, &Candidate) + Send + Sync>;

#[derive(Clone, Default)]
pub struct BindingOptions {
    pub kind: BindingKind,
    pub mapping: FieldMapping,
    pub on_select: Option<SelectionCallback>,
}

impl std::fmt::Debug for BindingOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingOptions")
            .field("kind", &self.kind)
            .field("mapping", &self.mapping)
            .field("on_select", &self.on_select.is_some())
            .finish()
    }
}

impl BindingOptions {
    pub fn zip() -> Self {
        Self::default()
    }

    pub fn address() -> Self {
        Self {
            kind: CandidateKind::Address,
            ..Self::default()
        }
    }

    pub fn with_mapping(mut self, mapping: FieldMapping) -> Self {
        self.mapping = mapping;
        self
    }

    pub fn on_select(
        mut self,
        callback: impl Fn(ElementId, &Candidate) + Send + Sync + 'static,
    ) -> Self {
        self.on_select = Some(Arc::new(callback));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingOrigin {
    Discovered,
    Registered,
}

/// Point-in-time view of a binding, for hosts and tests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingState {
    pub element: ElementId,
    pub kind: BindingKind,
    pub origin: BindingOrigin,
    pub container_created: bool,
    pub has_pending_timer: bool,
    pub highlighted_index: isize,
    pub overlay_open: bool,
    pub focused: bool,
    pub latest_seq: u64,
    pub applied_seq: u64,
}

/// Autocomplete behavior attached to one input
pub struct AutocompleteBinding {
    element: ElementId,
    options: BindingOptions,
    origin: BindingOrigin,
    controller: DebouncedSearchController,
    view: SuggestionListView,
    focused: bool,
    blur_timer: Option<JoinHandle<()>>,
    blur_generation: u64,
    // set once the blur grace has run out; cleared by focus or typing
    blurred_out: bool,
    applied_seq: u64,
}

impl std::fmt::Debug for AutocompleteBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutocompleteBinding")
            .field("state", &self.state())
            .field("options", &self.options)
            .finish()
    }
}

impl AutocompleteBinding {
    pub(crate) fn new(
        element: ElementId,
        options: BindingOptions,
        origin: BindingOrigin,
        debounce: Duration,
    ) -> Self {
        Self {
            element,
            controller: DebouncedSearchController::new(element, options.kind, debounce),
            view: SuggestionListView::new(element),
            options,
            origin,
            focused: false,
            blur_timer: None,
            blur_generation: 0,
            blurred_out: false,
            applied_seq: 0,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn kind(&self) -> BindingKind {
        self.options.kind
    }

    pub fn mapping(&self) -> &FieldMapping {
        &self.options.mapping
    }

    pub fn view(&self) -> &SuggestionListView {
        &self.view
    }

    pub fn overlay(&self) -> Option<Overlay> {
        self.view.overlay()
    }

    pub fn state(&self) -> BindingState {
        BindingState {
            element: self.element,
            kind: self.options.kind,
            origin: self.origin,
            container_created: self.view.container_created(),
            has_pending_timer: self.controller.has_pending(),
            highlighted_index: self.view.highlighted_index(),
            overlay_open: self.view.is_open(),
            focused: self.focused,
            latest_seq: self.controller.latest_seq(),
            applied_seq: self.applied_seq,
        }
    }

    pub(crate) fn on_input(
        &mut self,
        raw: &str,
        context: &SearchContext,
        sender: &UnboundedSender<SessionMessage>,
    ) -> u64 {
        self.focused = true;
        self.blurred_out = false;
        self.cancel_blur();
        self.controller.on_input(raw, context, sender)
    }

    pub(crate) fn on_key(
        &mut self,
        key: Key,
        doc: &mut FormDocument,
        engine: &FieldAutoFillEngine,
    ) -> EventOutcome {
        match self.view.handle_key(key) {
            ListKeyResult::Consumed => EventOutcome::Handled,
            ListKeyResult::Commit(candidate) => {
                EventOutcome::Selected(self.commit(doc, &candidate, engine))
            }
            ListKeyResult::Dismissed => EventOutcome::Dismissed(vec![self.element]),
            ListKeyResult::Ignored => EventOutcome::Ignored,
        }
    }

    pub(crate) fn on_focus(&mut self) {
        self.focused = true;
        self.blurred_out = false;
        self.cancel_blur();
    }

    pub(crate) fn on_blur(&mut self, grace: Duration, sender: &UnboundedSender<SessionMessage>) {
        self.focused = false;
        self.cancel_blur();
        self.blur_generation += 1;

        let element = self.element;
        let generation = self.blur_generation;
        let deadline = Instant::now() + grace;
        let sender = sender.clone();
        self.blur_timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = sender.send(SessionMessage::BlurGraceElapsed { element, generation });
        }));
    }

    /// Close the overlay if the input is still blurred since `generation`
    pub(crate) fn on_blur_elapsed(&mut self, generation: u64) -> bool {
        if generation != self.blur_generation || self.focused {
            return false;
        }
        self.blur_timer = None;
        self.blurred_out = true;
        let was_open = self.view.is_open();
        self.view.dismiss();
        was_open
    }

    pub(crate) fn on_hover(&mut self, row: usize) -> bool {
        self.view.hover(row)
    }

    pub(crate) fn on_suggestion_click(
        &mut self,
        row: usize,
        doc: &mut FormDocument,
        engine: &FieldAutoFillEngine,
    ) -> EventOutcome {
        match self.view.candidate(row).cloned() {
            Some(candidate) => EventOutcome::Selected(self.commit(doc, &candidate, engine)),
            None => EventOutcome::Ignored,
        }
    }

    fn commit(
        &mut self,
        doc: &mut FormDocument,
        candidate: &Candidate,
        engine: &FieldAutoFillEngine,
    ) -> AutoFillReport {
        let report = engine.apply(
            doc,
            self.element,
            candidate,
            &self.options.mapping,
            self.options.kind,
        );
        self.view.dismiss();
        info!(
            element = %self.element,
            zip = %candidate.zip_code,
            filled = report.filled.len(),
            "suggestion selected"
        );
        if let Some(callback) = &self.options.on_select {
            callback(self.element, candidate);
        }
        report
    }

    pub(crate) fn dismiss(&mut self) -> bool {
        let was_open = self.view.is_open();
        self.view.dismiss();
        was_open
    }

    /// Show a finished search unless a newer one was already applied
    pub(crate) fn apply_outcome(&mut self, outcome: SearchOutcome, discard_stale: bool) -> bool {
        if discard_stale && outcome.seq < self.applied_seq {
            debug!(
                element = %self.element,
                seq = outcome.seq,
                applied = self.applied_seq,
                "discarding stale search result"
            );
            return false;
        }
        self.applied_seq = self.applied_seq.max(outcome.seq);
        if self.blurred_out {
            debug!(element = %self.element, seq = outcome.seq, "input left; not reopening overlay");
            return false;
        }
        match outcome.result {
            SearchResult::Hidden => self.view.dismiss(),
            SearchResult::Found { candidates, .. } => self.view.render(candidates),
        }
        true
    }

    fn cancel_blur(&mut self) {
        if let Some(handle) = self.blur_timer.take() {
            handle.abort();
        }
    }

    /// Stop timers and close the overlay; the binding is about to be dropped
    pub(crate) fn teardown(&mut self) {
        self.controller.cancel();
        self.cancel_blur();
        self.view.dismiss();
    }
}

impl Drop for AutocompleteBinding {
    fn drop(&mut self) {
        self.cancel_blur();
    }
}
