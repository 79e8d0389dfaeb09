// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! ZIP and address autocomplete for form inputs
//!
//! The engine is host-agnostic: pages are modelled by [`FormDocument`],
//! user interaction arrives as [`PageEvent`]s and results surface as
//! [`Overlay`] snapshots plus [`DocumentEvent`]s dispatched on the fields the
//! engine writes. All state lives in an [`AutocompleteSession`]; there are
//! no globals.

pub mod autofill;
pub mod binding;
pub mod cache;
pub mod discovery;
pub mod document;
pub mod error;
pub mod list_view;
pub mod search;
pub mod session;

pub use autofill::{AutoFillReport, AutoFillRules, FieldAutoFillEngine, FieldMapping, FieldTarget};
pub use binding::{AutocompleteBinding, BindingKind, BindingOptions, BindingState};
pub use cache::SuggestionCache;
pub use discovery::{DiscoveryStrategy, ExplicitOnly, HeuristicDiscovery};
pub use document::{
    DocumentEvent, ElementId, ElementKind, FieldElement, FieldSpec, FormDocument, FormId,
    PageDescription,
};
pub use error::BindError;
pub use list_view::{Key, ListKeyResult, Overlay, SuggestionListView, SuggestionRow};
pub use search::{DebouncedSearchController, SearchOutcome, SearchResult, SearchSource};
pub use session::{
    AutocompleteSession, ClickTarget, EventOutcome, ObserveReport, PageEvent, SessionMessage,
};
