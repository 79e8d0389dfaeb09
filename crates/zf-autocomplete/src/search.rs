// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Debounced lookups
//!
//! Each binding owns a [`DebouncedSearchController`]. Every keystroke
//! replaces the pending timer; when a timer survives the quiet period the
//! query is resolved against the shared cache, then the remote lookup, then
//! the offline fallback list. The result travels back to the session as a
//! [`SessionMessage::SearchCompleted`].

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};
use zf_config::AutocompleteSettings;
use zf_domain_types::{zip_code, Candidate, CandidateKind, Query};
use zf_lookup::{FallbackCatalog, LookupRequest, RemoteLookup};

use crate::cache::SuggestionCache;
use crate::document::ElementId;
use crate::session::SessionMessage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchSource {
    Cache,
    Remote,
    Fallback,
}

impl SearchSource {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchSource::Cache => "cache",
            SearchSource::Remote => "remote",
            SearchSource::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SearchResult {
    /// Query below the minimum length; the overlay closes
    Hidden,
    Found {
        query: Query,
        candidates: Vec<Candidate>,
        source: SearchSource,
    },
}

impl SearchResult {
    pub fn candidates(&self) -> &[Candidate] {
        match self {
            SearchResult::Hidden => &[],
            SearchResult::Found { candidates, .. } => candidates,
        }
    }

    pub fn source(&self) -> Option<SearchSource> {
        match self {
            SearchResult::Hidden => None,
            SearchResult::Found { source, .. } => Some(*source),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub element: ElementId,
    /// Request sequence of the issuing binding
    pub seq: u64,
    pub result: SearchResult,
}

/// Everything a fired timer needs, shared by all bindings of a session
#[derive(Clone)]
pub struct SearchContext {
    pub settings: Arc<AutocompleteSettings>,
    pub cache: SuggestionCache,
    pub lookup: Arc<dyn RemoteLookup>,
    pub fallback: Arc<FallbackCatalog>,
}

impl std::fmt::Debug for SearchContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchContext")
            .field("settings", &self.settings)
            .field("cache_entries", &self.cache.len())
            .field("fallback_entries", &self.fallback.len())
            .finish_non_exhaustive()
    }
}

impl SearchContext {
    pub fn new(
        settings: AutocompleteSettings,
        lookup: Arc<dyn RemoteLookup>,
        fallback: FallbackCatalog,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            cache: SuggestionCache::new(),
            lookup,
            fallback: Arc::new(fallback),
        }
    }

    /// Cache, then remote, then fallback. Remote results (empty ones included)
    /// are cached; fallback results never are.
    pub async fn resolve(&self, kind: CandidateKind, raw: &str) -> SearchResult {
        let Some(query) = Query::normalize(raw, self.settings.min_query_length) else {
            return SearchResult::Hidden;
        };

        if let Some(candidates) = self.cache.get(kind, &query) {
            return SearchResult::Found {
                query,
                candidates,
                source: SearchSource::Cache,
            };
        }

        let request = LookupRequest::new(kind, raw.trim(), self.settings.max_results);
        match self.lookup.search(&request).await {
            Ok(candidates) => {
                for odd in candidates.iter().filter(|c| !zip_code::is_well_formed(&c.zip_code)) {
                    debug!(zip = %odd.zip_code, "lookup returned an unusual ZIP code");
                }
                self.cache.insert(kind, query.clone(), candidates.clone());
                SearchResult::Found {
                    query,
                    candidates,
                    source: SearchSource::Remote,
                }
            }
            Err(error) => {
                warn!(%kind, query = %request.query, %error, "lookup failed, using fallback list");
                let candidates = self.fallback.filter(raw);
                SearchResult::Found {
                    query,
                    candidates,
                    source: SearchSource::Fallback,
                }
            }
        }
    }
}

/// Per-binding debounce timer and request sequence
///
/// Must be driven from inside a Tokio runtime.
#[derive(Debug)]
pub struct DebouncedSearchController {
    element: ElementId,
    kind: CandidateKind,
    delay: Duration,
    pending: Option<JoinHandle<()>>,
    seq: u64,
}

impl DebouncedSearchController {
    pub fn new(element: ElementId, kind: CandidateKind, delay: Duration) -> Self {
        Self {
            element,
            kind,
            delay,
            pending: None,
            seq: 0,
        }
    }

    /// Restart the quiet period for `raw`, returning the new request sequence.
    pub fn on_input(
        &mut self,
        raw: &str,
        context: &SearchContext,
        sender: &UnboundedSender<SessionMessage>,
    ) -> u64 {
        self.cancel();
        self.seq += 1;

        let seq = self.seq;
        let element = self.element;
        let kind = self.kind;
        let deadline = Instant::now() + self.delay;
        let raw = raw.to_string();
        let context = context.clone();
        let sender = sender.clone();

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            debug!(%element, seq, query = %raw, "debounce timer fired");
            // Detached so that aborting a later timer leaves this request running.
            tokio::spawn(async move {
                let result = context.resolve(kind, &raw).await;
                let _ = sender.send(SessionMessage::SearchCompleted(SearchOutcome {
                    element,
                    seq,
                    result,
                }));
            });
        }));
        seq
    }

    /// Abort the pending timer. Requests already in flight are unaffected.
    pub fn cancel(&mut self) -> bool {
        match self.pending.take() {
            Some(handle) => {
                let was_pending = !handle.is_finished();
                handle.abort();
                was_pending
            }
            None => false,
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }

    pub fn latest_seq(&self) -> u64 {
        self.seq
    }
}

impl Drop for DebouncedSearchController {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zf_lookup::MockLookup;

    fn context(lookup: MockLookup) -> (SearchContext, Arc<MockLookup>) {
        let lookup = Arc::new(lookup);
        let context = SearchContext::new(
            AutocompleteSettings::default(),
            lookup.clone(),
            FallbackCatalog::default(),
        );
        (context, lookup)
    }

    #[tokio::test]
    async fn short_queries_never_reach_the_lookup() {
        let (context, lookup) = context(MockLookup::new());
        assert_eq!(context.resolve(CandidateKind::Zip, " 9 ").await, SearchResult::Hidden);
        assert_eq!(lookup.call_count(), 0);
    }

    #[tokio::test]
    async fn remote_results_are_cached_with_their_order() {
        let candidates = vec![
            Candidate::new("90210", "Beverly Hills", "CA", "Los Angeles"),
            Candidate::new("90028", "Los Angeles", "CA", "Los Angeles"),
        ];
        let (context, lookup) = context(MockLookup::new().with_response("90", candidates.clone()));

        let first = context.resolve(CandidateKind::Zip, "90").await;
        assert_eq!(first.source(), Some(SearchSource::Remote));
        let second = context.resolve(CandidateKind::Zip, "90 ").await;
        assert_eq!(second.source(), Some(SearchSource::Cache));
        assert_eq!(second.candidates(), candidates.as_slice());
        assert_eq!(lookup.call_count(), 1);
    }

    #[tokio::test]
    async fn requests_keep_the_typed_case() {
        let (context, lookup) = context(MockLookup::new());
        context.resolve(CandidateKind::Address, "  Main St ").await;
        let calls = lookup.calls();
        assert_eq!(calls[0].query, "Main St");
        assert_eq!(calls[0].kind, CandidateKind::Address);
        assert_eq!(calls[0].limit, 8);
    }

    #[tokio::test]
    async fn failures_fall_back_without_caching() {
        let (context, _lookup) = context(MockLookup::failing());
        let result = context.resolve(CandidateKind::Zip, "902").await;
        assert_eq!(result.source(), Some(SearchSource::Fallback));
        assert_eq!(result.candidates().len(), 8);
        assert!(result.candidates().iter().all(|c| c.zip_code.starts_with("902")));
        assert!(context.cache.is_empty());
    }
}
