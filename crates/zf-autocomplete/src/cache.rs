// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use zf_domain_types::{Candidate, CandidateKind, Query};

/// Session-wide memo of lookup results
///
/// Entries are keyed by lookup kind and normalized query, never evicted and
/// never invalidated. Empty result lists are stored too, so a query that
/// found nothing is not re-issued. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct SuggestionCache {
    entries: Arc<Mutex<HashMap<(CandidateKind, Query), Vec<Candidate>>>>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<(CandidateKind, Query), Vec<Candidate>>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, kind: CandidateKind, query: &Query) -> Option<Vec<Candidate>> {
        let hit = self.lock().get(&(kind, query.clone())).cloned();
        debug!(%kind, %query, hit = hit.is_some(), "suggestion cache lookup");
        hit
    }

    pub fn insert(&self, kind: CandidateKind, query: Query, candidates: Vec<Candidate>) {
        debug!(%kind, %query, count = candidates.len(), "caching suggestions");
        self.lock().insert((kind, query), candidates);
    }

    pub fn contains(&self, kind: CandidateKind, query: &Query) -> bool {
        self.lock().contains_key(&(kind, query.clone()))
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
