// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use zf_domain_types::{Candidate, CandidateKind};

use crate::error::LookupResult;

/// One search against a lookup endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRequest {
    pub kind: CandidateKind,
    /// The query as typed (trimmed, case preserved)
    pub query: String,
    pub limit: usize,
}

impl LookupRequest {
    pub fn new(kind: CandidateKind, query: impl Into<String>, limit: usize) -> Self {
        Self {
            kind,
            query: query.into(),
            limit,
        }
    }
}

/// Source of ranked location candidates for a partial query
///
/// Implementations return candidates in relevance order; callers preserve
/// that order when caching and displaying them.
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    async fn search(&self, request: &LookupRequest) -> LookupResult<Vec<Candidate>>;
}
