// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use async_trait::async_trait;
use zf_domain_types::Candidate;
use zf_lookup::{LookupError, LookupRequest, LookupResult, RemoteLookup};

/// Lookup that is never reachable, so every search degrades to the fallback list
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineLookup;

#[async_trait]
impl RemoteLookup for OfflineLookup {
    async fn search(&self, request: &LookupRequest) -> LookupResult<Vec<Candidate>> {
        Err(LookupError::Unavailable(format!(
            "offline mode, '{}' not sent",
            request.query
        )))
    }
}
