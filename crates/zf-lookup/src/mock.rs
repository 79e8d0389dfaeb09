// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Scripted [`RemoteLookup`] for tests

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use zf_domain_types::Candidate;

use crate::api::{LookupRequest, RemoteLookup};
use crate::error::{LookupError, LookupResult};

#[derive(Debug, Clone)]
enum Scripted {
    Respond(Vec<Candidate>),
    Fail,
}

/// Answers queries from a script and records every request it receives
///
/// Unscripted queries return an empty list unless [`MockLookup::failing`]
/// was used. Delays are applied with `tokio::time::sleep`, so paused-clock
/// tests control them with `tokio::time::advance`.
#[derive(Debug, Default)]
pub struct MockLookup {
    script: Mutex<HashMap<String, Scripted>>,
    delays: Mutex<HashMap<String, Duration>>,
    fail_unscripted: bool,
    calls: Mutex<Vec<LookupRequest>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// A lookup whose every unscripted query fails like an unreachable server
    pub fn failing() -> Self {
        Self {
            fail_unscripted: true,
            ..Self::default()
        }
    }

    pub fn with_response(self, query: &str, candidates: Vec<Candidate>) -> Self {
        self.set_response(query, candidates);
        self
    }

    pub fn with_failure(self, query: &str) -> Self {
        lock(&self.script).insert(query.to_string(), Scripted::Fail);
        self
    }

    pub fn with_delay(self, query: &str, delay: Duration) -> Self {
        lock(&self.delays).insert(query.to_string(), delay);
        self
    }

    pub fn set_response(&self, query: &str, candidates: Vec<Candidate>) {
        lock(&self.script).insert(query.to_string(), Scripted::Respond(candidates));
    }

    pub fn calls(&self) -> Vec<LookupRequest> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl RemoteLookup for MockLookup {
    async fn search(&self, request: &LookupRequest) -> LookupResult<Vec<Candidate>> {
        lock(&self.calls).push(request.clone());

        let delay = lock(&self.delays).get(&request.query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let scripted = lock(&self.script).get(&request.query).cloned();
        match scripted {
            Some(Scripted::Respond(candidates)) => {
                Ok(candidates.into_iter().take(request.limit).collect())
            }
            Some(Scripted::Fail) => Err(LookupError::Unavailable(format!(
                "scripted failure for '{}'",
                request.query
            ))),
            None if self.fail_unscripted => {
                Err(LookupError::Unavailable("mock lookup offline".to_string()))
            }
            None => Ok(Vec::new()),
        }
    }
}
