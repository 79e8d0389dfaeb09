// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use thiserror::Error;

pub type LookupResult<T> = Result<T, LookupError>;

/// Failures of a remote lookup; all of them trigger the offline fallback
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("lookup endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed lookup response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid lookup URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("lookup unavailable: {0}")]
    Unavailable(String),
}
