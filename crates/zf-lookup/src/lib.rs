// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Location lookup for the zipfill autocomplete engine
//!
//! The engine talks to lookups only through the [`RemoteLookup`] trait.
//! [`HttpLookup`] queries the ZIP and address search endpoints and folds
//! their differing payloads into [`Candidate`]s; [`FallbackCatalog`] is the
//! small static list searched locally when the remote side fails.
//!
//! [`Candidate`]: zf_domain_types::Candidate

pub mod api;
pub mod client;
pub mod error;
pub mod fallback;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod payload;

pub use api::*;
pub use client::HttpLookup;
pub use error::*;
pub use fallback::FallbackCatalog;
#[cfg(any(test, feature = "test-utils"))]
pub use mock::MockLookup;
