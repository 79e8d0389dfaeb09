// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Domain types for the zipfill autocomplete engine
//!
//! This crate contains the types shared between the lookup layer, the
//! autocomplete engine and the command line front end. They carry no UI
//! or transport concerns and can be reused in any host.

pub mod candidate;
pub mod field;
pub mod query;
pub mod zip_code;

// Re-export commonly used types
pub use candidate::*;
pub use field::*;
pub use query::*;
