// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Response shapes of the lookup endpoints
//!
//! The ZIP endpoint answers with plain `{zipCode, city, state, county, ...}`
//! records while the address endpoint adds `display` and `type`, sometimes
//! wrapped in an envelope object. Everything here is lenient: every field is
//! optional, common spellings are accepted and numbers may arrive as strings.

use serde::Deserialize;
use serde_json::Value;
use zf_domain_types::{Candidate, CandidateKind, zip_code};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LookupPayload {
    Bare(Vec<RawCandidate>),
    Wrapped(Envelope),
}

#[derive(Debug, Deserialize)]
pub struct Envelope {
    #[serde(default, alias = "suggestions", alias = "data", alias = "items")]
    pub results: Vec<RawCandidate>,
}

impl LookupPayload {
    pub fn into_candidates(
        self,
        request_kind: CandidateKind,
        default_county: &str,
    ) -> Vec<Candidate> {
        let raw = match self {
            LookupPayload::Bare(items) => items,
            LookupPayload::Wrapped(envelope) => envelope.results,
        };
        raw.into_iter()
            .filter_map(|item| item.into_candidate(request_kind, default_county))
            .collect()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCandidate {
    #[serde(default, alias = "zip", alias = "zipcode", alias = "postalCode")]
    pub zip_code: Option<Value>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub county: Option<String>,
    #[serde(default, alias = "lat")]
    pub latitude: Option<Value>,
    #[serde(default, alias = "lng", alias = "lon")]
    pub longitude: Option<Value>,
    #[serde(default)]
    pub display: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

impl RawCandidate {
    /// Normalize into a [`Candidate`]; records without a ZIP are dropped.
    pub fn into_candidate(
        self,
        request_kind: CandidateKind,
        default_county: &str,
    ) -> Option<Candidate> {
        let Some(zip) = self.zip_code.as_ref().and_then(scalar_to_string) else {
            tracing::warn!(
                city = ?self.city,
                display = ?self.display,
                "dropping lookup result without a ZIP code"
            );
            return None;
        };
        if !zip_code::is_well_formed(&zip) {
            tracing::debug!(zip = %zip, "lookup returned an unusual ZIP code");
        }

        let county = self
            .county
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| default_county.to_string());
        let kind = self
            .kind
            .as_deref()
            .and_then(CandidateKind::from_type_hint)
            .unwrap_or(request_kind);

        Some(Candidate {
            zip_code: zip,
            city: trimmed(self.city),
            state: trimmed(self.state),
            county,
            latitude: self.latitude.as_ref().and_then(scalar_to_f64),
            longitude: self.longitude.as_ref().and_then(scalar_to_f64),
            display: self.display.map(|d| d.trim().to_string()).filter(|d| !d.is_empty()),
            kind,
        })
    }
}

fn trimmed(value: Option<String>) -> String {
    value.map(|v| v.trim().to_string()).unwrap_or_default()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn scalar_to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode a response body into candidates
pub fn decode(
    body: &str,
    request_kind: CandidateKind,
    default_county: &str,
) -> serde_json::Result<Vec<Candidate>> {
    let payload: LookupPayload = serde_json::from_str(body)?;
    Ok(payload.into_candidates(request_kind, default_county))
}
