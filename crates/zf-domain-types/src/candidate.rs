// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Location candidates returned by lookups
//!
//! A [`Candidate`] is the unified record every lookup endpoint and the
//! offline fallback list are normalized into. Once produced it is never
//! mutated; bindings clone it into overlays and selection events.

use serde::{Deserialize, Serialize};

use crate::field::FieldAttribute;

/// Which lookup produced a candidate (and which flavour of binding asks for one)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    /// ZIP code search (`/api/zipcode/search`)
    #[default]
    Zip,
    /// Full address search (`/api/address/search`)
    Address,
}

impl CandidateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CandidateKind::Zip => "zip",
            CandidateKind::Address => "address",
        }
    }

    /// Map an endpoint's free-form `type` string onto a kind.
    ///
    /// Endpoints use values such as `zipcode`, `postal_code` or `street_address`;
    /// anything unrecognized yields `None` so callers can fall back to the
    /// kind of the request.
    pub fn from_type_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim().to_ascii_lowercase();
        if hint.contains("zip") || hint.contains("postal") {
            Some(CandidateKind::Zip)
        } else if hint.contains("address") || hint.contains("street") {
            Some(CandidateKind::Address)
        } else {
            None
        }
    }
}

impl std::fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One location suggestion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub zip_code: String,
    pub city: String,
    pub state: String,
    pub county: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Pre-formatted label supplied by the address endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default)]
    pub kind: CandidateKind,
}

impl Candidate {
    pub fn new(
        zip_code: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        county: impl Into<String>,
    ) -> Self {
        Self {
            zip_code: zip_code.into(),
            city: city.into(),
            state: state.into(),
            county: county.into(),
            latitude: None,
            longitude: None,
            display: None,
            kind: CandidateKind::Zip,
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_kind(mut self, kind: CandidateKind) -> Self {
        self.kind = kind;
        self
    }

    /// Row text shown in a suggestion overlay: `90210 — Beverly Hills, CA`
    pub fn label(&self) -> String {
        match self.display.as_deref().map(str::trim) {
            Some(display) if !display.is_empty() => display.to_string(),
            _ => self.zip_line(),
        }
    }

    fn zip_line(&self) -> String {
        let place = match (self.city.is_empty(), self.state.is_empty()) {
            (false, false) => format!("{}, {}", self.city, self.state),
            (false, true) => self.city.clone(),
            (true, false) => self.state.clone(),
            (true, true) => String::new(),
        };
        if place.is_empty() {
            self.zip_code.clone()
        } else {
            format!("{} — {}", self.zip_code, place)
        }
    }

    /// Single-line address written into an address input: `Beverly Hills, CA 90210`
    pub fn formatted_address(&self) -> String {
        if let Some(display) = self.display.as_deref().filter(|d| !d.trim().is_empty()) {
            return display.to_string();
        }
        let mut out = String::new();
        if !self.city.is_empty() {
            out.push_str(&self.city);
        }
        if !self.state.is_empty() {
            if !out.is_empty() {
                out.push_str(", ");
            }
            out.push_str(&self.state);
        }
        if !self.zip_code.is_empty() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&self.zip_code);
        }
        out
    }

    /// Value a related form field receives for `attribute`
    pub fn value_for(&self, attribute: FieldAttribute) -> &str {
        match attribute {
            FieldAttribute::City => &self.city,
            FieldAttribute::State => &self.state,
            FieldAttribute::County => &self.county,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_uses_zip_city_and_state() {
        let candidate = Candidate::new("90210", "Beverly Hills", "CA", "Los Angeles");
        assert_eq!(candidate.label(), "90210 — Beverly Hills, CA");
    }

    #[test]
    fn label_prefers_display_text() {
        let candidate = Candidate::new("10001", "New York", "NY", "New York")
            .with_display("350 5th Ave, New York, NY 10001");
        assert_eq!(candidate.label(), "350 5th Ave, New York, NY 10001");
    }

    #[test]
    fn label_tolerates_missing_place() {
        let candidate = Candidate::new("60601", "", "", "Cook");
        assert_eq!(candidate.label(), "60601");
    }

    #[test]
    fn formatted_address_orders_city_state_zip() {
        let candidate = Candidate::new("98101", "Seattle", "WA", "King");
        assert_eq!(candidate.formatted_address(), "Seattle, WA 98101");
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_coordinates() {
        let candidate = Candidate::new("90210", "Beverly Hills", "CA", "Los Angeles");
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["zipCode"], "90210");
        assert_eq!(json["kind"], "zip");
        assert!(json.get("latitude").is_none());
    }

    #[test]
    fn type_hints_map_onto_kinds() {
        assert_eq!(CandidateKind::from_type_hint("zipcode"), Some(CandidateKind::Zip));
        assert_eq!(CandidateKind::from_type_hint("Postal_Code"), Some(CandidateKind::Zip));
        assert_eq!(CandidateKind::from_type_hint("street_address"), Some(CandidateKind::Address));
        assert_eq!(CandidateKind::from_type_hint("poi"), None);
    }
}
