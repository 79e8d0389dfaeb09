// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use zf_config::DiscoverySection;
use zf_domain_types::CandidateKind;

use crate::document::{ElementKind, FieldElement};

/// Decides which elements a session binds on its own
pub trait DiscoveryStrategy: Send + Sync {
    fn classify(&self, element: &FieldElement) -> Option<CandidateKind>;
}

/// Marker classes first, then optional name/id/placeholder sniffing
#[derive(Debug, Clone)]
pub struct HeuristicDiscovery {
    zip_class: String,
    address_class: String,
    sniff_attributes: bool,
}

impl Default for HeuristicDiscovery {
    fn default() -> Self {
        Self::from_settings(&DiscoverySection::default())
    }
}

impl HeuristicDiscovery {
    pub fn from_settings(section: &DiscoverySection) -> Self {
        Self {
            zip_class: section.zip_class.clone(),
            address_class: section.address_class.clone(),
            sniff_attributes: section.heuristics,
        }
    }

    fn looks_like_zip(element: &FieldElement) -> bool {
        [&element.name, &element.dom_id, &element.placeholder].iter().any(|attr| {
            let attr = attr.to_lowercase();
            attr.contains("zip") || attr.contains("postal")
        })
    }
}

impl DiscoveryStrategy for HeuristicDiscovery {
    fn classify(&self, element: &FieldElement) -> Option<CandidateKind> {
        if element.kind != ElementKind::TextInput {
            return None;
        }
        if element.has_class(&self.address_class) {
            Some(CandidateKind::Address)
        } else if element.has_class(&self.zip_class) {
            Some(CandidateKind::Zip)
        } else if self.sniff_attributes && Self::looks_like_zip(element) {
            Some(CandidateKind::Zip)
        } else {
            None
        }
    }
}

/// Binds nothing; the host registers every input itself
#[derive(Debug, Clone, Copy, Default)]
pub struct ExplicitOnly;

impl DiscoveryStrategy for ExplicitOnly {
    fn classify(&self, _element: &FieldElement) -> Option<CandidateKind> {
        None
    }
}
