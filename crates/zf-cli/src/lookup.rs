// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // prints results to stdout

use anyhow::{Context, Result};
use clap::Args;
use std::sync::Arc;
use zf_autocomplete::search::SearchContext;
use zf_autocomplete::SearchResult;
use zf_config::AutocompleteSettings;
use zf_domain_types::CandidateKind;
use zf_lookup::{FallbackCatalog, HttpLookup, RemoteLookup};

use crate::offline::OfflineLookup;

#[derive(Args, Debug, Clone)]
pub struct LookupArgs {
    /// Partial ZIP code, city or address
    pub query: String,
    /// Search the address endpoint instead of the ZIP endpoint
    #[arg(long)]
    pub address: bool,
    /// Override `max-results`
    #[arg(long)]
    pub limit: Option<usize>,
    /// Skip the network and search the fallback list only
    #[arg(long)]
    pub offline: bool,
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl LookupArgs {
    pub async fn run(self, mut settings: AutocompleteSettings) -> Result<()> {
        if let Some(limit) = self.limit {
            settings.max_results = limit.max(1);
        }
        let lookup = build_lookup(&settings, self.offline)?;
        let fallback = FallbackCatalog::from_settings(&settings);
        let context = SearchContext::new(settings, lookup, fallback);

        let kind = if self.address { CandidateKind::Address } else { CandidateKind::Zip };
        let result = context.resolve(kind, &self.query).await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            print!("{}", render_rows(&result));
        }
        Ok(())
    }
}

/// HTTP lookup from settings, or the offline stand-in
pub fn build_lookup(
    settings: &AutocompleteSettings,
    offline: bool,
) -> Result<Arc<dyn RemoteLookup>> {
    if offline {
        return Ok(Arc::new(OfflineLookup));
    }
    let http = HttpLookup::from_settings(settings)
        .with_context(|| format!("invalid lookup base URL '{}'", settings.lookup.base_url))?;
    Ok(Arc::new(http))
}

/// One line per candidate, prefixed with the row index
pub fn render_rows(result: &SearchResult) -> String {
    match result {
        SearchResult::Hidden => "query too short\n".to_string(),
        SearchResult::Found { candidates, .. } if candidates.is_empty() => {
            "no suggestions\n".to_string()
        }
        SearchResult::Found {
            candidates, source, ..
        } => {
            let mut out = String::new();
            for (index, candidate) in candidates.iter().enumerate() {
                out.push_str(&format!("{index:>2}  {}", candidate.label()));
                if !candidate.county.is_empty() {
                    out.push_str(&format!("  ({} County)", candidate.county));
                }
                out.push('\n');
            }
            out.push_str(&format!(
                "[{} result(s) from {}]\n",
                candidates.len(),
                source.as_str()
            ));
            out
        }
    }
}
