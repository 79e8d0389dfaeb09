// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only
#![allow(clippy::disallowed_methods)] // prints results to stdout

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use zf_autocomplete::{
    AutocompleteSession, BindingOptions, DocumentEvent, EventOutcome, FormDocument, Key,
    PageDescription, PageEvent, SessionMessage,
};
use zf_config::AutocompleteSettings;
use zf_domain_types::Candidate;
use zf_lookup::RemoteLookup;

use crate::lookup::build_lookup;

#[derive(Args, Debug, Clone)]
pub struct FillArgs {
    /// JSON page description (forms and fields)
    #[arg(long)]
    pub page: PathBuf,
    /// Name or id of the input to type into
    #[arg(long)]
    pub input: String,
    /// Text to type
    #[arg(long)]
    pub query: String,
    /// Suggestion row to commit (0-based)
    #[arg(long, default_value_t = 0)]
    pub pick: usize,
    /// Bind the input as a full-address field when it is not discovered
    #[arg(long)]
    pub address: bool,
    #[arg(long)]
    pub offline: bool,
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct FieldValue {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
pub struct FillSummary {
    pub selected: Candidate,
    pub fields: Vec<FieldValue>,
    pub events: Vec<DocumentEvent>,
}

impl FillArgs {
    pub async fn run(self, settings: AutocompleteSettings) -> Result<()> {
        let raw = std::fs::read_to_string(&self.page)
            .with_context(|| format!("failed to read page {}", self.page.display()))?;
        let page: PageDescription = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse page {}", self.page.display()))?;
        let lookup = build_lookup(&settings, self.offline)?;

        let summary = fill_page(settings, lookup, page, &self).await?;
        if self.json {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("selected: {}", summary.selected.label());
            for field in &summary.fields {
                println!("{:<24} {}", field.name, field.value);
            }
            println!("events: {}", summary.events.len());
        }
        Ok(())
    }
}

/// Drive a session through type → wait → arrow down → enter on `page`
pub async fn fill_page(
    settings: AutocompleteSettings,
    lookup: Arc<dyn RemoteLookup>,
    page: PageDescription,
    args: &FillArgs,
) -> Result<FillSummary> {
    let wait = settings.debounce() + settings.lookup.timeout() + Duration::from_secs(1);
    let mut doc = FormDocument::from_description(page);
    let mut session = AutocompleteSession::new(settings, lookup);
    session.scan(&doc);

    let element = doc
        .find(&args.input)
        .ok_or_else(|| anyhow!("no field named '{}' on the page", args.input))?;
    if !session.is_bound(element) {
        let options = if args.address { BindingOptions::address() } else { BindingOptions::zip() };
        session.register(&doc, element, options)?;
    }

    session.handle_event(&mut doc, PageEvent::Focus { element });
    doc.set_value(element, args.query.as_str());
    session.handle_event(&mut doc, PageEvent::Input { element });

    loop {
        let message = tokio::time::timeout(wait, session.next_message())
            .await
            .context("timed out waiting for suggestions")?;
        match message {
            Some(SessionMessage::SearchCompleted(outcome)) if outcome.element == element => {
                debug!(source = ?outcome.result.source(), "suggestions arrived");
                break;
            }
            Some(_) => continue,
            None => bail!("session closed before suggestions arrived"),
        }
    }

    let rows = session.overlay(element).map(|o| o.rows.len()).unwrap_or(0);
    if rows == 0 {
        bail!("no suggestions for '{}'", args.query);
    }
    if args.pick >= rows {
        bail!("--pick {} is out of range, {} suggestion(s) shown", args.pick, rows);
    }

    for _ in 0..=args.pick {
        session.handle_event(&mut doc, PageEvent::KeyDown { element, key: Key::ArrowDown });
    }
    let EventOutcome::Selected(_) =
        session.handle_event(&mut doc, PageEvent::KeyDown { element, key: Key::Enter })
    else {
        bail!("selection was not committed");
    };

    let events = doc.drain_events();
    let selected = events
        .iter()
        .find_map(|event| match event {
            DocumentEvent::ZipSelected { candidate, .. } => Some(candidate.clone()),
            DocumentEvent::Change { .. } => None,
        })
        .ok_or_else(|| anyhow!("no selection event was dispatched"))?;
    let fields = doc
        .elements()
        .map(|e| FieldValue {
            name: if e.name.is_empty() { e.dom_id.clone() } else { e.name.clone() },
            value: e.value.clone(),
        })
        .collect();

    Ok(FillSummary {
        selected,
        fields,
        events,
    })
}
