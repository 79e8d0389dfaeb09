// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! HTTP implementation of [`RemoteLookup`]

use async_trait::async_trait;
use reqwest::{Client as HttpClient, Response};
use std::time::Duration;
use url::Url;
use zf_config::AutocompleteSettings;
use zf_domain_types::{Candidate, CandidateKind};

use crate::api::{LookupRequest, RemoteLookup};
use crate::error::{LookupError, LookupResult};
use crate::payload;

const MAX_ERROR_BODY: usize = 200;

/// Lookup client for the ZIP and address search endpoints
///
/// - ZIP: `GET {base}/api/zipcode/search?q=<query>&limit=<n>`
/// - Address: `GET {base}/api/address/search?query=<query>&maxResults=<n>`
#[derive(Debug, Clone)]
pub struct HttpLookup {
    http_client: HttpClient,
    base_url: Url,
    zip_path: String,
    address_path: String,
    default_county: String,
}

impl HttpLookup {
    /// Endpoint paths resolve relative to `base_url`, so a path prefix such as
    /// `https://host/v2` is kept. A trailing slash is added when missing.
    pub fn new(
        base_url: Url,
        timeout: Duration,
        default_county: impl Into<String>,
    ) -> LookupResult<Self> {
        let http_client = HttpClient::builder()
            .user_agent(concat!("zipfill/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
            zip_path: "api/zipcode/search".to_string(),
            address_path: "api/address/search".to_string(),
            default_county: default_county.into(),
        })
    }

    pub fn from_settings(settings: &AutocompleteSettings) -> LookupResult<Self> {
        let base_url = Url::parse(&settings.lookup.base_url)?;
        let mut lookup = Self::new(
            base_url,
            settings.lookup.timeout(),
            settings.default_county.clone(),
        )?;
        lookup.zip_path = settings.lookup.zip_path.clone();
        lookup.address_path = settings.lookup.address_path.clone();
        Ok(lookup)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the endpoint URL for a request, query string included
    pub fn endpoint_url(&self, request: &LookupRequest) -> LookupResult<Url> {
        let (path, query_key, limit_key) = match request.kind {
            CandidateKind::Zip => (&self.zip_path, "q", "limit"),
            CandidateKind::Address => (&self.address_path, "query", "maxResults"),
        };
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .clear()
            .append_pair(query_key, &request.query)
            .append_pair(limit_key, &request.limit.to_string());
        Ok(url)
    }

    async fn handle_response(
        &self,
        response: Response,
        kind: CandidateKind,
    ) -> LookupResult<Vec<Candidate>> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let mut body = text;
            if body.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !body.is_char_boundary(cut) {
                    cut -= 1;
                }
                body.truncate(cut);
            }
            return Err(LookupError::Status { status, body });
        }

        Ok(payload::decode(&text, kind, &self.default_county)?)
    }
}

#[async_trait]
impl RemoteLookup for HttpLookup {
    async fn search(&self, request: &LookupRequest) -> LookupResult<Vec<Candidate>> {
        let url = self.endpoint_url(request)?;
        tracing::debug!(%url, kind = %request.kind, "querying lookup endpoint");

        let response = self.http_client.get(url).send().await?;
        let candidates = self.handle_response(response, request.kind).await?;

        tracing::debug!(
            count = candidates.len(),
            query = %request.query,
            "lookup returned candidates"
        );
        Ok(candidates)
    }
}
