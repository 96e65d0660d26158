//! HTTP catalog client.
//!
//! Talks to the catalog API with plain `GET` requests:
//! - `/search?query=..&limit=..` -> `{ query, hits: [..] }`
//! - `/resolve?name=..&limit=1` -> `{ matches: [..] }`, `[..]` or `{ items: [..] }`;
//!   404 when no brand matches
//!
//! Both response shapes are normalized into `Vec<Candidate>` here so nothing
//! downstream has to care which one the server chose.

use std::time::Instant;

use anyhow::{Context, Result};
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::{Catalog, LookupError};
use crate::config::ClientConfig;
use crate::model::types::{Candidate, ResolveResponse, SearchResponse};

pub struct HttpCatalog {
    client: Client,
    config: ClientConfig,
}

impl HttpCatalog {
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("medi-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("building catalog HTTP client")?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, LookupError> {
        let endpoint = self.config.endpoint(path);
        let url = Url::parse_with_params(&endpoint, params).map_err(|e| LookupError::Decode {
            url: endpoint.clone(),
            message: format!("invalid url: {e}"),
        })?;
        let started = Instant::now();

        let resp = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|source| LookupError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.bytes().await.map_err(|source| LookupError::Transport {
            url: url.to_string(),
            source,
        })?;
        debug!(
            url = %url,
            status = status.as_u16(),
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog response"
        );

        serde_json::from_slice(&body).map_err(|e| LookupError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })
    }
}

impl Catalog for HttpCatalog {
    async fn lookup(&self, query: &str, limit: usize) -> Result<Vec<Candidate>, LookupError> {
        let resp: SearchResponse = self
            .get_json(
                "/search",
                &[("query", query.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(resp.hits)
    }

    async fn resolve_signature(&self, name: &str) -> Result<Option<Candidate>, LookupError> {
        let resp: ResolveResponse = match self
            .get_json(
                "/resolve",
                &[("name", name.to_string()), ("limit", "1".to_string())],
            )
            .await
        {
            Ok(resp) => resp,
            // The catalog answers an unknown brand with 404.
            Err(LookupError::Status { status: 404, .. }) => {
                debug!(name, "resolve: no brand found");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        Ok(resp.into_candidates().into_iter().next())
    }
}
