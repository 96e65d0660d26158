//! Catalog collaborator: the remote medicine API as seen by the search bar.
//!
//! - **[`Catalog`]**: the two read operations the search bar depends on.
//! - **[`client`]**: `reqwest`-backed implementation talking to the catalog HTTP API.

pub mod client;

use std::future::Future;

use thiserror::Error;

use crate::model::types::Candidate;

/// Failure of a primary lookup or a secondary resolution.
///
/// Recovered locally by the search bar (empty result state); never fatal.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} -> {status}")]
    Status { url: String, status: u16 },
    #[error("could not decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Read side of the medicine catalog.
///
/// Implementations must be idempotent; the search bar may repeat the same
/// lookup any number of times and discards results it no longer wants.
pub trait Catalog: Send + Sync + 'static {
    /// Ranked candidates for `query`, at most `limit` of them, in catalog order.
    fn lookup(
        &self,
        query: &str,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<Candidate>, LookupError>> + Send;

    /// Best match for a brand name, used when a committed candidate has no
    /// signature. `Ok(None)` means "no usable signature", not an error.
    fn resolve_signature(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Candidate>, LookupError>> + Send;
}
