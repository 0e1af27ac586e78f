//! DigitalOcean block-storage client
//!
//! Implements `StorageProvider` over the v2 REST API with a blocking
//! `reqwest` client. List endpoints are paginated and followed through
//! `links.pages.next` until exhausted.

use std::collections::HashSet;

use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::StorageProvider;
use crate::config::credentials::TokenSource;
use crate::error::{ProviderError, RateLimit, RotateError, RotateResult};
use crate::models::{Snapshot, Volume};

/// Page size requested from list endpoints (the API maximum)
const PER_PAGE: u32 = 200;

/// API client for DigitalOcean volumes and snapshots
pub struct DigitalOceanClient<T: TokenSource> {
    client: Client,
    base_url: String,
    tokens: T,
}

#[derive(Debug, Default, Deserialize)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Debug, Default, Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VolumesPage {
    #[serde(default)]
    volumes: Vec<Volume>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Deserialize)]
struct SnapshotsPage {
    #[serde(default)]
    snapshots: Vec<Snapshot>,
    #[serde(default)]
    links: Links,
}

#[derive(Debug, Serialize)]
struct CreateSnapshotRequest<'a> {
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateSnapshotResponse {
    snapshot: Snapshot,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    id: Option<String>,
    message: String,
}

trait Paged {
    type Item;

    fn into_parts(self) -> (Vec<Self::Item>, Option<String>);
}

impl Paged for VolumesPage {
    type Item = Volume;

    fn into_parts(self) -> (Vec<Volume>, Option<String>) {
        (self.volumes, self.links.pages.and_then(|p| p.next))
    }
}

impl Paged for SnapshotsPage {
    type Item = Snapshot;

    fn into_parts(self) -> (Vec<Snapshot>, Option<String>) {
        (self.snapshots, self.links.pages.and_then(|p| p.next))
    }
}

impl<T: TokenSource> DigitalOceanClient<T> {
    /// Creates a new API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(base_url: impl Into<String>, tokens: T) -> RotateResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("snapshot-rotate/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send an authenticated request, turning non-2xx responses into errors
    fn send(&self, operation: &'static str, request: RequestBuilder) -> RotateResult<Response> {
        let token = self.tokens.current_token()?;

        let response = request
            .bearer_auth(token.expose())
            .send()
            .map_err(|e| ProviderError::new(operation, e.to_string()))?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(error_from_response(operation, response).into())
        }
    }

    fn parse<R: DeserializeOwned>(operation: &'static str, response: Response) -> RotateResult<R> {
        let rate_limit = parse_rate_limit(response.headers());
        response.json().map_err(|e| {
            RotateError::Provider(ProviderError {
                operation,
                message: format!("Failed to parse response: {}", e),
                status: None,
                rate_limit,
            })
        })
    }

    /// Fetch every page of a list endpoint
    fn get_all<P>(&self, operation: &'static str, first_url: String) -> RotateResult<Vec<P::Item>>
    where
        P: Paged + DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut visited = HashSet::new();
        let mut next = Some(first_url);

        while let Some(url) = next.take() {
            if !visited.insert(url.clone()) {
                tracing::warn!(operation, url = %url, "Pagination links back to a fetched page, stopping");
                break;
            }

            let response = self.send(operation, self.client.get(&url))?;
            let page: P = Self::parse(operation, response)?;
            let (mut batch, next_url) = page.into_parts();

            tracing::debug!(operation, url = %url, count = batch.len(), "Fetched page");

            items.append(&mut batch);
            next = next_url;
        }

        Ok(items)
    }
}

impl<T: TokenSource> StorageProvider for DigitalOceanClient<T> {
    fn list_volumes(&self) -> RotateResult<Vec<Volume>> {
        let url = self.url(&format!("/v2/volumes?per_page={PER_PAGE}"));
        self.get_all::<VolumesPage>("ListVolumes", url)
    }

    fn create_snapshot(&self, volume_id: &str, name: &str) -> RotateResult<Snapshot> {
        let url = self.url(&format!("/v2/volumes/{volume_id}/snapshots"));
        let request = self
            .client
            .post(url)
            .json(&CreateSnapshotRequest { name });

        let response = self.send("CreateSnapshot", request)?;
        let created: CreateSnapshotResponse = Self::parse("CreateSnapshot", response)?;
        Ok(created.snapshot)
    }

    fn list_snapshots(&self, volume_id: &str) -> RotateResult<Vec<Snapshot>> {
        let url = self.url(&format!("/v2/volumes/{volume_id}/snapshots?per_page={PER_PAGE}"));
        self.get_all::<SnapshotsPage>("ListSnapshots", url)
    }

    fn delete_snapshot(&self, snapshot_id: &str) -> RotateResult<()> {
        let url = self.url(&format!("/v2/snapshots/{snapshot_id}"));
        self.send("DeleteSnapshot", self.client.delete(url))?;
        Ok(())
    }
}

fn error_from_response(operation: &'static str, response: Response) -> ProviderError {
    let status = response.status();
    let rate_limit = parse_rate_limit(response.headers());
    let body = response.text().unwrap_or_default();

    ProviderError {
        operation,
        message: error_message(&body, status.canonical_reason()),
        status: Some(status.as_u16()),
        rate_limit,
    }
}

/// Prefer the API's own message; fall back to the raw body or the reason phrase
fn error_message(body: &str, reason: Option<&str>) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(ApiErrorBody { id: Some(id), message }) => format!("{} ({})", message, id),
        Ok(ApiErrorBody { id: None, message }) => message,
        Err(_) if !body.trim().is_empty() => body.trim().to_string(),
        Err(_) => reason.unwrap_or("unknown error").to_string(),
    }
}

/// Read the `RateLimit-*` headers, if all three are present
fn parse_rate_limit(headers: &HeaderMap) -> Option<RateLimit> {
    fn header<N: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<N> {
        headers.get(name)?.to_str().ok()?.trim().parse().ok()
    }

    Some(RateLimit {
        limit: header(headers, "ratelimit-limit")?,
        remaining: header(headers, "ratelimit-remaining")?,
        reset: header(headers, "ratelimit-reset")?,
    })
}
