//! Degraded-mode catalog reads for the site.
//!
//! Fetches the aggregated catalog from the live api and falls back to a
//! statically bundled snapshot (products) or an empty catalog (careers,
//! FAQs) whenever the live read degrades: transport failure, an error
//! status, or a non-JSON response body. Reads only; there is no write
//! path against the fallback.

pub mod fallback;

use opto_catalog_core::content::model::{Career, Catalog, FaqGroup, Product};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Why a live read was abandoned in favor of the fallback.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status: {0}")]
    Status(StatusCode),
    #[error("unexpected content type: '{0}'")]
    ContentType(String),
    #[error("malformed body: {0}")]
    Malformed(#[from] serde_json::Error),
}

pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url)
    }

    pub fn with_http_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    /// Live products, or the bundled snapshot when the live read fails.
    /// Both sources pass through the same category canonicalization, so
    /// callers cannot tell them apart.
    pub async fn products(&self) -> Catalog<Product> {
        match self.fetch_live("/v1/products").await {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::warn!("product fetch degraded to the bundled snapshot: {err}");
                fallback::product_snapshot()
            }
        }
    }

    /// Live careers; degrades to an empty board.
    pub async fn careers(&self) -> Catalog<Career> {
        self.fetch_or_empty("/v1/careers", "career").await
    }

    /// Live FAQs; degrades to an empty section.
    pub async fn faqs(&self) -> Catalog<FaqGroup> {
        self.fetch_or_empty("/v1/faqs", "faq").await
    }

    async fn fetch_or_empty<T: DeserializeOwned>(&self, path: &str, what: &str) -> Catalog<T> {
        match self.fetch_live(path).await {
            Ok(catalog) => catalog,
            Err(err) => {
                tracing::warn!("{what} fetch degraded to empty: {err}");
                Catalog::default()
            }
        }
    }

    async fn fetch_live<T: DeserializeOwned>(&self, path: &str) -> Result<Catalog<T>, FetchError> {
        let response = self
            .http
            .get(format!("{}{path}", self.base_url))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        // Misconfigured serverless hosts like to answer with an HTML error
        // page; anything non-JSON counts as a failed read.
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !content_type.starts_with("application/json") {
            return Err(FetchError::ContentType(content_type));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
