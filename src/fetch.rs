//! Product API client.
//!
//! One outbound GET per page of data, awaited before the page is emitted.
//! There is no batching and no shared mutable state between fetches; the
//! only suspension point is the network call itself.
//!
//! ## Error taxonomy
//!
//! Upstream faults never propagate as panics. Every failure is one of:
//!
//! - [`FetchError::Failure`] — the request itself failed: connect error,
//!   timeout, or a non-success HTTP status.
//! - [`FetchError::Malformed`] — the body arrived but does not deserialize
//!   into the expected shape (list must be a JSON array of records, detail
//!   must be a record with `id` and `name`).
//!
//! Callers decide what to do with each: a build aborts, the server renders
//! an explicit error view.
//!
//! ## Execution contexts
//!
//! Pages fetch either at build time or at request time. The two contexts
//! share one interface ([`ProductSource`]) but carry different timeouts and
//! are distinguishable in logs via [`FetchContext`].

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::ApiConfig;
use crate::product::ProductRecord;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("fetch failed: {0}")]
    Failure(#[from] reqwest::Error),
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
}

/// When a fetch runs, relative to the page lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchContext {
    /// Static generation: the list page and the pre-rendered detail set.
    BuildTime,
    /// Per-request rendering and fallback generation while serving.
    RequestTime,
}

impl FetchContext {
    /// Effective timeout for this context. Builds are not latency-sensitive,
    /// so they tolerate a slower upstream before giving up.
    fn timeout(self, base_secs: u64) -> Duration {
        match self {
            Self::BuildTime => Duration::from_secs(base_secs.saturating_mul(2)),
            Self::RequestTime => Duration::from_secs(base_secs),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::BuildTime => "build",
            Self::RequestTime => "request",
        }
    }
}

/// Source of product data for page rendering.
///
/// The one seam between pages and the outside world. Production uses the
/// reqwest-backed [`ApiClient`]; tests substitute a fixture.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// The full product list (optionally brand-filtered by the implementation).
    async fn list(&self) -> Result<Vec<ProductRecord>, FetchError>;

    /// One product by id.
    async fn detail(&self, id: u64) -> Result<ProductRecord, FetchError>;
}

/// HTTP client for the external product API.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    brand: Option<String>,
    context: FetchContext,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, context: FetchContext) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(context.timeout(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            brand: config.brand.clone().filter(|b| !b.is_empty()),
            context,
        })
    }

    fn list_url(&self) -> String {
        match &self.brand {
            Some(brand) => format!("{}/api/v1/products.json?brand={brand}", self.base_url),
            None => format!("{}/api/v1/products.json", self.base_url),
        }
    }

    fn detail_url(&self, id: u64) -> String {
        format!("{}/api/v1/products/{id}.json", self.base_url)
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(context = self.context.as_str(), url, "fetching");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }
}

#[async_trait]
impl ProductSource for ApiClient {
    async fn list(&self) -> Result<Vec<ProductRecord>, FetchError> {
        let url = self.list_url();
        let body = self.get_text(&url).await?;
        parse_list(&url, &body)
    }

    async fn detail(&self, id: u64) -> Result<ProductRecord, FetchError> {
        let url = self.detail_url(id);
        let body = self.get_text(&url).await?;
        parse_detail(&url, &body)
    }
}

fn parse_list(url: &str, body: &str) -> Result<Vec<ProductRecord>, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn parse_detail(url: &str, body: &str) -> Result<ProductRecord, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Malformed {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;

    fn client(brand: Option<&str>) -> ApiClient {
        let config = ApiConfig {
            base_url: "http://makeup-api.herokuapp.com".to_string(),
            brand: brand.map(str::to_string),
            timeout_secs: 30,
        };
        ApiClient::new(&config, FetchContext::RequestTime).unwrap()
    }

    #[test]
    fn list_url_with_brand_filter() {
        assert_eq!(
            client(Some("maybelline")).list_url(),
            "http://makeup-api.herokuapp.com/api/v1/products.json?brand=maybelline"
        );
    }

    #[test]
    fn list_url_without_brand_filter() {
        assert_eq!(
            client(None).list_url(),
            "http://makeup-api.herokuapp.com/api/v1/products.json"
        );
    }

    #[test]
    fn empty_brand_is_treated_as_no_filter() {
        assert_eq!(
            client(Some("")).list_url(),
            "http://makeup-api.herokuapp.com/api/v1/products.json"
        );
    }

    #[test]
    fn detail_url_embeds_id() {
        assert_eq!(
            client(None).detail_url(495),
            "http://makeup-api.herokuapp.com/api/v1/products/495.json"
        );
    }

    #[test]
    fn trailing_slash_on_base_url_is_stripped() {
        let config = ApiConfig {
            base_url: "http://example.com/".to_string(),
            brand: None,
            timeout_secs: 30,
        };
        let client = ApiClient::new(&config, FetchContext::BuildTime).unwrap();
        assert_eq!(client.detail_url(1), "http://example.com/api/v1/products/1.json");
    }

    #[test]
    fn build_timeout_is_longer_than_request_timeout() {
        assert!(FetchContext::BuildTime.timeout(30) > FetchContext::RequestTime.timeout(30));
    }

    #[test]
    fn parse_list_accepts_array_of_records() {
        let body = r#"[{"id":1,"name":"A"},{"id":2,"name":"B","brand":"x"}]"#;
        let records = parse_list("http://x/l", body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "A");
        assert_eq!(records[1].extra["brand"], "x");
    }

    #[test]
    fn parse_list_rejects_object() {
        let err = parse_list("http://x/l", r#"{"id":1,"name":"A"}"#).unwrap_err();
        match err {
            FetchError::Malformed { url, .. } => assert_eq!(url, "http://x/l"),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }

    #[test]
    fn parse_detail_accepts_record() {
        let record = parse_detail("http://x/d", r#"{"id":495,"name":"Lip Studio"}"#).unwrap();
        assert_eq!(record.id, 495);
        assert_eq!(record.name, "Lip Studio");
    }

    #[test]
    fn parse_detail_rejects_null_body() {
        // The API answers `null` for ids it does not know.
        let err = parse_detail("http://x/d", "null").unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }

    #[test]
    fn parse_detail_rejects_missing_name() {
        let err = parse_detail("http://x/d", r#"{"id":495}"#).unwrap_err();
        assert!(matches!(err, FetchError::Malformed { .. }));
    }
}
