//! Shared test fixtures for the vitrine test suite.
//!
//! [`StaticSource`] stands in for the external product API so rendering,
//! generation, and server tests run without network access.

use async_trait::async_trait;

use crate::fetch::{FetchError, ProductSource};
use crate::product::ProductRecord;

/// Build a record with no passthrough fields.
pub fn record(id: u64, name: &str) -> ProductRecord {
    ProductRecord {
        id,
        name: name.to_string(),
        extra: serde_json::Map::new(),
    }
}

/// In-memory [`ProductSource`] serving a fixed record set.
pub struct StaticSource {
    products: Vec<ProductRecord>,
}

impl StaticSource {
    pub fn new(products: Vec<ProductRecord>) -> Self {
        Self { products }
    }

    /// The pre-render ids from the stock config plus one extra product, so
    /// tests can exercise both the pre-rendered and the fallback path.
    pub fn sample() -> Self {
        Self::new(vec![
            record(495, "Lip Studio"),
            record(488, "Face Studio"),
            record(502, "Color Sensational"),
        ])
    }
}

#[async_trait]
impl ProductSource for StaticSource {
    async fn list(&self) -> Result<Vec<ProductRecord>, FetchError> {
        Ok(self.products.clone())
    }

    async fn detail(&self, id: u64) -> Result<ProductRecord, FetchError> {
        // The real API answers `null` for unknown ids, which surfaces as a
        // malformed record; the fixture mirrors that.
        self.products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| FetchError::Malformed {
                url: format!("fixture:///api/v1/products/{id}.json"),
                reason: "no such product".to_string(),
            })
    }
}

/// A source whose every fetch fails, for error-path tests.
pub struct FailingSource;

#[async_trait]
impl ProductSource for FailingSource {
    async fn list(&self) -> Result<Vec<ProductRecord>, FetchError> {
        Err(FetchError::Malformed {
            url: "fixture:///api/v1/products.json".to_string(),
            reason: "upstream down".to_string(),
        })
    }

    async fn detail(&self, id: u64) -> Result<ProductRecord, FetchError> {
        Err(FetchError::Malformed {
            url: format!("fixture:///api/v1/products/{id}.json"),
            reason: "upstream down".to_string(),
        })
    }
}
