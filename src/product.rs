//! Shared types passed from the fetch layer to the renderer.

use serde::{Deserialize, Serialize};

/// A single product as returned by the external API.
///
/// Only `id` and `name` are interpreted locally. Everything else the API
/// sends (brand, price, description, ...) is collected into `extra` and
/// passed through to the detail renderer untouched. Records are never
/// mutated; each one lives for exactly one page render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Render state of a detail page's data region.
///
/// `Pending` is what a fallback request sees while its page is generated in
/// the background — the renderer leaves the data region empty. A tagged
/// variant rather than `Option<ProductRecord>` so the failed case cannot be
/// confused with the not-yet-resolved case.
#[derive(Debug, Clone)]
pub enum FetchState {
    Pending,
    Ready(ProductRecord),
    Failed(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_captures_unknown_fields() {
        let json = r#"{
            "id": 495,
            "name": "Maybelline Face Studio",
            "brand": "maybelline",
            "price": "14.99",
            "rating": 4.5
        }"#;
        let record: ProductRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.id, 495);
        assert_eq!(record.name, "Maybelline Face Studio");
        assert_eq!(record.extra["brand"], "maybelline");
        assert_eq!(record.extra["price"], "14.99");
        assert_eq!(record.extra["rating"], 4.5);
    }

    #[test]
    fn record_without_extras_parses() {
        let record: ProductRecord = serde_json::from_str(r#"{"id": 1, "name": "A"}"#).unwrap();
        assert_eq!(record.id, 1);
        assert!(record.extra.is_empty());
    }

    #[test]
    fn record_roundtrips_extras_at_top_level() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"id": 2, "name": "B", "brand": "nyx"}"#).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        // Flattened back out, not nested under an "extra" key
        assert_eq!(value["brand"], "nyx");
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn record_missing_name_is_an_error() {
        let result: Result<ProductRecord, _> = serde_json::from_str(r#"{"id": 3}"#);
        assert!(result.is_err());
    }
}
