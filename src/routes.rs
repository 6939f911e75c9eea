//! Route path construction.
//!
//! Every href the templates emit and every pattern the server registers is
//! built here. Templates never hand-format paths, so tests can assert
//! navigation targets against the same helpers the markup uses.

/// Target of the "go home" action on detail pages.
pub fn home() -> &'static str {
    "/"
}

/// Server-rendered detail page for one product.
pub fn dynamic_detail(id: u64) -> String {
    format!("/dynamic/{id}")
}

/// Statically-generated detail page (with fallback) for one product.
/// List items link here.
pub fn static_detail(id: u64) -> String {
    format!("/dynamic_2/{id}")
}

/// Router pattern for [`dynamic_detail`] paths.
pub const DYNAMIC_DETAIL_PATTERN: &str = "/dynamic/{id}";

/// Router pattern for [`static_detail`] paths.
pub const STATIC_DETAIL_PATTERN: &str = "/dynamic_2/{id}";
