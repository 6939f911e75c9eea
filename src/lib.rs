//! # Vitrine
//!
//! A tiny product showcase site. Product data comes from a third-party
//! cosmetics API; vitrine turns it into a browsable site with a list page
//! and per-product detail pages.
//!
//! # Architecture: Generate, Then Serve
//!
//! The same page set exists in two strategies:
//!
//! ```text
//! build   API ──fetch──> rendered HTML ──> dist/          (static output)
//! serve   API ──fetch──> rendered HTML ──> page cache ──> HTTP responses
//! ```
//!
//! Three routes, three data strategies:
//!
//! - `/` — the product list, fetched and rendered once at build time.
//! - `/dynamic/{id}` — server-rendered: fetched on every request.
//! - `/dynamic_2/{id}` — statically generated for a configured id set,
//!   with lazy fallback generation (and caching) for every other id.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading and validation |
//! | [`product`] | Shared types: the product record and the detail render state |
//! | [`fetch`] | reqwest API client behind the [`fetch::ProductSource`] seam, typed fetch errors |
//! | [`routes`] | Route path construction shared by templates, server, and tests |
//! | [`render`] | Maud templates: layout shell, item links, list and detail pages |
//! | [`generate`] | Build-time generation: fetch, render, write `dist/` |
//! | [`cache`] | In-memory page cache backing the fallback route |
//! | [`server`] | hyper server for the three routes, graceful shutdown |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time
//! HTML macro system: malformed markup is a build error, interpolation is
//! auto-escaped, and there is no template directory to ship.
//!
//! ## Typed Fetch Faults
//!
//! Upstream problems are data, not panics. Network faults and malformed
//! payloads surface as [`fetch::FetchError`] values; the build aborts on
//! them and the server renders an explicit error view.
//!
//! ## Fallback as a Tagged State
//!
//! A detail page's data region is `Pending`, `Ready`, or `Failed`
//! ([`product::FetchState`]) — never an implicit null. The fallback route
//! serves the pending shell while generation runs in the background, then
//! the cached full page forever after.

pub mod cache;
pub mod config;
pub mod fetch;
pub mod generate;
pub mod product;
pub mod render;
pub mod routes;
pub mod server;

#[cfg(test)]
pub(crate) mod test_helpers;
