//! HTML page rendering.
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating:
//! templates are type-safe Rust code with automatic XSS escaping.
//!
//! Every page goes through [`base_document`], which wraps the page body in
//! the layout shell — a constant site header above and a constant footer
//! below. The shell takes nothing but the body; it is purely structural.
//!
//! The detail view branches on [`FetchState`]:
//!
//! - `Pending`: an empty data region plus a meta refresh, so a fallback
//!   request resolves to the full view once background generation lands.
//! - `Ready`: the record's id and name exactly as fetched, a "go home"
//!   link, and the opaque passthrough fields as a definition list.
//! - `Failed`: an explicit error view — upstream faults are rendered, not
//!   crashed on.
//!
//! CSS is embedded at compile time via `include_str!`; the generated pages
//! carry no external asset references.

use maud::{DOCTYPE, Markup, html};

use crate::product::{FetchState, ProductRecord};
use crate::routes;

const CSS: &str = include_str!("../static/style.css");

/// How often a pending fallback page asks the browser to retry, in seconds.
const PENDING_REFRESH_SECS: u32 = 1;

/// Renders the base HTML document with the layout shell around `content`.
///
/// `refresh` adds a meta refresh tag; only pending fallback pages use it.
fn base_document(title: &str, refresh: Option<u32>, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                @if let Some(secs) = refresh {
                    meta http-equiv="refresh" content=(secs);
                }
                title { (title) }
                style { (CSS) }
            }
            body {
                (site_header())
                (content)
                (site_footer())
            }
        }
    }
}

/// Constant site header shown on every page.
fn site_header() -> Markup {
    html! {
        header.site-header {
            a href=(routes::home()) { "Vitrine" }
        }
    }
}

/// Constant site footer shown on every page.
fn site_footer() -> Markup {
    html! {
        footer.site-footer {
            p { "Product data from the makeup API." }
        }
    }
}

/// Renders one navigable link per record, labeled with the record's name
/// and pointing at its statically-generated detail page.
///
/// An empty slice renders an empty list — no links, no error.
pub fn item_links(records: &[ProductRecord]) -> Markup {
    html! {
        ul.product-list {
            @for record in records {
                li {
                    a href=(routes::static_detail(record.id)) { (record.name) }
                }
            }
        }
    }
}

/// The product list page.
pub fn list_page(records: &[ProductRecord]) -> Markup {
    let content = html! {
        main.list-page {
            h1 { "Products" }
            (item_links(records))
        }
    };
    base_document("Products", None, content)
}

/// A product detail page, branching on the data's render state.
pub fn detail_page(state: &FetchState) -> Markup {
    match state {
        FetchState::Pending => {
            let content = html! {
                main.detail-page {
                    section.product-data {}
                }
            };
            base_document("Loading", Some(PENDING_REFRESH_SECS), content)
        }
        FetchState::Ready(record) => {
            let content = html! {
                main.detail-page {
                    a.home-link href=(routes::home()) { "Home" }
                    section.product-data {
                        p.product-id { "id: " (record.id) }
                        p.product-name { "name: " (record.name) }
                        (extra_fields(record))
                    }
                }
            };
            base_document(&record.name, None, content)
        }
        FetchState::Failed(reason) => {
            let content = html! {
                main.detail-page {
                    a.home-link href=(routes::home()) { "Home" }
                    section.product-error {
                        p { "Could not load this product." }
                        p.error-detail { (reason) }
                    }
                }
            };
            base_document("Product unavailable", None, content)
        }
    }
}

/// Page served for paths outside the route table.
pub fn not_found_page() -> Markup {
    let content = html! {
        main.not-found-page {
            a.home-link href=(routes::home()) { "Home" }
            p { "There is no page here." }
        }
    };
    base_document("Not found", None, content)
}

/// The API's passthrough fields as a definition list. Only scalar values
/// are shown; nested structures and nulls are skipped.
fn extra_fields(record: &ProductRecord) -> Markup {
    html! {
        @if !record.extra.is_empty() {
            dl.product-extra {
                @for (key, value) in &record.extra {
                    @if let Some(text) = scalar_text(value) {
                        dt { (key) }
                        dd { (text) }
                    }
                }
            }
        }
    }
}

fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
