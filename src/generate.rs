//! Static site generation.
//!
//! Build-time half of the site: fetches the product list and the configured
//! pre-render set, renders them, and (for the `build` command) writes the
//! result under the output directory.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html            # Product list page
//! └── dynamic_2/
//!     ├── 495/index.html    # Pre-rendered detail pages
//!     └── 488/index.html
//! ```
//!
//! The served routes mirror this layout: `/` is `index.html` and
//! `/dynamic_2/{id}` is `dynamic_2/{id}/index.html`, so the directory can
//! also be dropped on any static file server.
//!
//! Failure semantics are strict: any fetch error aborts generation with a
//! typed error. There is no retry and no partial output contract.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::fetch::{FetchError, ProductSource};
use crate::product::FetchState;
use crate::render;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// A fully generated site, still in memory.
///
/// `build` writes it to disk; `serve` seeds the page cache from it.
pub struct GeneratedSite {
    /// Rendered list page.
    pub index: String,
    /// Rendered detail pages for the pre-render id set, in config order.
    pub details: Vec<(u64, String)>,
}

/// Fetch and render the whole build-time page set.
///
/// Fetches run one at a time: the list first, then each pre-render id in
/// order. The first failure aborts the build.
pub async fn generate_site(
    source: &dyn ProductSource,
    prerender_ids: &[u64],
) -> Result<GeneratedSite, GenerateError> {
    let records = source.list().await?;
    let index = render::list_page(&records).into_string();

    let mut details = Vec::with_capacity(prerender_ids.len());
    for &id in prerender_ids {
        let record = source.detail(id).await?;
        let html = render::detail_page(&FetchState::Ready(record)).into_string();
        details.push((id, html));
    }

    Ok(GeneratedSite { index, details })
}

/// Write a generated site under `output_dir`, one progress line per page.
pub fn write_site(site: &GeneratedSite, output_dir: &Path) -> Result<(), GenerateError> {
    fs::create_dir_all(output_dir)?;

    fs::write(output_dir.join("index.html"), &site.index)?;
    println!("Generated index.html");

    for (id, html) in &site.details {
        let page_dir = output_dir.join("dynamic_2").join(id.to_string());
        fs::create_dir_all(&page_dir)?;
        fs::write(page_dir.join("index.html"), html)?;
        println!("Generated dynamic_2/{id}/index.html");
    }

    println!("Site generated at {}", output_dir.display());
    Ok(())
}

/// Full build: fetch, render, write.
pub async fn generate(
    source: &dyn ProductSource,
    prerender_ids: &[u64],
    output_dir: &Path,
) -> Result<(), GenerateError> {
    let site = generate_site(source, prerender_ids).await?;
    write_site(&site, output_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{FailingSource, StaticSource, record};
    use tempfile::TempDir;

    #[tokio::test]
    async fn generate_site_renders_index_and_prerendered_details() {
        let source = StaticSource::sample();
        let site = generate_site(&source, &[495, 488]).await.unwrap();

        assert!(site.index.contains(r#"href="/dynamic_2/495""#));
        assert!(site.index.contains(r#"href="/dynamic_2/488""#));
        assert_eq!(site.details.len(), 2);

        let (id, html) = &site.details[0];
        assert_eq!(*id, 495);
        assert!(html.contains("id: 495"));
        assert!(html.contains("name: Lip Studio"));
    }

    #[tokio::test]
    async fn generate_site_with_empty_prerender_set() {
        let source = StaticSource::sample();
        let site = generate_site(&source, &[]).await.unwrap();
        assert!(site.details.is_empty());
    }

    #[tokio::test]
    async fn list_failure_aborts_the_build() {
        let source = FailingSource;
        let result = generate_site(&source, &[]).await;
        assert!(matches!(result, Err(GenerateError::Fetch(_))));
    }

    #[tokio::test]
    async fn unknown_prerender_id_aborts_the_build() {
        let source = StaticSource::sample();
        let result = generate_site(&source, &[999_999]).await;
        assert!(matches!(result, Err(GenerateError::Fetch(_))));
    }

    #[tokio::test]
    async fn generate_writes_the_expected_tree() {
        let tmp = TempDir::new().unwrap();
        let source = StaticSource::new(vec![record(1, "A"), record(2, "B")]);

        generate(&source, &[1], tmp.path()).await.unwrap();

        let index = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(index.contains(r#"href="/dynamic_2/1""#));
        assert!(index.contains(r#"href="/dynamic_2/2""#));

        let detail = fs::read_to_string(tmp.path().join("dynamic_2/1/index.html")).unwrap();
        assert!(detail.contains("id: 1"));
        assert!(detail.contains("name: A"));

        assert!(!tmp.path().join("dynamic_2/2").exists());
    }
}
