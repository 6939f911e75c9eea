//! In-memory page cache for fallback generation.
//!
//! The statically-generated detail route serves pre-rendered pages for a
//! fixed id set and generates pages for other ids lazily, on first request.
//! This module owns that state.
//!
//! ## Entry lifecycle
//!
//! ```text
//! (absent) --claim--> Pending --fulfill--> Ready
//!                        |
//!                        +--abandon--> (absent, retryable)
//! ```
//!
//! Exactly one request claims a missing id; everyone else sees `Pending`
//! until the claimant's generation task fulfills the entry. A failed
//! generation abandons the claim so a later request can retry instead of
//! pinning a permanent pending entry.
//!
//! Ready pages are stored as `Arc<str>`: serving a cached page clones a
//! pointer, not the HTML.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone)]
enum PageEntry {
    /// Generation claimed, not yet finished.
    Pending,
    /// Fully rendered page, served as-is.
    Ready(Arc<str>),
}

/// Outcome of a cache probe for one id.
#[derive(Debug, Clone)]
pub enum Lookup {
    /// The page exists; serve it.
    Ready(Arc<str>),
    /// Someone else is generating it; serve the pending shell.
    InFlight,
    /// This caller owns generation for the id now.
    Claimed,
}

/// Cache of rendered detail pages, keyed by product id.
#[derive(Debug, Default)]
pub struct PageCache {
    entries: RwLock<HashMap<u64, PageEntry>>,
}

impl PageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-seeded with already-rendered pages. Used at startup so the
    /// pre-rendered id set is served with no fallback delay.
    pub fn seeded(pages: impl IntoIterator<Item = (u64, String)>) -> Self {
        let entries = pages
            .into_iter()
            .map(|(id, html)| (id, PageEntry::Ready(Arc::from(html))))
            .collect();
        Self { entries: RwLock::new(entries) }
    }

    /// The ready page for `id`, if any. Pending entries are not visible here.
    pub async fn get(&self, id: u64) -> Option<Arc<str>> {
        match self.entries.read().await.get(&id) {
            Some(PageEntry::Ready(html)) => Some(Arc::clone(html)),
            _ => None,
        }
    }

    /// Probe the cache, claiming the id if it is absent.
    ///
    /// Single write-lock pass, so two concurrent first requests cannot both
    /// claim the same id.
    pub async fn lookup_or_claim(&self, id: u64) -> Lookup {
        let mut entries = self.entries.write().await;
        match entries.get(&id) {
            Some(PageEntry::Ready(html)) => Lookup::Ready(Arc::clone(html)),
            Some(PageEntry::Pending) => Lookup::InFlight,
            None => {
                entries.insert(id, PageEntry::Pending);
                Lookup::Claimed
            }
        }
    }

    /// Store the rendered page for a claimed id.
    pub async fn fulfill(&self, id: u64, html: String) {
        self.entries.write().await.insert(id, PageEntry::Ready(Arc::from(html)));
    }

    /// Release a claim after a failed generation. Ready entries are left
    /// untouched.
    pub async fn abandon(&self, id: u64) {
        let mut entries = self.entries.write().await;
        if let Some(PageEntry::Pending) = entries.get(&id) {
            entries.remove(&id);
        }
    }

    /// Number of ready pages (pending claims excluded).
    pub async fn ready_count(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| matches!(entry, PageEntry::Ready(_)))
            .count()
    }
}
