//! Source adapters for the supported rental sites.
//!
//! Each submodule translates one external site or API into [`Listing`]
//! records. Adapters are mutually independent: each owns its own search
//! URL and extraction rules, and a failure in one never affects another.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | Pararius | [`pararius`] | HTML scraping | Templated city/price search URL |
//! | Huurwoningen | [`huurwoningen`] | HTML scraping | Templated city/price search URL |
//! | Nederwoon | [`nederwoon`] | HTML scraping | Column-based layout, extra spec bullets |
//! | 123Wonen | [`wonen123`] | HTML scraping | Detail URL hidden in an `onclick` handler |
//! | Woonkeus | [`woonkeus`] | JSON API | Filtered client-side by city |
//!
//! # Common Patterns
//!
//! Every adapter implements [`ListingSource`]:
//! - `name()`: the human-readable source label
//! - `fetch_listings()`: one fetch attempt plus extraction, returning
//!   either records or a typed [`ScrapeError`]
//!
//! Markup adapters keep their parsing in a separate method that takes the
//! raw HTML, so extraction rules are testable against fixture documents
//! without any network. Within a single element, each optional field is
//! checked independently: a missing price or address yields a sentinel
//! string, never a dropped record. Only an unresolvable detail URL skips
//! an element.

use crate::models::Listing;
use async_trait::async_trait;
use scraper::ElementRef;
use thiserror::Error;

pub mod huurwoningen;
pub mod nederwoon;
pub mod pararius;
pub mod wonen123;
pub mod woonkeus;

/// Why a source contributed no listings this run.
///
/// Raised past the adapter boundary only as a value; the orchestrator
/// logs it and downgrades the source to an empty contribution.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The fetch itself failed: network, timeout, or non-success status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The response body could not be decoded as the expected structure.
    #[error("could not decode response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One rental site or API, viewed as a producer of [`Listing`] records.
///
/// New sites are added by implementing this trait, never by branching
/// inside shared code.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Human-readable source label, also used in listing identities.
    fn name(&self) -> &str;

    /// Perform one fetch-and-extract pass against the source.
    ///
    /// Exactly one attempt per run; no retry. Individual malformed
    /// elements are skipped inside the adapter, so an `Err` here means
    /// the whole source was unreachable or unreadable.
    async fn fetch_listings(&self) -> Result<Vec<Listing>, ScrapeError>;
}

/// Concatenated text of an element, trimmed at both ends.
fn element_text(element: &ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Element text with inner whitespace collapsed to single spaces.
///
/// Used where the source nests child elements inside the text node,
/// e.g. an address span inside a title block.
fn spaced_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
