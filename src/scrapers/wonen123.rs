//! 123Wonen listing scraper.
//!
//! Scrapes [123wonen.nl](https://www.123wonen.nl) search results, e.g.
//! `https://www.123wonen.nl/huurwoningen/in/apeldoorn`.
//!
//! # Markup
//!
//! Listing cards are `div.pandlist-container` elements. The detail URL is
//! not a regular anchor: the whole card navigates via an inline
//! `onclick="location.href='…';"` handler, so the href is pulled out of
//! that attribute. Cards whose handler is missing or unparseable are
//! skipped, since without a detail URL there is no stable identity.

use super::{element_text, spaced_text, ListingSource, ScrapeError};
use crate::fetch::Fetcher;
use crate::models::{
    absolutize, Listing, ADDRESS_NOT_SPECIFIED, PRICE_NOT_SPECIFIED, TITLE_NOT_SPECIFIED,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use tracing::{info, instrument};

/// Matches `location.href='/detail/1'` with either quote style.
static ONCLICK_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"location\.href\s*=\s*['"]?([^'";]+)"#).unwrap());

pub struct Wonen123 {
    search_url: String,
    fetcher: Fetcher,
}

impl Wonen123 {
    pub const SOURCE: &'static str = "123Wonen";
    const ORIGIN: &'static str = "https://www.123wonen.nl";

    pub fn new(city: &str, fetcher: Fetcher) -> Self {
        let search_url = format!("{}/huurwoningen/in/{}", Self::ORIGIN, city.to_lowercase());
        Wonen123 {
            search_url,
            fetcher,
        }
    }

    pub(crate) fn parse_listings(&self, html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let container_sel = Selector::parse("div.pandlist-container").unwrap();
        let price_sel = Selector::parse("div.pand-price").unwrap();
        let title_sel = Selector::parse("div.pand-title").unwrap();
        let address_sel = Selector::parse("span.pand-address").unwrap();
        let specs_sel = Selector::parse("div.pand-specs li").unwrap();

        let mut listings = Vec::new();
        for element in document.select(&container_sel) {
            let onclick = element.value().attr("onclick").unwrap_or("");
            let Some(href) = ONCLICK_HREF
                .captures(onclick)
                .map(|c| c[1].trim().to_string())
            else {
                continue;
            };
            let url = absolutize(Self::ORIGIN, &href);
            if url.is_empty() {
                continue;
            }
            let price = element
                .select(&price_sel)
                .next()
                .map(|e| element_text(&e))
                .unwrap_or_else(|| PRICE_NOT_SPECIFIED.to_string());
            let title_element = element.select(&title_sel).next();
            let title = title_element
                .map(|e| spaced_text(&e))
                .unwrap_or_else(|| TITLE_NOT_SPECIFIED.to_string());
            let address = title_element
                .and_then(|e| e.select(&address_sel).next())
                .map(|e| element_text(&e))
                .unwrap_or_else(|| ADDRESS_NOT_SPECIFIED.to_string());
            let details = element
                .select(&specs_sel)
                .map(|li| spaced_text(&li))
                .collect::<Vec<_>>()
                .join(" | ");
            listings.push(Listing::new(
                Self::SOURCE,
                title,
                url,
                price,
                address,
                details,
            ));
        }
        listings
    }
}

#[async_trait]
impl ListingSource for Wonen123 {
    fn name(&self) -> &str {
        Self::SOURCE
    }

    #[instrument(level = "info", skip_all, fields(source = Self::SOURCE))]
    async fn fetch_listings(&self) -> Result<Vec<Listing>, ScrapeError> {
        info!(url = %self.search_url, "Fetching search page");
        let html = self.fetcher.get_text(&self.search_url).await?;
        let listings = self.parse_listings(&html);
        info!(count = listings.len(), "Parsed listings");
        Ok(listings)
    }
}
