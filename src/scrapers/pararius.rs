//! Pararius listing scraper.
//!
//! Scrapes the [Pararius](https://www.pararius.com) apartment search page
//! for a city and price range, e.g.
//! `https://www.pararius.com/apartments/apeldoorn/0-1500`.
//!
//! # Markup
//!
//! Results live in a `.search-list` container as
//! `.search-list__item--listing` items. Older page variants serve the
//! item content blocks (`.listing-search-item__content`) at the top
//! level, so the scraper falls back to those when no container exists.
//! The same listing occasionally appears twice in one page; duplicates
//! are suppressed by URL within a single parse.

use super::{element_text, ListingSource, ScrapeError};
use crate::fetch::Fetcher;
use crate::models::{absolutize, Listing, ADDRESS_NOT_SPECIFIED, PRICE_NOT_SPECIFIED};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{info, instrument};

pub struct Pararius {
    search_url: String,
    fetcher: Fetcher,
}

impl Pararius {
    pub const SOURCE: &'static str = "Pararius";
    const ORIGIN: &'static str = "https://www.pararius.com";

    pub fn new(city: &str, price_range: &str, fetcher: Fetcher) -> Self {
        let search_url = format!(
            "{}/apartments/{}/{}",
            Self::ORIGIN,
            city.to_lowercase(),
            price_range
        );
        Pararius {
            search_url,
            fetcher,
        }
    }

    /// Extract listings from a search results page.
    ///
    /// Elements without a resolvable title link are skipped; missing
    /// price or address fields degrade to sentinel strings.
    pub(crate) fn parse_listings(&self, html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let search_list_sel = Selector::parse(".search-list").unwrap();
        let item_sel = Selector::parse(".search-list__item--listing").unwrap();
        let content_sel = Selector::parse(".listing-search-item__content").unwrap();
        let title_sel = Selector::parse(".listing-search-item__title a").unwrap();
        let price_sel = Selector::parse(".listing-search-item__price").unwrap();
        let address_sel = Selector::parse(".listing-search-item__sub-title").unwrap();

        let elements: Vec<ElementRef> = match document.select(&search_list_sel).next() {
            Some(list) => list.select(&item_sel).collect(),
            None => document.select(&content_sel).collect(),
        };

        let mut listings = Vec::new();
        let mut seen_urls = HashSet::new();
        for element in elements {
            let content = element.select(&content_sel).next().unwrap_or(element);
            let Some(title_element) = content.select(&title_sel).next() else {
                continue;
            };
            let title = element_text(&title_element);
            let href = title_element.value().attr("href").unwrap_or("");
            let url = absolutize(Self::ORIGIN, href);
            if url.is_empty() || !seen_urls.insert(url.clone()) {
                continue;
            }
            let price = content
                .select(&price_sel)
                .next()
                .map(|e| element_text(&e))
                .unwrap_or_else(|| PRICE_NOT_SPECIFIED.to_string());
            let address = content
                .select(&address_sel)
                .next()
                .map(|e| element_text(&e))
                .unwrap_or_else(|| ADDRESS_NOT_SPECIFIED.to_string());
            listings.push(Listing::new(
                Self::SOURCE,
                title,
                url,
                price,
                address,
                String::new(),
            ));
        }
        listings
    }
}

#[async_trait]
impl ListingSource for Pararius {
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
