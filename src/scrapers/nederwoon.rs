//! Nederwoon listing scraper.
//!
//! Scrapes [nederwoon.nl](https://www.nederwoon.nl) search results, e.g.
//! `https://www.nederwoon.nl/search?search_type=1&city=Apeldoorn`.
//!
//! # Markup
//!
//! Results live in a `#locations` container as `div.location` cards laid
//! out in Bootstrap columns. The second column carries the title link,
//! the address line, and a `ul` of spec bullets; the price sits in a
//! separate column distinguished by its `vertical-items` class. The spec
//! bullets are concatenated into the listing's `details` field.

use super::{element_text, ListingSource, ScrapeError};
use crate::fetch::Fetcher;
use crate::models::{absolutize, Listing, ADDRESS_NOT_SPECIFIED, PRICE_NOT_SPECIFIED};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{info, instrument, warn};

pub struct Nederwoon {
    search_url: String,
    fetcher: Fetcher,
}

impl Nederwoon {
    pub const SOURCE: &'static str = "Nederwoon";
    const ORIGIN: &'static str = "https://www.nederwoon.nl";

    pub fn new(city: &str, fetcher: Fetcher) -> Self {
        let search_url = format!(
            "{}/search?search_type=1&city={}",
            Self::ORIGIN,
            urlencoding::encode(city)
        );
        Nederwoon {
            search_url,
            fetcher,
        }
    }

    pub(crate) fn parse_listings(&self, html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let locations_sel = Selector::parse("#locations").unwrap();
        let location_sel = Selector::parse("div.location").unwrap();
        // The price column carries the same col-* classes plus
        // vertical-items, so the info column must exclude it.
        let info_col_sel = Selector::parse(
            "div.col-lg-4.col-md-3.click-see-page-button:not(.vertical-items)",
        )
        .unwrap();
        let title_link_sel = Selector::parse("h2.heading-sm a.see-page-button").unwrap();
        let address_sel = Selector::parse("p.color-medium.fixed-lh").unwrap();
        let price_col_sel = Selector::parse(
            "div.col-lg-4.col-md-3.vertical-items.start-items.click-see-page-button",
        )
        .unwrap();
        let price_sel = Selector::parse("p.heading-md.text-regular.color-primary").unwrap();
        let bullets_sel = Selector::parse("ul li").unwrap();

        let Some(container) = document.select(&locations_sel).next() else {
            warn!(source = Self::SOURCE, "No locations container found");
            return Vec::new();
        };

        let mut listings = Vec::new();
        for location in container.select(&location_sel) {
            let Some(info_col) = location.select(&info_col_sel).next() else {
                continue;
            };
            let Some(title_link) = info_col.select(&title_link_sel).next() else {
                continue;
            };
            let title = element_text(&title_link);
            let href = title_link.value().attr("href").unwrap_or("");
            let url = absolutize(Self::ORIGIN, href);
            if url.is_empty() {
                continue;
            }
            let address = info_col
                .select(&address_sel)
                .next()
                .map(|e| element_text(&e))
                .unwrap_or_else(|| ADDRESS_NOT_SPECIFIED.to_string());
            let price = location
                .select(&price_col_sel)
                .next()
                .and_then(|col| col.select(&price_sel).next())
                .map(|e| element_text(&e))
                .unwrap_or_else(|| PRICE_NOT_SPECIFIED.to_string());
            let details = info_col
                .select(&bullets_sel)
                .map(|li| element_text(&li))
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
impl ListingSource for Nederwoon {
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
