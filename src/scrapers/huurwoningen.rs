//! Huurwoningen listing scraper.
//!
//! Scrapes [huurwoningen.nl](https://www.huurwoningen.nl) search results,
//! e.g. `https://www.huurwoningen.nl/in/apeldoorn/?price=0-1500`. The
//! markup closely mirrors Pararius (same listing-search-item classes)
//! but serves the content blocks directly without an outer list
//! container.

use super::{element_text, ListingSource, ScrapeError};
use crate::fetch::Fetcher;
use crate::models::{absolutize, Listing, ADDRESS_NOT_SPECIFIED, PRICE_NOT_SPECIFIED};
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{info, instrument};

pub struct Huurwoningen {
    search_url: String,
    fetcher: Fetcher,
}

impl Huurwoningen {
    pub const SOURCE: &'static str = "Huurwoningen";
    const ORIGIN: &'static str = "https://www.huurwoningen.nl";

    pub fn new(city: &str, price_range: &str, fetcher: Fetcher) -> Self {
        let search_url = format!(
            "{}/in/{}/?price={}",
            Self::ORIGIN,
            city.to_lowercase(),
            price_range
        );
        Huurwoningen {
            search_url,
            fetcher,
        }
    }

    pub(crate) fn parse_listings(&self, html: &str) -> Vec<Listing> {
        let document = Html::parse_document(html);
        let content_sel = Selector::parse(".listing-search-item__content").unwrap();
        let title_sel = Selector::parse("h2.listing-search-item__title a").unwrap();
        let price_sel = Selector::parse(".listing-search-item__price").unwrap();
        let address_sel = Selector::parse(".listing-search-item__sub-title").unwrap();

        let mut listings = Vec::new();
        for element in document.select(&content_sel) {
            let Some(title_element) = element.select(&title_sel).next() else {
                continue;
            };
            let title = element_text(&title_element);
            let href = title_element.value().attr("href").unwrap_or("");
            let url = absolutize(Self::ORIGIN, href);
            if url.is_empty() {
                continue;
            }
            let address = element
                .select(&address_sel)
                .next()
                .map(|e| element_text(&e))
                .unwrap_or_else(|| ADDRESS_NOT_SPECIFIED.to_string());
            let price = element
                .select(&price_sel)
                .next()
                .map(|e| element_text(&e))
                .unwrap_or_else(|| PRICE_NOT_SPECIFIED.to_string());
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
impl ListingSource for Huurwoningen {
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

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        <div class="listing-search-item__content">
          <h2 class="listing-search-item__title"><a href="/woning-1">Home</a></h2>
          <div class="listing-search-item__price">€1,200</div>
          <div class="listing-search-item__sub-title">Street 2</div>
        </div>
    "#;

    fn scraper() -> Huurwoningen {
        Huurwoningen::new("Apeldoorn", "0-1500", Fetcher::new())
    }

    #[test]
    fn test_parse_sample_listing() {
        let listings = scraper().parse_listings(SAMPLE);
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].url, "https://www.huurwoningen.nl/woning-1");
        assert_eq!(listings[0].title, "Home");
        assert_eq!(listings[0].price, "€1,200");
        assert_eq!(listings[0].address, "Street 2");
    }

    #[test]
    fn test_absolute_href_used_verbatim() {
        let html = r#"
            <div class="listing-search-item__content">
              <h2 class="listing-search-item__title">
                <a href="https://www.huurwoningen.nl/woning-2">Other</a>
              </h2>
            </div>
        "#;
        let listings = scraper().parse_listings(html);
        assert_eq!(listings[0].url, "https://www.huurwoningen.nl/woning-2");
    }

    #[test]
    fn test_element_with_empty_href_is_skipped() {
        let html = r#"
            <div class="listing-search-item__content">
              <h2 class="listing-search-item__title"><a href="">No link</a></h2>
            </div>
        "#;
        assert!(scraper().parse_listings(html).is_empty());
    }
}
