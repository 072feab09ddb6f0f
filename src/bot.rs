//! Orchestration of one polling run.
//!
//! A run fans out over every configured source concurrently, flattens
//! whatever they produce into one unordered collection, announces the
//! listings whose identity is absent from the seen-set, and finally
//! commits the whole collection back to storage. The commit covers every
//! listing of the run, new and already-seen alike, so any identity
//! produced this run is guaranteed seen afterward.
//!
//! Sources are isolated at this boundary: an adapter error is logged and
//! downgraded to an empty contribution, never letting one broken site
//! abort the others or the commit step.

use crate::notify::{MessageSender, Notifier};
use crate::scrapers::ListingSource;
use crate::storage::SeenListings;
use futures::stream::{self, StreamExt};
use tracing::{debug, info, instrument, warn};

/// Upper bound on sources fetched at the same time.
const CONCURRENT_SOURCES: usize = 4;

pub struct RentalBot<S: MessageSender> {
    sources: Vec<Box<dyn ListingSource>>,
    storage: SeenListings,
    notifier: Notifier<S>,
}

impl<S: MessageSender> RentalBot<S> {
    pub fn new(
        sources: Vec<Box<dyn ListingSource>>,
        storage: SeenListings,
        notifier: Notifier<S>,
    ) -> Self {
        RentalBot {
            sources,
            storage,
            notifier,
        }
    }

    /// Perform one full poll-diff-notify-commit pass.
    ///
    /// Best-effort by design: there is no overall failure path, and the
    /// commit runs regardless of how many sources or deliveries failed.
    #[instrument(level = "info", skip_all, fields(sources = self.sources.len()))]
    pub async fn check_for_new_listings(&mut self) {
        let all_listings: Vec<_> = stream::iter(&self.sources)
            .map(|source| async move {
                match source.fetch_listings().await {
                    Ok(listings) => {
                        debug!(
                            source = source.name(),
                            count = listings.len(),
                            "Source returned listings"
                        );
                        listings
                    }
                    Err(e) => {
                        warn!(
                            source = source.name(),
                            error = %e,
                            "Source failed; contributing no listings"
                        );
                        Vec::new()
                    }
                }
            })
            .buffer_unordered(CONCURRENT_SOURCES)
            .collect::<Vec<_>>()
            .await
            .into_iter()
            .flatten()
            .collect();

        let new_listings: Vec<_> = all_listings
            .iter()
            .filter(|listing| self.storage.is_new(&listing.id))
            .collect();

        if new_listings.is_empty() {
            info!(total = all_listings.len(), "No new listings found");
        } else {
            info!(
                count = new_listings.len(),
                total = all_listings.len(),
                "Found new listings across all sources"
            );
            for listing in new_listings {
                self.notifier.notify(listing).await;
            }
        }

        self.storage.commit(&all_listings).await;
    }
}
