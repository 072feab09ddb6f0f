//! # Rental Watch
//!
//! A rental-listing watcher that polls several Dutch housing sites,
//! detects listings it has not seen before, and announces each new one
//! exactly once via Telegram.
//!
//! ## Usage
//!
//! ```sh
//! rental_watch --telegram-token TOKEN --telegram-chat-id "123,456"
//! ```
//!
//! Each invocation performs exactly one pass; periodic polling is
//! achieved by running the binary from a scheduler (cron, CI workflow).
//! State between runs lives solely in the seen-listing file.
//!
//! ## Architecture
//!
//! 1. **Fetch**: every configured source adapter pulls and parses its
//!    search page or API feed (concurrently, failures isolated per source)
//! 2. **Diff**: the merged listings are checked against the durable
//!    seen-set
//! 3. **Notify**: each new listing is sent to every configured chat
//! 4. **Commit**: all listing identities from this run are persisted

use clap::Parser;
use std::error::Error;
use tracing::{debug, info};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod bot;
mod cli;
mod fetch;
mod models;
mod notify;
mod scrapers;
mod storage;

use bot::RentalBot;
use cli::Cli;
use fetch::Fetcher;
use notify::{Notifier, TelegramSender};
use scrapers::{
    huurwoningen::Huurwoningen, nederwoon::Nederwoon, pararius::Pararius, wonen123::Wonen123,
    woonkeus::Woonkeus, ListingSource,
};
use storage::SeenListings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("rental_watch starting up");

    let args = Cli::parse();
    debug!(
        city = %args.city,
        price_range = %args.price_range,
        storage_file = %args.storage_file,
        "Parsed CLI arguments"
    );

    let fetcher = Fetcher::new();
    let sources: Vec<Box<dyn ListingSource>> = vec![
        Box::new(Pararius::new(&args.city, &args.price_range, fetcher.clone())),
        Box::new(Woonkeus::new(&args.city, fetcher.clone())),
        Box::new(Huurwoningen::new(
            &args.city,
            &args.price_range,
            fetcher.clone(),
        )),
        Box::new(Nederwoon::new(&args.city, fetcher.clone())),
        Box::new(Wonen123::new(&args.city, fetcher)),
    ];

    let storage = SeenListings::load(&args.storage_file).await;
    let notifier = Notifier::new(
        TelegramSender::new(args.telegram_token),
        &args.telegram_chat_id,
    );

    let mut bot = RentalBot::new(sources, storage, notifier);
    bot.check_for_new_listings().await;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Run complete"
    );

    Ok(())
}
