//! Command-line interface definitions for Rental Watch.
//!
//! Every option can also come from the environment, which is how the
//! scheduler-driven deployment (cron or a CI workflow) configures the
//! bot without a command line.

use clap::Parser;

/// Command-line arguments for the Rental Watch bot.
///
/// # Examples
///
/// ```sh
/// # One run against the defaults (Apeldoorn, €0-1500)
/// rental_watch --telegram-token TOKEN --telegram-chat-id 12345
///
/// # Multiple recipients, custom storage location
/// rental_watch --telegram-token TOKEN --telegram-chat-id "123,456" \
///     -s /var/lib/rental_watch/seen.json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// City to search listings in
    #[arg(long, env = "CITY", default_value = "Apeldoorn")]
    pub city: String,

    /// Price range passed to the search URLs, e.g. "0-1500"
    #[arg(long, env = "PRICE_RANGE", default_value = "0-1500")]
    pub price_range: String,

    /// Telegram bot token used to deliver notifications
    #[arg(long, env = "TELEGRAM_TOKEN")]
    pub telegram_token: String,

    /// Comma-separated Telegram chat ids to notify
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: String,

    /// Path of the JSON file holding previously seen listing ids
    #[arg(short, long, env = "STORAGE_FILE", default_value = "seen_listings.json")]
    pub storage_file: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from([
            "rental_watch",
            "--telegram-token",
            "token",
            "--telegram-chat-id",
            "1,2",
            "--city",
            "Zutphen",
        ]);

        assert_eq!(cli.telegram_token, "token");
        assert_eq!(cli.telegram_chat_id, "1,2");
        assert_eq!(cli.city, "Zutphen");
        assert_eq!(cli.price_range, "0-1500");
        assert_eq!(cli.storage_file, "seen_listings.json");
    }

    #[test]
    fn test_cli_short_storage_flag() {
        let cli = Cli::parse_from([
            "rental_watch",
            "--telegram-token",
            "token",
            "--telegram-chat-id",
            "1",
            "-s",
            "/tmp/seen.json",
        ]);

        assert_eq!(cli.storage_file, "/tmp/seen.json");
    }
}
