//! Telegram notification delivery.
//!
//! Delivery is split in two: [`MessageSender`] is the raw "send this text
//! to this chat" capability (Telegram in production, a recording mock in
//! tests), and [`Notifier`] layers the listing-specific concerns on top:
//! the fixed message format, fan-out to every configured recipient, and
//! an in-run notified set so the same listing is never announced twice
//! within one process lifetime. Cross-run deduplication is not handled
//! here; that is the seen-set's job.

use crate::models::Listing;
use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Error)]
pub enum SendError {
    /// The HTTP request failed or the endpoint returned a non-success status.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The endpoint refused the message.
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Capability to push a text message to a single recipient.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), SendError>;
}

/// [`MessageSender`] backed by the Telegram Bot API.
pub struct TelegramSender {
    client: reqwest::Client,
    token: String,
}

impl TelegramSender {
    pub fn new(token: String) -> Self {
        TelegramSender {
            client: reqwest::Client::new(),
            token,
        }
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), SendError> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let payload = serde_json::json!({ "chat_id": chat_id, "text": text });
        let response = self.client.post(&url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(SendError::Rejected(format!(
                "status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// Announces new listings to every configured recipient.
pub struct Notifier<S> {
    sender: S,
    chat_ids: Vec<String>,
    notified: HashSet<String>,
}

impl<S: MessageSender> Notifier<S> {
    /// Build a notifier from a comma-separated recipient list.
    ///
    /// Blank entries (including a fully empty string) are dropped.
    pub fn new(sender: S, chat_ids: &str) -> Self {
        let chat_ids = chat_ids
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(String::from)
            .collect();
        Notifier {
            sender,
            chat_ids,
            notified: HashSet::new(),
        }
    }

    /// Announce a newly discovered listing.
    ///
    /// No-op when this listing was already announced during this run.
    /// One recipient's delivery failure is logged and does not block the
    /// remaining recipients; there is no retry either way, so the
    /// listing counts as notified regardless.
    #[instrument(level = "info", skip_all, fields(id = %listing.id, source = %listing.source))]
    pub async fn notify(&mut self, listing: &Listing) {
        if !self.notified.insert(listing.id.clone()) {
            debug!("Listing already notified this run; skipping");
            return;
        }
        let message = format_message(listing);
        for chat_id in &self.chat_ids {
            match self.sender.send(chat_id, &message).await {
                Ok(()) => info!(chat_id = %chat_id, "Telegram notification sent"),
                Err(e) => {
                    error!(chat_id = %chat_id, error = %e, "Failed to send Telegram notification")
                }
            }
        }
    }
}

fn format_message(listing: &Listing) -> String {
    format!(
        "NEW LISTING FOUND [{}]:\nTitle: {}\nPrice: {}\nAddress: {}\nURL: {}",
        listing.source, listing.title, listing.price, listing.address, listing.url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Records every send; optionally fails for one chat id.
    #[derive(Clone, Default)]
    struct RecordingSender {
        sent: Arc<Mutex<Vec<(String, String)>>>,
        fail_for: Option<String>,
    }

    #[async_trait]
    impl MessageSender for RecordingSender {
        async fn send(&self, chat_id: &str, text: &str) -> Result<(), SendError> {
            if self.fail_for.as_deref() == Some(chat_id) {
                return Err(SendError::Rejected("forced failure".to_string()));
            }
            self.sent
                .lock()
                .unwrap()
                .push((chat_id.to_string(), text.to_string()));
            Ok(())
        }
    }

    fn listing() -> Listing {
        Listing::new(
            "Pararius",
            "Nice Apt".to_string(),
            "https://www.pararius.com/listing-1".to_string(),
            "€1,000".to_string(),
            "Street 1".to_string(),
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_notify_sends_to_every_recipient() {
        let sender = RecordingSender::default();
        let mut notifier = Notifier::new(sender.clone(), "1, 2");
        notifier.notify(&listing()).await;

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "1");
        assert_eq!(sent[1].0, "2");
        assert!(sent[0].1.starts_with("NEW LISTING FOUND [Pararius]:"));
        assert!(sent[0].1.contains("URL: https://www.pararius.com/listing-1"));
    }

    #[tokio::test]
    async fn test_notify_is_idempotent_within_a_run() {
        let sender = RecordingSender::default();
        let mut notifier = Notifier::new(sender.clone(), "1");
        let listing = listing();
        notifier.notify(&listing).await;
        notifier.notify(&listing).await;

        assert_eq!(sender.sent.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_one_failed_recipient_does_not_block_the_rest() {
        let sender = RecordingSender {
            fail_for: Some("1".to_string()),
            ..Default::default()
        };
        let mut notifier = Notifier::new(sender.clone(), "1,2");
        notifier.notify(&listing()).await;

        let sent = sender.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "2");
    }

    #[tokio::test]
    async fn test_blank_chat_ids_are_dropped() {
        let sender = RecordingSender::default();
        let notifier = Notifier::new(sender.clone(), " 1 ,, 2 , ");
        assert_eq!(notifier.chat_ids, vec!["1", "2"]);

        let empty = Notifier::new(sender, "");
        assert!(empty.chat_ids.is_empty());
    }

    #[test]
    fn test_message_format() {
        let message = format_message(&listing());
        assert_eq!(
            message,
            "NEW LISTING FOUND [Pararius]:\nTitle: Nice Apt\nPrice: €1,000\n\
             Address: Street 1\nURL: https://www.pararius.com/listing-1"
        );
    }
}
