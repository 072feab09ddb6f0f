//! Durable seen-set for listing identities.
//!
//! The process has no continuity between runs, so "have we notified about
//! this listing before" lives in a single JSON file: a flat array of
//! identity strings. The store deliberately fails open toward
//! re-notification: an absent, unreadable, or malformed file degrades to
//! the empty set (worst case some listings are announced again), and a
//! failed save is logged but never aborts a run whose notifications have
//! already gone out.

use crate::models::Listing;
use std::collections::HashSet;
use std::io;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("could not access storage file: {0}")]
    Io(#[from] io::Error),
    #[error("could not encode seen listings: {0}")]
    Encode(#[from] serde_json::Error),
}

/// The set of listing identities observed in prior runs.
///
/// Loaded once at run start, mutated in memory, written back at run end
/// by [`SeenListings::commit`]. The orchestrator is the only mutator.
pub struct SeenListings {
    path: PathBuf,
    seen: HashSet<String>,
}

impl SeenListings {
    /// Load the seen-set from `path`.
    ///
    /// Never fails: a missing file means a fresh start, and a malformed
    /// or unreadable one is logged and treated as empty.
    #[instrument(level = "info", skip_all)]
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let seen = match fs::read_to_string(&path).await {
            Ok(body) => match serde_json::from_str::<Vec<String>>(&body) {
                Ok(ids) => {
                    let seen: HashSet<String> = ids.into_iter().collect();
                    info!(count = seen.len(), "Loaded previously seen listings");
                    seen
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Seen-listing state is malformed; starting fresh"
                    );
                    HashSet::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No existing storage file found, starting fresh");
                HashSet::new()
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not read seen-listing state; starting fresh"
                );
                HashSet::new()
            }
        };
        SeenListings { path, seen }
    }

    /// True iff `id` has not been observed in any prior run.
    pub fn is_new(&self, id: &str) -> bool {
        !self.seen.contains(id)
    }

    /// Add `id` to the in-memory set. Idempotent.
    pub fn mark_seen(&mut self, id: &str) {
        self.seen.insert(id.to_string());
    }

    /// Mark every listing's identity as seen, then persist the full set.
    ///
    /// A failed save is logged and accepted; it degrades the next run to
    /// re-notifying, which is preferred over crashing after delivery.
    #[instrument(level = "info", skip_all, fields(count = listings.len()))]
    pub async fn commit(&mut self, listings: &[Listing]) {
        for listing in listings {
            self.mark_seen(&listing.id);
        }
        if let Err(e) = self.save().await {
            error!(path = %self.path.display(), error = %e, "Failed to save seen listings");
        }
    }

    async fn save(&self) -> Result<(), StorageError> {
        let ids: Vec<&String> = self.seen.iter().collect();
        let json = serde_json::to_string(&ids)?;
        fs::write(&self.path, json).await?;
        info!(count = self.seen.len(), "Saved seen listings");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(url: &str) -> Listing {
        Listing::new(
            "Test",
            "t".to_string(),
            url.to_string(),
            "p".to_string(),
            "a".to_string(),
            String::new(),
        )
    }

    #[tokio::test]
    async fn test_missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SeenListings::load(dir.path().join("none.json")).await;
        assert!(storage.is_new("anything"));
    }

    #[tokio::test]
    async fn test_is_new_and_mark_seen() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = SeenListings::load(dir.path().join("seen.json")).await;
        assert!(storage.is_new("abc123"));
        storage.mark_seen("abc123");
        assert!(!storage.is_new("abc123"));
        // Idempotent.
        storage.mark_seen("abc123");
        assert!(!storage.is_new("abc123"));
    }

    #[tokio::test]
    async fn test_commit_round_trips_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        let x = listing("https://example.com/x");
        let y = listing("https://example.com/y");

        let mut storage = SeenListings::load(&path).await;
        storage.commit(&[x.clone(), y.clone()]).await;

        let reloaded = SeenListings::load(&path).await;
        assert!(!reloaded.is_new(&x.id));
        assert!(!reloaded.is_new(&y.id));
        assert!(reloaded.is_new("unrelated"));
    }

    #[tokio::test]
    async fn test_corrupt_file_degrades_to_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        fs::write(&path, "{not json").await.unwrap();

        let mut storage = SeenListings::load(&path).await;
        assert!(storage.is_new("abc"));

        // A later commit still produces a valid file.
        storage.commit(&[listing("https://example.com/z")]).await;
        let body = fs::read_to_string(&path).await.unwrap();
        let ids: Vec<String> = serde_json::from_str(&body).unwrap();
        assert_eq!(ids.len(), 1);
    }

    #[tokio::test]
    async fn test_commit_marks_already_seen_listings_too() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seen.json");
        let a = listing("https://example.com/a");

        let mut storage = SeenListings::load(&path).await;
        storage.mark_seen(&a.id);
        storage.commit(&[a.clone()]).await;

        let reloaded = SeenListings::load(&path).await;
        assert!(!reloaded.is_new(&a.id));
    }
}
