//! Transient status messages.
//!
//! Every editor owns a [`StatusBoard`]: the current message (shown for a
//! fixed window, then cleared by the caller) and a broadcast channel so a
//! front end can follow every message as it is posted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::broadcast;

use crate::config::{STATUS_CHANNEL_CAPACITY, STATUS_DISPLAY_MS};

/// Badge colour of a status message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StatusLevel {
    Info,
    Success,
    Error,
}

/// A single status message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusMessage {
    pub level: StatusLevel,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

impl StatusMessage {
    pub fn new(level: StatusLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            posted_at: Utc::now(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(StatusLevel::Error, text)
    }

    pub fn is_error(&self) -> bool {
        self.level == StatusLevel::Error
    }

    /// Whether the message has been visible for at least `window`.
    pub fn is_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        match chrono::Duration::from_std(window) {
            Ok(window) => now - self.posted_at >= window,
            Err(_) => false,
        }
    }
}

/// Current status plus a feed of every status posted.
#[derive(Debug)]
pub struct StatusBoard {
    current: Option<StatusMessage>,
    window: Duration,
    sender: broadcast::Sender<StatusMessage>,
}

impl StatusBoard {
    pub fn new(window: Duration) -> Self {
        let (sender, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        Self {
            current: None,
            window,
            sender,
        }
    }

    pub fn current(&self) -> Option<&StatusMessage> {
        self.current.as_ref()
    }

    /// Replace the current message and broadcast it.
    pub fn post(&mut self, message: StatusMessage) {
        match message.level {
            StatusLevel::Error => log::warn!("{}", message.text),
            _ => log::info!("{}", message.text),
        }
        // No subscribers is fine
        let _ = self.sender.send(message.clone());
        self.current = Some(message);
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Clear the current message once its display window has passed.
    /// Returns whether something was cleared.
    pub fn clear_expired(&mut self, now: DateTime<Utc>) -> bool {
        let expired = self
            .current
            .as_ref()
            .is_some_and(|m| m.is_expired(now, self.window));
        if expired {
            self.current = None;
        }
        expired
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusMessage> {
        self.sender.subscribe()
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(Duration::from_millis(STATUS_DISPLAY_MS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_uses_display_window() {
        let mut board = StatusBoard::default();
        board.post(StatusMessage::success("Saved successfully!"));
        let posted = board.current().unwrap().posted_at;

        assert!(!board.clear_expired(posted + chrono::Duration::milliseconds(2999)));
        assert!(board.current().is_some());
        assert!(board.clear_expired(posted + chrono::Duration::milliseconds(3000)));
        assert!(board.current().is_none());
        assert!(!board.clear_expired(posted + chrono::Duration::seconds(10)));
    }

    #[test]
    fn test_subscribers_see_every_message() {
        let mut board = StatusBoard::new(Duration::from_secs(1));
        let mut rx = board.subscribe();

        board.post(StatusMessage::info("Saving..."));
        board.post(StatusMessage::error("Error saving data"));

        assert_eq!(rx.try_recv().unwrap().text, "Saving...");
        let second = rx.try_recv().unwrap();
        assert!(second.is_error());
        assert_eq!(board.current(), Some(&second));
    }

    #[test]
    fn test_level_serializes_lowercase() {
        let json = serde_json::to_value(StatusMessage::success("ok")).unwrap();
        assert_eq!(json["level"], "success");
        assert!(json.get("postedAt").is_some());
    }
}
