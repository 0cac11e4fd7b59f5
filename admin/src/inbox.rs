//! Inbound contact messages.
//!
//! The inbox is a read-only collection: messages arrive from the public
//! contact form, staff read them and delete them. Opening an unread
//! message marks it read on the server.

use serde_json::Value;

use crate::api::ContentApi;
use crate::content::MESSAGES;
use crate::editor::{server_id, CollectionEditor, Confirm, Phase, StatusMessage};

pub struct Inbox<A: ContentApi> {
    editor: CollectionEditor<A>,
}

impl<A: ContentApi> Inbox<A> {
    pub fn new(api: A) -> Self {
        Self {
            editor: CollectionEditor::new(api, &MESSAGES),
        }
    }

    pub fn editor(&self) -> &CollectionEditor<A> {
        &self.editor
    }

    pub fn phase(&self) -> Phase {
        self.editor.phase()
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.editor.status()
    }

    pub async fn load(&mut self) -> bool {
        self.editor.load().await
    }

    pub fn messages(&self) -> Vec<Value> {
        self.editor.records()
    }

    pub fn unread_count(&self) -> usize {
        self.editor
            .entries()
            .iter()
            .filter(|e| !is_read(&e.record))
            .count()
    }

    /// Open a message, marking it read if it was not.
    ///
    /// A failed mark-read is only logged; the message still opens.
    pub async fn open(&mut self, index: usize) -> Option<Value> {
        let key = self.editor.key_at(index)?;
        let record = self.editor.record(index)?.clone();

        if !is_read(&record) {
            if let Some(id) = server_id(&record) {
                match self.editor.api().mark_read(MESSAGES.resource, &id).await {
                    Ok(()) => {
                        self.editor.update_field_by_key(key, "isRead", Value::Bool(true));
                    }
                    Err(err) => log::warn!("Could not mark message {} as read: {}", id, err),
                }
            }
        }

        self.editor
            .index_of(key)
            .and_then(|i| self.editor.record(i))
            .cloned()
    }

    /// Delete a message on the server after confirmation.
    pub async fn remove(&mut self, index: usize, confirm: &impl Confirm) -> bool {
        self.editor.remove_record(index, confirm).await
    }
}

fn is_read(record: &Value) -> bool {
    record.get("isRead").and_then(Value::as_bool).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeApi};
    use crate::error::ApiError;
    use serde_json::json;

    fn inbox_doc() -> Value {
        json!([
            { "_id": "m1", "name": "Chanda", "subject": "Quote", "message": "Hi", "isRead": false },
            { "_id": "m2", "name": "Bwalya", "subject": "Jobs", "message": "Hello", "isRead": true },
            { "_id": "m3", "name": "Mutale", "subject": "Visit", "message": "Hey" }
        ])
    }

    #[tokio::test]
    async fn test_unread_count() {
        let mut inbox = Inbox::new(FakeApi::new().with_doc("messages", inbox_doc()));
        assert!(inbox.load().await);
        assert_eq!(inbox.messages().len(), 3);
        assert_eq!(inbox.unread_count(), 2);
    }

    #[tokio::test]
    async fn test_open_marks_read() {
        let mut inbox = Inbox::new(FakeApi::new().with_doc("messages", inbox_doc()));
        inbox.load().await;

        let opened = inbox.open(0).await.unwrap();
        assert_eq!(opened["isRead"], true);
        assert_eq!(inbox.unread_count(), 1);

        // Already read: no second request
        inbox.open(0).await;
        inbox.open(1).await;
        let marks: Vec<_> = inbox
            .editor()
            .api()
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::MarkRead(..)))
            .collect();
        assert_eq!(marks, vec![Call::MarkRead("messages".into(), "m1".into())]);
        assert!(inbox.open(9).await.is_none());
    }

    #[tokio::test]
    async fn test_mark_read_failure_still_opens() {
        let api = FakeApi::new().with_doc("messages", inbox_doc());
        api.fail("mark_read", ApiError::Network("offline".into()));
        let mut inbox = Inbox::new(api);
        inbox.load().await;

        let opened = inbox.open(2).await.unwrap();
        assert_eq!(opened["name"], "Mutale");
        assert_eq!(inbox.unread_count(), 2);
        assert_eq!(inbox.phase(), Phase::Ready);
    }

    #[tokio::test]
    async fn test_remove_deletes_immediately() {
        let mut inbox = Inbox::new(FakeApi::new().with_doc("messages", inbox_doc()));
        inbox.load().await;

        assert!(inbox.remove(1, &|_: &str| true).await);
        assert_eq!(inbox.editor().api().deletes(), vec!["messages/m2"]);
        assert_eq!(inbox.messages().len(), 2);
        assert_eq!(inbox.status().unwrap().text, "Message deleted successfully.");
    }
}
