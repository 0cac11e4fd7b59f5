//! Singleton document editor.
//!
//! Settings-style resources (`hero`, `settings`, ...) hold one JSON object
//! instead of a list. The editor follows the same phases and status rules
//! as [`CollectionEditor`](crate::editor::CollectionEditor): load, edit
//! fields, POST the whole object back.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tokio::sync::broadcast;

use crate::api::ContentApi;
use crate::content::ContentType;
use crate::editor::{Phase, StatusBoard, StatusMessage};

/// Load/edit/save state machine for one singleton document.
pub struct DocumentEditor<A: ContentApi> {
    api: A,
    content: &'static ContentType,
    document: Map<String, Value>,
    phase: Phase,
    status: StatusBoard,
}

impl<A: ContentApi> DocumentEditor<A> {
    /// Starts out holding the content type's defaults.
    pub fn new(api: A, content: &'static ContentType) -> Self {
        Self {
            api,
            content,
            document: defaults(content),
            phase: Phase::Idle,
            status: StatusBoard::default(),
        }
    }

    pub fn with_status_window(mut self, window: Duration) -> Self {
        self.status = StatusBoard::new(window);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn content(&self) -> &'static ContentType {
        self.content
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    pub fn clear_expired_status(&mut self, now: DateTime<Utc>) -> bool {
        self.status.clear_expired(now)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusMessage> {
        self.status.subscribe()
    }

    /// The payload `save()` sends.
    pub fn to_document(&self) -> Value {
        Value::Object(self.document.clone())
    }

    /// Value at a dotted path, e.g. `socialLinks.linkedin`.
    pub fn get(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let mut current = self.document.get(parts.next()?)?;
        for part in parts {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Set a field by dotted path, creating intermediate objects.
    /// Fails when the path runs through a non-object value.
    pub fn set_field(&mut self, path: &str, value: Value) -> bool {
        let parts: Vec<&str> = path.split('.').collect();
        if parts.iter().any(|p| p.is_empty()) {
            return false;
        }
        let Some((last, parents)) = parts.split_last() else {
            return false;
        };

        let mut target = &mut self.document;
        for part in parents {
            let slot = target
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match slot.as_object_mut() {
                Some(obj) => target = obj,
                None => return false,
            }
        }
        target.insert(last.to_string(), value);
        true
    }

    /// Replace the whole local document, merged over the defaults.
    pub fn replace_document(&mut self, doc: Value) -> bool {
        match doc {
            Value::Object(map) => {
                self.document = defaults(self.content);
                merge(&mut self.document, map);
                true
            }
            _ => {
                self.fail(format!(
                    "{}: expected a JSON object",
                    self.content.texts.save_failed
                ));
                false
            }
        }
    }

    fn fail(&mut self, text: String) {
        self.phase = Phase::Error;
        self.status.post(StatusMessage::error(text));
    }

    /// Fetch the document. Fields the server lacks (or sends as null) keep
    /// their defaults.
    pub async fn load(&mut self) -> bool {
        let resource = self.content.resource;
        self.phase = Phase::Loading;
        self.document = defaults(self.content);
        log::info!("Loading {}", resource);

        match self.api.fetch(resource).await {
            Ok(Value::Object(map)) => {
                merge(&mut self.document, map);
                self.phase = Phase::Ready;
                self.status.clear();
                true
            }
            Ok(Value::Null) => {
                log::info!("{} has no saved document yet, using defaults", resource);
                self.phase = Phase::Ready;
                self.status.clear();
                true
            }
            Ok(_) => {
                self.fail(format!(
                    "{}: Invalid response: expected a JSON object",
                    self.content.texts.load_failed
                ));
                false
            }
            Err(err) => {
                log::error!("Failed to load {}: {}", resource, err);
                self.fail(format!("{}: {}", self.content.texts.load_failed, err));
                false
            }
        }
    }

    /// POST the whole document.
    pub async fn save(&mut self) -> bool {
        let texts = self.content.texts;
        self.phase = Phase::Saving;
        self.status.post(StatusMessage::info(texts.saving));

        let document = self.to_document();
        match self.api.store(self.content.resource, &document).await {
            Ok(_) => {
                self.phase = Phase::Ready;
                self.status.post(StatusMessage::success(texts.saved));
                true
            }
            Err(err) => {
                log::error!("POST {} failed: {}", self.content.resource, err);
                self.fail(format!("{}: {}", texts.save_failed, err));
                false
            }
        }
    }
}

impl<A: ContentApi> fmt::Debug for DocumentEditor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentEditor")
            .field("content", &self.content.name)
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

fn defaults(content: &ContentType) -> Map<String, Value> {
    match content.new_record(&[]) {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// Overlay `incoming` onto `base`. Nested objects merge key by key; nulls
/// never replace a default.
fn merge(base: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        match value {
            Value::Null => {}
            Value::Object(nested) => match base.get_mut(&key) {
                Some(Value::Object(existing)) => merge(existing, nested),
                _ => {
                    base.insert(key, Value::Object(nested));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeApi;
    use crate::content::{COMPANY, HERO, SETTINGS};
    use crate::error::ApiError;
    use serde_json::json;

    #[tokio::test]
    async fn test_load_merges_over_defaults() {
        let api = FakeApi::new().with_doc(
            "settings",
            json!({
                "_id": "s1",
                "companyEmail": "info@sethmogroup.com",
                "siteTitle": null,
                "socialLinks": { "linkedin": "https://linkedin.com/company/sethmo" }
            }),
        );
        let mut editor = DocumentEditor::new(api, &SETTINGS);

        assert!(editor.load().await);
        assert_eq!(editor.phase(), Phase::Ready);
        assert_eq!(editor.get("companyEmail"), Some(&json!("info@sethmogroup.com")));
        assert_eq!(editor.get("siteTitle"), Some(&json!("")));
        assert_eq!(
            editor.get("socialLinks.linkedin"),
            Some(&json!("https://linkedin.com/company/sethmo"))
        );
        assert_eq!(editor.get("socialLinks.twitter"), Some(&json!("")));
        assert_eq!(editor.get("_id"), Some(&json!("s1")));
    }

    #[tokio::test]
    async fn test_missing_document_uses_defaults() {
        let mut editor = DocumentEditor::new(FakeApi::new(), &COMPANY);
        assert!(editor.load().await);
        assert_eq!(editor.get("motto"), Some(&json!("Inspired By You")));
    }

    #[tokio::test]
    async fn test_load_failure() {
        let api = FakeApi::new();
        api.fail("fetch", ApiError::Network("dns error".into()));
        let mut editor = DocumentEditor::new(api, &HERO);

        assert!(!editor.load().await);
        assert_eq!(editor.phase(), Phase::Error);
        assert!(editor.status().unwrap().text.starts_with("Failed to load settings"));
    }

    #[test]
    fn test_set_field_paths() {
        let mut editor = DocumentEditor::new(FakeApi::new(), &SETTINGS);
        assert!(editor.set_field("socialLinks.facebook", json!("https://fb.com/sethmo")));
        assert!(editor.set_field("footer.note", json!("New")));
        assert!(!editor.set_field("siteTitle.nested", json!("x")));
        assert!(!editor.set_field("", json!("x")));
        assert!(!editor.set_field("a..b", json!("x")));

        assert_eq!(editor.get("socialLinks.facebook"), Some(&json!("https://fb.com/sethmo")));
        assert_eq!(editor.get("socialLinks.linkedin"), Some(&json!("")));
        assert_eq!(editor.get("footer.note"), Some(&json!("New")));
    }

    #[tokio::test]
    async fn test_save_posts_whole_document() {
        let mut editor = DocumentEditor::new(FakeApi::new(), &HERO);
        editor.load().await;
        editor.set_field("mediaType", json!("image"));

        assert!(editor.save().await);
        let stores = editor.api().stores();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0]["mediaType"], "image");
        assert_eq!(stores[0]["button1Text"], "Explore Our Sectors");
        assert_eq!(editor.status().unwrap().text, "Settings saved successfully!");
    }

    #[tokio::test]
    async fn test_save_failure_keeps_edits() {
        let api = FakeApi::new();
        api.fail(
            "store",
            ApiError::Server {
                status: 401,
                message: "Unauthorized".into(),
            },
        );
        let mut editor = DocumentEditor::new(api, &COMPANY);
        editor.set_field("vision", json!("Grow Zambia"));

        assert!(!editor.save().await);
        assert_eq!(editor.phase(), Phase::Error);
        assert_eq!(editor.status().unwrap().text, "Error saving: Unauthorized");
        assert_eq!(editor.get("vision"), Some(&json!("Grow Zambia")));
    }

    #[test]
    fn test_replace_document_rejects_non_objects() {
        let mut editor = DocumentEditor::new(FakeApi::new(), &COMPANY);
        assert!(!editor.replace_document(json!([1, 2])));
        assert!(editor.replace_document(json!({ "name": "Sethmo" })));
        assert_eq!(editor.get("motto"), Some(&json!("Inspired By You")));
        assert_eq!(editor.get("name"), Some(&json!("Sethmo")));
    }
}
