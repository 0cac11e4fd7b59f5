//! Collection editor.
//!
//! One editor drives the load → edit → save cycle for any collection
//! content type. It never returns errors: failures become an error
//! [`StatusMessage`] and the [`Phase::Error`] phase, and the caller observes
//! state. `Error` is not terminal; the next `load()` or `save()` retries.
//!
//! ```text
//! Idle --load()--> Loading --ok--> Ready --save()--> Saving --ok--> Ready
//!                                                          \--ok, refetch--> Loading --> Ready
//! any --failure--> Error
//! ```
//!
//! # Record identity
//!
//! Every record in local state gets an [`EntryKey`] when it enters
//! (on load or add). Keys never change while the record is held, so a
//! removal that waits on the server still targets the right record even if
//! the list moved in between. The server's own identity is the record's
//! `_id` field, see [`server_id`].
//!
//! # Example
//!
//! ```rust,ignore
//! use sethmo_admin::{content, CollectionEditor, HttpContentApi};
//!
//! let mut jobs = CollectionEditor::new(api, &content::CAREERS);
//! jobs.load().await;
//! jobs.add_record();
//! jobs.update_field(0, "title", "Senior Mine Engineer".into());
//! if !jobs.save().await {
//!     eprintln!("{}", jobs.status().unwrap().text);
//! }
//! ```

pub mod status;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::api::ContentApi;
use crate::content::{ContentType, Deletion, Envelope, InsertAt};
use crate::error::{ApiError, ApiResult};
use crate::validation;

pub use status::{StatusBoard, StatusLevel, StatusMessage};

// =============================================================================
// Types
// =============================================================================

/// Lifecycle stage of an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Loading,
    Ready,
    Saving,
    Error,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Loading => "loading",
            Phase::Ready => "ready",
            Phase::Saving => "saving",
            Phase::Error => "error",
        };
        f.write_str(name)
    }
}

/// Client-side handle of a record, independent of its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryKey(Uuid);

impl EntryKey {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EntryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A record held by an editor.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub key: EntryKey,
    pub record: Value,
}

impl Entry {
    fn new(record: Value) -> Self {
        Self {
            key: EntryKey::generate(),
            record,
        }
    }
}

/// The user's answer to a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Confirms everything (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Server identity of a record: a non-empty `_id` string.
pub fn server_id(record: &Value) -> Option<String> {
    record
        .get("_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Editor
// =============================================================================

/// Load/edit/save state machine for one collection content type.
pub struct CollectionEditor<A: ContentApi> {
    api: A,
    content: &'static ContentType,
    entries: Vec<Entry>,
    /// Envelope fields other than the record array, sent back verbatim.
    extras: Map<String, Value>,
    phase: Phase,
    status: StatusBoard,
}

impl<A: ContentApi> CollectionEditor<A> {
    pub fn new(api: A, content: &'static ContentType) -> Self {
        Self {
            api,
            content,
            entries: Vec::new(),
            extras: Map::new(),
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

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Snapshot of the records, in order.
    pub fn records(&self) -> Vec<Value> {
        self.entries.iter().map(|e| e.record.clone()).collect()
    }

    pub fn record(&self, index: usize) -> Option<&Value> {
        self.entries.get(index).map(|e| &e.record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn key_at(&self, index: usize) -> Option<EntryKey> {
        self.entries.get(index).map(|e| e.key)
    }

    pub fn index_of(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|e| e.key == key)
    }

    // -------------------------------------------------------------------------
    // Status
    // -------------------------------------------------------------------------

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.current()
    }

    pub fn clear_expired_status(&mut self, now: DateTime<Utc>) -> bool {
        self.status.clear_expired(now)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusMessage> {
        self.status.subscribe()
    }

    fn fail(&mut self, text: String) {
        self.phase = Phase::Error;
        self.status.post(StatusMessage::error(text));
    }

    // -------------------------------------------------------------------------
    // Envelope
    // -------------------------------------------------------------------------

    /// An envelope field other than the records, e.g. `sectionTitle`.
    pub fn extra(&self, field: &str) -> Option<&Value> {
        self.extras.get(field)
    }

    /// Set an envelope field. Bare collections have no envelope.
    pub fn set_extra(&mut self, field: &str, value: Value) -> bool {
        match self.content.items_key() {
            Some(key) if key != field => {
                self.extras.insert(field.to_string(), value);
                true
            }
            _ => false,
        }
    }

    /// The payload `save()` sends.
    pub fn to_document(&self) -> Value {
        let records = Value::Array(self.records());
        match self.content.items_key() {
            Some(key) => {
                let mut doc = self.extras.clone();
                doc.insert(key.to_string(), records);
                Value::Object(doc)
            }
            None => records,
        }
    }

    fn unwrap_document(&self, doc: Value) -> ApiResult<(Vec<Value>, Map<String, Value>)> {
        match (self.content.envelope, doc) {
            (_, Value::Null) => Ok((Vec::new(), Map::new())),
            (_, Value::Array(items)) => Ok((items, Map::new())),
            (Envelope::Key(key), Value::Object(mut map)) => match map.remove(key) {
                Some(Value::Array(items)) => Ok((items, map)),
                None | Some(Value::Null) => Ok((Vec::new(), map)),
                Some(_) => Err(ApiError::Decode(format!("'{}' is not an array", key))),
            },
            (Envelope::Key(key), _) => Err(ApiError::Decode(format!(
                "expected an object holding '{}'",
                key
            ))),
            (Envelope::Bare, _) => Err(ApiError::Decode("expected an array".to_string())),
        }
    }

    /// Replace local state with a whole document (as `to_document` returns).
    /// Nothing is sent until `save()`.
    pub fn replace_document(&mut self, doc: Value) -> bool {
        match self.unwrap_document(doc) {
            Ok((records, extras)) => {
                self.entries = records.into_iter().map(Entry::new).collect();
                self.extras = extras;
                true
            }
            Err(err) => {
                self.fail(format!("{}: {}", self.content.texts.save_failed, err));
                false
            }
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    /// Fetch the collection, replacing local state wholesale.
    pub async fn load(&mut self) -> bool {
        let resource = self.content.resource;
        self.phase = Phase::Loading;
        self.entries.clear();
        self.extras.clear();
        log::info!("Loading {}", resource);

        let result = self
            .api
            .fetch(resource)
            .await
            .and_then(|doc| self.unwrap_document(doc));

        match result {
            Ok((mut records, extras)) => {
                if records.is_empty() {
                    if let Some(seed) = self.content.seed {
                        records = seed();
                        log::info!("{} is empty, using {} default records", resource, records.len());
                    }
                }
                log::debug!("Loaded {} records from {}", records.len(), resource);
                self.entries = records.into_iter().map(Entry::new).collect();
                self.extras = extras;
                self.phase = Phase::Ready;
                self.status.clear();
                true
            }
            Err(err) => {
                log::error!("Failed to load {}: {}", resource, err);
                self.fail(format!("{}: {}", self.content.texts.load_failed, err));
                false
            }
        }
    }

    /// Insert a new record from the content type's template. No server call.
    pub fn add_record(&mut self) -> EntryKey {
        let record = self.content.new_record(&self.records());
        self.insert_record(record)
    }

    /// Insert `record` where this content type puts new records.
    pub fn insert_record(&mut self, record: Value) -> EntryKey {
        let entry = Entry::new(record);
        let key = entry.key;
        match self.content.insert_at {
            InsertAt::Front => self.entries.insert(0, entry),
            InsertAt::Back => self.entries.push(entry),
        }
        key
    }

    /// Set one field of the record at `index`. Out of range is a no-op.
    pub fn update_field(&mut self, index: usize, field: &str, value: Value) -> bool {
        match self.key_at(index) {
            Some(key) => self.update_field_by_key(key, field, value),
            None => false,
        }
    }

    pub fn update_field_by_key(&mut self, key: EntryKey, field: &str, value: Value) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| e.key == key) else {
            return false;
        };
        match entry.record.as_object_mut() {
            Some(obj) => {
                obj.insert(field.to_string(), value);
                true
            }
            None => false,
        }
    }

    /// Remove the record at `index` after confirmation.
    pub async fn remove_record(&mut self, index: usize, confirm: &impl Confirm) -> bool {
        match self.key_at(index) {
            Some(key) => self.remove_by_key(key, confirm).await,
            None => false,
        }
    }

    /// Remove a record after confirmation.
    ///
    /// A persisted record of an immediate-deletion type is deleted on the
    /// server first and leaves local state only once that succeeded. Anything
    /// else is removed locally; deferred types persist it on the next save.
    pub async fn remove_by_key(&mut self, key: EntryKey, confirm: &impl Confirm) -> bool {
        let Some(index) = self.index_of(key) else {
            return false;
        };
        if !confirm.confirm(self.content.texts.delete_prompt) {
            log::debug!("Removal of {} declined", key);
            return false;
        }

        let texts = self.content.texts;
        let id = server_id(&self.entries[index].record);

        if let (Deletion::Immediate, Some(id)) = (self.content.deletion, id) {
            self.status.post(StatusMessage::info(texts.deleting));
            if let Err(err) = self.api.delete(self.content.resource, &id).await {
                log::error!("DELETE {}/{} failed: {}", self.content.resource, id, err);
                self.fail(format!("{} {}", texts.delete_failed, err));
                return false;
            }
            // The list may have changed while the request was in flight.
            if let Some(index) = self.index_of(key) {
                self.entries.remove(index);
            }
            self.phase = Phase::Ready;
            self.status.post(StatusMessage::success(texts.deleted));
            return true;
        }

        self.entries.remove(index);
        true
    }

    /// Validate and persist the whole collection.
    pub async fn save(&mut self) -> bool {
        let texts = self.content.texts;

        if !self.content.writable {
            self.fail(format!("{}: {} is read-only", texts.save_failed, self.content.label));
            return false;
        }

        if let Err(err) = validation::validate_records(self.content, &self.records()) {
            self.fail(err.to_string());
            return false;
        }

        self.phase = Phase::Saving;
        self.status.post(StatusMessage::info(texts.saving));
        let document = self.to_document();

        if let Err(err) = self.api.store(self.content.resource, &document).await {
            log::error!("POST {} failed: {}", self.content.resource, err);
            self.fail(format!("{}: {}", texts.save_failed, err));
            return false;
        }
        log::info!("Saved {} records to {}", self.len(), self.content.resource);

        if self.content.refetch_after_save && !self.load().await {
            return false;
        }

        self.phase = Phase::Ready;
        self.status.post(StatusMessage::success(texts.saved));
        true
    }
}

impl<A: ContentApi> fmt::Debug for CollectionEditor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionEditor")
            .field("content", &self.content.name)
            .field("phase", &self.phase)
            .field("records", &self.entries.len())
            .finish_non_exhaustive()
    }
}
