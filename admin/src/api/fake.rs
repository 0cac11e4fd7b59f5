//! In-memory content API for tests.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use super::client::ContentApi;
use crate::error::{ApiError, ApiResult};

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(String),
    Store(String, Value),
    Delete(String, String),
    MarkRead(String, String),
}

/// Stores documents per resource, assigns `_id`s on store like the real
/// backend, and records every call. Operations can be made to fail.
#[derive(Default)]
pub struct FakeApi {
    docs: RefCell<HashMap<String, Value>>,
    calls: RefCell<Vec<Call>>,
    failures: RefCell<HashMap<&'static str, ApiError>>,
    next_id: Cell<u32>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doc(self, resource: &str, doc: Value) -> Self {
        self.docs.borrow_mut().insert(resource.to_string(), doc);
        self
    }

    /// Make every call of `op` ("fetch", "store", "delete", "mark_read") fail.
    pub fn fail(&self, op: &'static str, err: ApiError) {
        self.failures.borrow_mut().insert(op, err);
    }

    pub fn heal(&self, op: &'static str) {
        self.failures.borrow_mut().remove(op);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn stores(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Store(_, body) => Some(body),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(resource, id) => Some(format!("{}/{}", resource, id)),
                _ => None,
            })
            .collect()
    }

    pub fn doc(&self, resource: &str) -> Option<Value> {
        self.docs.borrow().get(resource).cloned()
    }

    fn check(&self, op: &'static str) -> ApiResult<()> {
        match self.failures.borrow().get(op) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn assign_ids(&self, records: &mut Vec<Value>) {
        for record in records.iter_mut() {
            if let Some(obj) = record.as_object_mut() {
                if !obj.contains_key("_id") {
                    let n = self.next_id.get() + 1;
                    self.next_id.set(n);
                    obj.insert("_id".into(), Value::String(format!("srv-{}", n)));
                }
            }
        }
    }

    fn arrays_mut(doc: &mut Value) -> Vec<&mut Vec<Value>> {
        match doc {
            Value::Array(items) => vec![items],
            Value::Object(map) => map.values_mut().filter_map(Value::as_array_mut).collect(),
            _ => Vec::new(),
        }
    }
}

impl ContentApi for FakeApi {
    async fn fetch(&self, resource: &str) -> ApiResult<Value> {
        self.calls.borrow_mut().push(Call::Fetch(resource.to_string()));
        self.check("fetch")?;
        Ok(self.doc(resource).unwrap_or(Value::Null))
    }

    async fn store(&self, resource: &str, document: &Value) -> ApiResult<Value> {
        self.calls
            .borrow_mut()
            .push(Call::Store(resource.to_string(), document.clone()));
        self.check("store")?;

        let mut stored = document.clone();
        for items in Self::arrays_mut(&mut stored) {
            self.assign_ids(items);
        }
        self.docs.borrow_mut().insert(resource.to_string(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, resource: &str, id: &str) -> ApiResult<()> {
        self.calls
            .borrow_mut()
            .push(Call::Delete(resource.to_string(), id.to_string()));
        self.check("delete")?;

        if let Some(doc) = self.docs.borrow_mut().get_mut(resource) {
            for items in Self::arrays_mut(doc) {
                items.retain(|r| r.get("_id").and_then(Value::as_str) != Some(id));
            }
        }
        Ok(())
    }

    async fn mark_read(&self, resource: &str, id: &str) -> ApiResult<()> {
        self.calls
            .borrow_mut()
            .push(Call::MarkRead(resource.to_string(), id.to_string()));
        self.check("mark_read")?;

        if let Some(doc) = self.docs.borrow_mut().get_mut(resource) {
            for items in Self::arrays_mut(doc) {
                for record in items.iter_mut() {
                    if record.get("_id").and_then(Value::as_str) == Some(id) {
                        record["isRead"] = Value::Bool(true);
                    }
                }
            }
        }
        Ok(())
    }
}
