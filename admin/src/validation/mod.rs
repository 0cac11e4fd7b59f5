//! Required-field validation for collection records.
//!
//! Each content type with rules embeds a JSON Schema (draft 7) from
//! `schemas/`. Besides the standard keywords, a schema carries a
//! `messages` object mapping each required field to the text shown when a
//! record breaks the rule:
//!
//! ```json
//! {
//!   "type": "object",
//!   "required": ["title"],
//!   "properties": { "title": { "type": "string", "pattern": "\\S" } },
//!   "messages": { "title": "Please provide a Job Title for all listings." }
//! }
//! ```
//!
//! Schemas are compiled once per content type and cached. Besides the
//! whole-record validator, every required field gets its own small
//! validator so a failure can be pinned to a field and message.

use jsonschema::Validator;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::content::{ContentType, CONTENT_TYPES};
use crate::error::ValidationError;

// =============================================================================
// Compiled rules
// =============================================================================

struct FieldRule {
    field: String,
    message: String,
    validator: Validator,
}

struct RecordRules {
    record: Validator,
    fields: Vec<FieldRule>,
}

/// Compiled rules per content-type name. A schema that fails to compile is
/// kept as its error so every save of that type reports it.
static RULES: Lazy<HashMap<&'static str, Result<RecordRules, String>>> = Lazy::new(|| {
    CONTENT_TYPES
        .iter()
        .filter_map(|ct| ct.schema.map(|schema| (ct.name, compile(schema))))
        .collect()
});

fn compile(source: &str) -> Result<RecordRules, String> {
    let schema: Value = serde_json::from_str(source).map_err(|e| e.to_string())?;
    let record = jsonschema::draft7::new(&schema).map_err(|e| e.to_string())?;

    let messages = schema.get("messages").and_then(Value::as_object);
    let properties = schema.get("properties").and_then(Value::as_object);
    let required = schema
        .get("required")
        .and_then(Value::as_array)
        .map(|fields| fields.iter().filter_map(Value::as_str).collect::<Vec<_>>())
        .unwrap_or_default();

    let mut fields = Vec::with_capacity(required.len());
    for field in required {
        let property = properties
            .and_then(|p| p.get(field))
            .cloned()
            .unwrap_or_else(|| json!({}));
        let single = json!({
            "required": [field],
            "properties": { field: property }
        });
        let message = messages
            .and_then(|m| m.get(field))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("'{}' is required.", field));

        fields.push(FieldRule {
            field: field.to_string(),
            message,
            validator: jsonschema::draft7::new(&single).map_err(|e| e.to_string())?,
        });
    }

    Ok(RecordRules { record, fields })
}

// =============================================================================
// Public API
// =============================================================================

/// Check every record of a collection against its content type's rules.
///
/// Returns the first offending record (by position) and the first field it
/// breaks. Content types without a schema always pass.
pub fn validate_records(content: &ContentType, records: &[Value]) -> Result<(), ValidationError> {
    let Some(rules) = RULES.get(content.name) else {
        return Ok(());
    };
    let rules = rules.as_ref().map_err(|e| ValidationError::Schema(e.clone()))?;

    for (index, record) in records.iter().enumerate() {
        if rules.record.is_valid(record) {
            continue;
        }

        let err = match rules.fields.iter().find(|rule| !rule.validator.is_valid(record)) {
            Some(rule) => ValidationError::MissingField {
                index,
                field: rule.field.clone(),
                rule: rule.message.clone(),
            },
            // Not a field problem, e.g. the record is not an object at all.
            None => ValidationError::MissingField {
                index,
                field: String::new(),
                rule: rules
                    .record
                    .iter_errors(record)
                    .next()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| "invalid record".to_string()),
            },
        };
        log::debug!("{} failed validation: {}", content.name, err);
        return Err(err);
    }

    Ok(())
}

/// Quick check, true when [`validate_records`] would pass.
pub fn is_valid(content: &ContentType, records: &[Value]) -> bool {
    validate_records(content, records).is_ok()
}

/// Names of the fields a content type requires, in rule order.
pub fn required_fields(content: &ContentType) -> Vec<String> {
    match RULES.get(content.name) {
        Some(Ok(rules)) => rules.fields.iter().map(|rule| rule.field.clone()).collect(),
        _ => Vec::new(),
    }
}
