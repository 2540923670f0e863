use serde_json::Value;
use tracing::{debug, warn};

use crate::document::model::Document;
use crate::error::{AppError, Result};

/// Parses a raw JSON declaration into a [`Document`].
///
/// Missing or `null` fields become `None`. The document must be a JSON object
/// carrying a `products` array; anything else is a parse failure, logged and
/// returned to the caller.
pub fn parse(raw: &str) -> Result<Document> {
    parse_document(raw).map_err(|e| {
        warn!("Rejected document: {}", e);
        e
    })
}

fn parse_document(raw: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| AppError::Parse(format!("invalid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| AppError::Parse(format!("expected a JSON object, got {}", kind_of(&value))))?;

    match object.get("products") {
        Some(Value::Array(_)) => {}
        Some(Value::Null) | None => {
            return Err(AppError::Parse("missing `products` array".into()));
        }
        Some(other) => {
            return Err(AppError::Parse(format!(
                "`products` must be an array, got {}",
                kind_of(other)
            )));
        }
    }

    let document: Document = serde_json::from_value(value)
        .map_err(|e| AppError::Parse(e.to_string()))?;

    debug!(
        "Parsed document {:?} with {} product(s)",
        document.doc_id,
        document.products.len()
    );
    Ok(document)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
