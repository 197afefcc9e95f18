use serde_json::{Map, Value};

use super::types::{HeaderEntry, HeaderInput};
use crate::error::{HeaderError, Result};
use crate::mime::HeaderParser;

/// Parsers may wrap the field map once or twice in a `header` key
const MAX_HEADER_DEPTH: usize = 2;

/// Reduce any accepted input shape to an ordered list of entries
pub fn normalize(input: HeaderInput, parser: &HeaderParser) -> Result<Vec<HeaderEntry>> {
    let structured = match input {
        HeaderInput::Raw(text) => parser.parse(&text)?.to_value()?,
        HeaderInput::Mapping(map) => Value::Object(map),
        HeaderInput::Entries(items) => Value::Array(items),
    };

    match unwrap_header(structured) {
        Value::Object(map) => from_mapping(map),
        Value::Array(items) => from_entries(items),
        other => Err(HeaderError::InvalidShape(format!(
            "expected header object or array, got {}",
            other
        ))),
    }
}

fn unwrap_header(mut value: Value) -> Value {
    for _ in 0..MAX_HEADER_DEPTH {
        let inner = match &mut value {
            Value::Object(map) => map.remove("header"),
            _ => None,
        };
        match inner {
            Some(inner) => value = inner,
            None => break,
        }
    }
    value
}

fn from_mapping(map: Map<String, Value>) -> Result<Vec<HeaderEntry>> {
    map.into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::Array(values) => match values.into_iter().next() {
                    Some(first) => text(&key, first)?,
                    None => return Err(HeaderError::EmptyValue(key)),
                },
                other => text(&key, other)?,
            };
            Ok(HeaderEntry::new(&key, value))
        })
        .collect()
}

fn from_entries(items: Vec<Value>) -> Result<Vec<HeaderEntry>> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(mut item) = item else {
                return Err(HeaderError::InvalidShape(format!(
                    "header entry {} is not an object",
                    index
                )));
            };

            // `name` wins over `key` when both are present
            let key = item
                .remove("name")
                .or_else(|| item.remove("key"))
                .ok_or(HeaderError::MissingField {
                    index,
                    field: "key",
                })?;
            let key = text(&format!("key of entry {}", index), key)?;

            let value = item.remove("value").ok_or(HeaderError::MissingField {
                index,
                field: "value",
            })?;
            let value = match value {
                Value::Array(values) => match values.into_iter().next() {
                    Some(first) => text(&key, first)?,
                    None => return Err(HeaderError::EmptyValue(key)),
                },
                other => text(&key, other)?,
            };

            Ok(HeaderEntry::new(&key, value))
        })
        .collect()
}

/// Strings pass through, numbers and booleans use their JSON text
fn text(label: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            Err(HeaderError::InvalidValue(label.to_string()))
        }
    }
}
