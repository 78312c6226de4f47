//! Turns any [`ApiError`] into the single message shown in the error banner.
//!
//! The service does not stick to one error shape, so a fixed list of probes
//! is tried in order and the first non-empty answer wins. New shapes are
//! supported by adding an entry to [`EXTRACTORS`].

use serde_json::Value;

use super::ApiError;

pub const FALLBACK_MESSAGE: &str = "Upload failed";

type Extractor = fn(&ApiError) -> Option<String>;

pub const EXTRACTORS: &[Extractor] = &[
    error_field,
    detail_field,
    message_field,
    stringified_body,
    status_text,
    raw_message,
];

pub fn normalize_error(err: &ApiError) -> String {
    EXTRACTORS
        .iter()
        .filter_map(|extract| extract(err))
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

fn error_field(err: &ApiError) -> Option<String> {
    body_field(err, "error")
}

fn detail_field(err: &ApiError) -> Option<String> {
    body_field(err, "detail")
}

fn message_field(err: &ApiError) -> Option<String> {
    body_field(err, "message")
}

fn stringified_body(err: &ApiError) -> Option<String> {
    err.body().and_then(render_value)
}

fn status_text(err: &ApiError) -> Option<String> {
    err.status_text().map(str::to_string)
}

fn raw_message(err: &ApiError) -> Option<String> {
    Some(err.to_string())
}

fn body_field(err: &ApiError, name: &str) -> Option<String> {
    err.body()?.get(name).and_then(render_value)
}

/// Strings verbatim, string lists joined, anything else as compact JSON.
/// `null`, blank strings and empty containers count as nothing.
fn render_value(value: &Value) -> Option<String> {
    let rendered = match value {
        Value::Null => return None,
        Value::String(text) => text.trim().to_string(),
        Value::Array(items) if items.iter().all(Value::is_string) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(map) if map.is_empty() => return None,
        other => other.to_string(),
    };

    (!rendered.is_empty()).then_some(rendered)
}
