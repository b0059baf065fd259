//! Recursive sanitization of JSON request bodies.
//!
//! Every string anywhere in the decoded body is cleaned before validation:
//! angle brackets go away, `javascript:` URI prefixes and `on<word>=`
//! event-handler patterns are stripped case-insensitively, and the result is
//! trimmed. Non-string scalars pass through untouched. The functions are pure
//! and never fail — anything that is not a string is simply not a string.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static JS_URI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript:").expect("javascript-uri pattern is valid"));

static EVENT_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    // on<word>= with optional spaces around the equals sign
    Regex::new(r"(?i)\bon\w+\s*=").expect("event-attribute pattern is valid")
});

/// Clean a single string.
pub fn clean_string(input: &str) -> String {
    let without_brackets: String = input.chars().filter(|c| *c != '<' && *c != '>').collect();
    let without_js = JS_URI.replace_all(&without_brackets, "");
    let without_events = EVENT_ATTR.replace_all(&without_js, "");
    without_events.trim().to_string()
}

/// Recursively sanitize a JSON value, preserving its shape.
pub fn sanitize_value(value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(clean_string(&s)),
        Value::Array(items) => Value::Array(items.into_iter().map(sanitize_value).collect()),
        Value::Object(map) => {
            Value::Object(map.into_iter().map(|(k, v)| (k, sanitize_value(v))).collect())
        }
        other => other,
    }
}
