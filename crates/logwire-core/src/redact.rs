// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redaction of sensitive values before entries leave the process.
//!
//! Two passes: structured data is scrubbed by key (case-insensitive substring
//! match against a sensitive-key list), and free-form messages are scrubbed
//! by pattern (JWTs, bearer tokens, `key=value` credential pairs).

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Replacement written over redacted values.
pub const REDACTED: &str = "[REDACTED]";

/// Keys treated as sensitive when no custom list is configured.
pub const DEFAULT_SENSITIVE_KEYS: [&str; 11] = [
	"password",
	"token",
	"secret",
	"apiKey",
	"api_key",
	"authorization",
	"cookie",
	"session",
	"credit_card",
	"cvv",
	"ssn",
];

static JWT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"eyJ[A-Za-z0-9_-]+\.eyJ[A-Za-z0-9_-]+\.[A-Za-z0-9._+/=-]*")
		.unwrap_or_else(|e| panic!("invalid JWT pattern: {e}"))
});

static BEARER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"(?i)Bearer\s+[A-Za-z0-9_.-]+")
		.unwrap_or_else(|e| panic!("invalid bearer pattern: {e}"))
});

static KEY_VALUE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"(?i)(password|secret|token|apikey|api_key)\s*[=:]\s*["']?[^"'\s,}]+["']?"#)
		.unwrap_or_else(|e| panic!("invalid key-value pattern: {e}"))
});

/// Returns a copy of `data` with sensitive values replaced by [`REDACTED`].
///
/// A key is sensitive when its lowercase form contains any lowercase entry of
/// `sensitive_keys`. Nested objects are scrubbed recursively, as are objects
/// directly inside arrays; scalars and deeper array nesting pass through
/// unchanged.
pub fn redact_map(data: &Map<String, Value>, sensitive_keys: &[String]) -> Map<String, Value> {
	let keys_lower: Vec<String> = sensitive_keys.iter().map(|k| k.to_lowercase()).collect();
	redact_object(data, &keys_lower)
}

fn redact_object(map: &Map<String, Value>, keys_lower: &[String]) -> Map<String, Value> {
	let mut result = Map::with_capacity(map.len());
	for (key, value) in map {
		let key_lower = key.to_lowercase();
		if keys_lower.iter().any(|sk| key_lower.contains(sk.as_str())) {
			result.insert(key.clone(), Value::String(REDACTED.to_string()));
		} else {
			result.insert(key.clone(), redact_value(value, keys_lower));
		}
	}
	result
}

fn redact_value(value: &Value, keys_lower: &[String]) -> Value {
	match value {
		Value::Object(map) => Value::Object(redact_object(map, keys_lower)),
		Value::Array(items) => Value::Array(
			items
				.iter()
				.map(|item| match item {
					Value::Object(map) => Value::Object(redact_object(map, keys_lower)),
					other => other.clone(),
				})
				.collect(),
		),
		other => other.clone(),
	}
}

/// Scrubs token-shaped substrings out of a free-form message.
pub fn redact_message(message: &str) -> String {
	let message = JWT_PATTERN.replace_all(message, "[JWT_TOKEN]");
	let message = BEARER_PATTERN.replace_all(&message, "Bearer [TOKEN]");
	KEY_VALUE_PATTERN
		.replace_all(&message, "${1}=[REDACTED]")
		.into_owned()
}
