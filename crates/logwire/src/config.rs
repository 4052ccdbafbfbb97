// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Resolved SDK configuration.
//!
//! Values come from the builder first, then environment variables, then
//! defaults. A missing or empty API key puts the client in offline mode:
//! entries still echo to the console in debug, but nothing is queued and no
//! network call is ever made.

use std::time::Duration;

use logwire_core::{ApiKey, Environment, LogCategory, LogLevel, LogSource};

use crate::error::{LogwireError, Result};

pub const ENV_API_KEY: &str = "LOGWIRE_API_KEY";
pub const ENV_ENDPOINT: &str = "LOGWIRE_ENDPOINT";
pub const ENV_PROJECT_SLUG: &str = "LOGWIRE_PROJECT_SLUG";
pub const ENV_ENVIRONMENT: &str = "LOGWIRE_ENVIRONMENT";

pub const DEFAULT_ENDPOINT: &str = "http://localhost:3003";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_millis(5000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Path suffix of the collection endpoint; stripped during normalization so
/// every URL derives from one base.
pub(crate) const COLLECT_PATH: &str = "/api/logs/collect";

/// Immutable configuration snapshot held by the client.
#[derive(Debug, Clone)]
pub struct Config {
	/// Normalized base URL of the collector (no trailing slash, no
	/// collection path suffix).
	pub endpoint: String,
	/// Project API key; `None` means offline mode.
	pub api_key: Option<ApiKey>,
	pub project_slug: String,
	pub environment: Environment,
	pub source: LogSource,
	/// Entries per delivery batch; reaching this many queued entries
	/// triggers an immediate flush.
	pub batch_size: usize,
	/// How long a partial batch may wait before it is flushed.
	pub batch_timeout: Duration,
	/// Timeout for collection requests. Health probes use their own, shorter
	/// timeout.
	pub request_timeout: Duration,
	pub debug: bool,
	/// Echo entries to stderr in development.
	pub console_echo: bool,
	pub min_level: LogLevel,
	pub sensitive_keys: Vec<String>,
	/// Tracing-target prefix to category mapping used by the capture layer.
	pub prefix_map: Vec<(String, LogCategory)>,
	/// Project-defined category names accepted in addition to the base set.
	pub extra_categories: Vec<String>,
}

impl Config {
	/// Offline mode is derived, never set directly: no API key, no network.
	pub fn offline_mode(&self) -> bool {
		self.api_key.is_none()
	}
}

/// Reads an environment variable, treating empty values as unset.
pub(crate) fn env_string(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Normalizes an endpoint to the collector base URL.
///
/// Trailing slashes are stripped, and a full collection URL is accepted by
/// stripping its path suffix, so `https://x/` and
/// `https://x/api/logs/collect` both normalize to `https://x`.
pub(crate) fn normalize_endpoint(raw: &str) -> Result<String> {
	let trimmed = raw.trim().trim_end_matches('/');
	let base = trimmed.strip_suffix(COLLECT_PATH).unwrap_or(trimmed);
	let base = base.trim_end_matches('/');
	if base.is_empty() {
		return Err(LogwireError::InvalidEndpoint(raw.to_string()));
	}
	Ok(base.to_string())
}

/// Default mapping of tracing targets to categories for the capture layer.
/// Longest matching prefix wins; unmatched targets fall back to `Console`.
pub fn default_prefix_map() -> Vec<(String, LogCategory)> {
	[
		("sqlx", LogCategory::Db),
		("sea_orm", LogCategory::Db),
		("reqwest", LogCategory::Fetch),
		("hyper", LogCategory::Fetch),
		("axum", LogCategory::Api),
		("tower_http", LogCategory::Api),
	]
	.into_iter()
	.map(|(prefix, category)| (prefix.to_string(), category))
	.collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_trailing_slashes() {
		assert_eq!(
			normalize_endpoint("https://logs.example.com/").unwrap(),
			"https://logs.example.com"
		);
		assert_eq!(
			normalize_endpoint("https://logs.example.com///").unwrap(),
			"https://logs.example.com"
		);
	}

	#[test]
	fn strips_collection_path_suffix() {
		assert_eq!(
			normalize_endpoint("https://logs.example.com/api/logs/collect").unwrap(),
			"https://logs.example.com"
		);
		assert_eq!(
			normalize_endpoint("https://logs.example.com/api/logs/collect/").unwrap(),
			"https://logs.example.com"
		);
	}

	#[test]
	fn plain_base_is_unchanged() {
		assert_eq!(
			normalize_endpoint("http://localhost:3003").unwrap(),
			"http://localhost:3003"
		);
	}

	#[test]
	fn empty_endpoint_is_rejected() {
		assert!(normalize_endpoint("").is_err());
		assert!(normalize_endpoint("   /").is_err());
	}

	#[test]
	fn env_string_ignores_empty_values() {
		std::env::set_var("LOGWIRE_TEST_EMPTY_VAR", "  ");
		assert_eq!(env_string("LOGWIRE_TEST_EMPTY_VAR"), None);
		std::env::set_var("LOGWIRE_TEST_SET_VAR", "value");
		assert_eq!(env_string("LOGWIRE_TEST_SET_VAR"), Some("value".to_string()));
		std::env::remove_var("LOGWIRE_TEST_EMPTY_VAR");
		std::env::remove_var("LOGWIRE_TEST_SET_VAR");
	}

	#[test]
	fn default_prefix_map_targets_db_and_http_crates() {
		let map = default_prefix_map();
		assert!(map.iter().any(|(p, c)| p == "sqlx" && *c == LogCategory::Db));
		assert!(map.iter().any(|(p, c)| p == "hyper" && *c == LogCategory::Fetch));
	}
}
