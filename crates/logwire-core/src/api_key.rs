// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project API key newtype.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A project API key sent in the `X-API-Key` header.
///
/// `Debug` and `Display` never print the key material, so configuration
/// snapshots and diagnostics cannot leak it.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Debug for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("ApiKey([REDACTED])")
	}
}

impl fmt::Display for ApiKey {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("[REDACTED]")
	}
}

impl From<String> for ApiKey {
	fn from(key: String) -> Self {
		Self(key)
	}
}

impl From<&str> for ApiKey {
	fn from(key: &str) -> Self {
		Self(key.to_string())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn debug_never_prints_key_material() {
		let key = ApiKey::new("lw_live_abc123");
		assert_eq!(format!("{key:?}"), "ApiKey([REDACTED])");
		assert_eq!(key.to_string(), "[REDACTED]");
		assert_eq!(key.as_str(), "lw_live_abc123");
	}

	#[test]
	fn empty_key_is_detectable() {
		assert!(ApiKey::new("").is_empty());
		assert!(!ApiKey::new("k").is_empty());
	}
}
