// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log categories: a fixed base set plus project-defined extras.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category keys that exist for every project.
pub const BASE_CATEGORIES: [&str; 5] = ["auth", "api", "security", "db", "flow"];

/// Category of a log entry.
///
/// The base variants are built into every project. Integrations use
/// `Console`, `Fetch`, `Error` and `Middleware`. Projects can define further
/// categories at the collector; those arrive here as `Extra`. Entries whose
/// category name matches nothing fall back to `Custom` (see
/// [`LogCategory::resolve`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogCategory {
	Auth,
	Api,
	Security,
	Db,
	Flow,
	Middleware,
	Console,
	Fetch,
	Error,
	Custom,
	Extra(String),
}

impl LogCategory {
	pub fn as_str(&self) -> &str {
		match self {
			Self::Auth => "auth",
			Self::Api => "api",
			Self::Security => "security",
			Self::Db => "db",
			Self::Flow => "flow",
			Self::Middleware => "middleware",
			Self::Console => "console",
			Self::Fetch => "fetch",
			Self::Error => "error",
			Self::Custom => "custom",
			Self::Extra(name) => name,
		}
	}

	/// Whether this is one of the five categories every project has.
	pub fn is_base(&self) -> bool {
		BASE_CATEGORIES.contains(&self.as_str())
	}

	/// Resolves an arbitrary category name against the built-in set plus a
	/// project's extra category names.
	///
	/// Unknown names are not silently invented into categories; the caller
	/// decides how to degrade (the SDK logs them under `Custom` and keeps the
	/// requested name in the entry data).
	pub fn resolve<'a, I>(name: &str, extras: I) -> CategoryLookup
	where
		I: IntoIterator<Item = &'a str>,
	{
		match name {
			"auth" => return CategoryLookup::Known(Self::Auth),
			"api" => return CategoryLookup::Known(Self::Api),
			"security" => return CategoryLookup::Known(Self::Security),
			"db" => return CategoryLookup::Known(Self::Db),
			"flow" => return CategoryLookup::Known(Self::Flow),
			"middleware" => return CategoryLookup::Known(Self::Middleware),
			"console" => return CategoryLookup::Known(Self::Console),
			"fetch" => return CategoryLookup::Known(Self::Fetch),
			"error" => return CategoryLookup::Known(Self::Error),
			"custom" => return CategoryLookup::Known(Self::Custom),
			_ => {}
		}
		if extras.into_iter().any(|extra| extra == name) {
			CategoryLookup::Known(Self::Extra(name.to_string()))
		} else {
			CategoryLookup::Unknown(name.to_string())
		}
	}
}

impl fmt::Display for LogCategory {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl From<String> for LogCategory {
	fn from(s: String) -> Self {
		match s.as_str() {
			"auth" => Self::Auth,
			"api" => Self::Api,
			"security" => Self::Security,
			"db" => Self::Db,
			"flow" => Self::Flow,
			"middleware" => Self::Middleware,
			"console" => Self::Console,
			"fetch" => Self::Fetch,
			"error" => Self::Error,
			"custom" => Self::Custom,
			_ => Self::Extra(s),
		}
	}
}

impl From<LogCategory> for String {
	fn from(category: LogCategory) -> Self {
		category.as_str().to_string()
	}
}

/// Result of resolving a category name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryLookup {
	/// The name maps to a real category.
	Known(LogCategory),
	/// The name matches neither the base set nor the project's extras.
	Unknown(String),
}
