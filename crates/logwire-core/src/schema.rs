// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Category schema served by the collector, used for console formatting and
//! for extending the known category set.

use serde::{Deserialize, Serialize};

/// One category definition from the collector.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySchema {
	pub key: String,
	pub name: String,
	pub name_en: String,
	pub icon: String,
	pub color: String,
	pub ansi_color: String,
	pub description: String,
	pub examples: Vec<String>,
	pub is_base: bool,
}

/// Per-project category schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogSchema {
	pub project_id: String,
	pub project_name: String,
	pub categories: Vec<CategorySchema>,
	pub version: String,
	pub generated_at: String,
}

impl LogSchema {
	/// Looks up a category definition by key.
	pub fn category(&self, key: &str) -> Option<&CategorySchema> {
		self.categories.iter().find(|c| c.key == key)
	}

	/// Keys of the non-base categories this project defines.
	pub fn extra_keys(&self) -> impl Iterator<Item = &str> {
		self.categories
			.iter()
			.filter(|c| !c.is_base)
			.map(|c| c.key.as_str())
	}
}
