// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Console echo for development: one compact colored line per entry, with a
//! trailing data line when the entry carries structured fields.

use chrono::Local;
use serde_json::Value;

use logwire_core::{LogEntry, LogLevel, LogSchema};

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const DEFAULT_CATEGORY_COLOR: &str = "\x1b[37m";

/// Values longer than this are truncated on the data line.
const MAX_VALUE_LEN: usize = 60;

fn level_color(level: LogLevel) -> &'static str {
	match level {
		LogLevel::Dev => "\x1b[35m",
		LogLevel::Log => "\x1b[90m",
		LogLevel::Info => "\x1b[36m",
		LogLevel::Warn => "\x1b[33m",
		LogLevel::Error => "\x1b[31m",
		LogLevel::Fatal => "\x1b[35m",
	}
}

/// Renders an entry to the lines the console echo prints. The category label
/// uses the schema's display name and color when a schema is cached.
pub(crate) fn format_entry(entry: &LogEntry, schema: Option<&LogSchema>) -> Vec<String> {
	let timestamp = entry
		.timestamp
		.with_timezone(&Local)
		.format("%H:%M:%S%.3f");
	let level_label = format!("{:<5}", entry.level.as_str().to_uppercase());

	let category_key = entry.category.as_str();
	let definition = schema.and_then(|s| s.category(category_key));
	let category_name = definition.map_or(category_key, |d| d.name.as_str());
	let category_color = definition
		.map(|d| d.ansi_color.as_str())
		.filter(|c| !c.is_empty())
		.unwrap_or(DEFAULT_CATEGORY_COLOR);
	let category_label = format!("{:<20}", format!("{category_name}({category_key})"));

	let mut lines = vec![format!(
		"{DIM}{timestamp}{RESET} {}{level_label}{RESET} {category_color}{BOLD}{category_label}{RESET} {}",
		level_color(entry.level),
		entry.message
	)];

	if let Some(data) = &entry.data {
		let fields: Vec<String> = data
			.iter()
			.filter(|(_, value)| !matches!(value, Value::Null))
			.map(|(key, value)| {
				let rendered = match value {
					Value::String(s) => s.clone(),
					other => other.to_string(),
				};
				let rendered = if rendered.len() > MAX_VALUE_LEN {
					let cut: String = rendered.chars().take(MAX_VALUE_LEN - 3).collect();
					format!("{cut}...")
				} else {
					rendered
				};
				format!("{DIM}{key}{RESET}={rendered}")
			})
			.collect();
		if !fields.is_empty() {
			lines.push(format!(
				"    {DIM}\u{2514}\u{2500}{RESET} {}",
				fields.join(&format!(" {DIM}\u{2502}{RESET} "))
			));
		}
	}

	lines
}

/// Prints an entry to stderr.
pub(crate) fn print_entry(entry: &LogEntry, schema: Option<&LogSchema>) {
	for line in format_entry(entry, schema) {
		eprintln!("{line}");
	}
}
