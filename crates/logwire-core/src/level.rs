// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Log severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Severity of a log entry, ordered from least to most severe.
///
/// `Dev` is developer chatter that is normally filtered out of production;
/// `Fatal` marks an unrecoverable failure. The derived ordering is the
/// filtering order: an entry passes a minimum level when
/// `entry.level >= min_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
	Dev,
	Log,
	Info,
	Warn,
	Error,
	Fatal,
}

impl LogLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Dev => "dev",
			Self::Log => "log",
			Self::Info => "info",
			Self::Warn => "warn",
			Self::Error => "error",
			Self::Fatal => "fatal",
		}
	}
}

impl fmt::Display for LogLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LogLevel {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"dev" => Ok(Self::Dev),
			"log" => Ok(Self::Log),
			"info" => Ok(Self::Info),
			"warn" => Ok(Self::Warn),
			"error" => Ok(Self::Error),
			"fatal" => Ok(Self::Fatal),
			_ => Err(CoreError::InvalidLevel(s.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn levels_order_by_severity() {
		assert!(LogLevel::Dev < LogLevel::Log);
		assert!(LogLevel::Log < LogLevel::Info);
		assert!(LogLevel::Info < LogLevel::Warn);
		assert!(LogLevel::Warn < LogLevel::Error);
		assert!(LogLevel::Error < LogLevel::Fatal);
	}

	#[test]
	fn min_level_filter_comparison() {
		assert!(LogLevel::Warn >= LogLevel::Info);
		assert!(LogLevel::Dev < LogLevel::Info);
		assert!(LogLevel::Info >= LogLevel::Info);
	}

	#[test]
	fn serializes_lowercase() {
		let json = serde_json::to_string(&LogLevel::Fatal).unwrap();
		assert_eq!(json, "\"fatal\"");
		let back: LogLevel = serde_json::from_str("\"warn\"").unwrap();
		assert_eq!(back, LogLevel::Warn);
	}

	#[test]
	fn rejects_unknown_level() {
		assert!("verbose".parse::<LogLevel>().is_err());
	}

	proptest! {
		#[test]
		fn level_roundtrip(level in prop_oneof![
			Just(LogLevel::Dev),
			Just(LogLevel::Log),
			Just(LogLevel::Info),
			Just(LogLevel::Warn),
			Just(LogLevel::Error),
			Just(LogLevel::Fatal),
		]) {
			let s = level.to_string();
			let parsed: LogLevel = s.parse().unwrap();
			prop_assert_eq!(level, parsed);
		}
	}
}
