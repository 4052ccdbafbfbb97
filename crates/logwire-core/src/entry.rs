// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The log entry record shipped to the collector.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::category::LogCategory;
use crate::error::CoreError;
use crate::level::LogLevel;

/// Where an entry originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogSource {
	Server,
	Client,
}

impl fmt::Display for LogSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Server => f.write_str("server"),
			Self::Client => f.write_str("client"),
		}
	}
}

impl FromStr for LogSource {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"server" => Ok(Self::Server),
			"client" => Ok(Self::Client),
			_ => Err(CoreError::InvalidSource(s.to_string())),
		}
	}
}

/// Deployment environment an entry was produced in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
	Development,
	Staging,
	Production,
}

impl Environment {
	pub fn is_development(&self) -> bool {
		matches!(self, Self::Development)
	}
}

impl fmt::Display for Environment {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Development => f.write_str("development"),
			Self::Staging => f.write_str("staging"),
			Self::Production => f.write_str("production"),
		}
	}
}

impl FromStr for Environment {
	type Err = CoreError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"development" | "dev" => Ok(Self::Development),
			"staging" | "stage" => Ok(Self::Staging),
			"production" | "prod" => Ok(Self::Production),
			_ => Err(CoreError::InvalidEnvironment(s.to_string())),
		}
	}
}

/// Error context attached to `error`/`fatal` entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorInfo {
	pub name: String,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub stack: Option<String>,
}

impl ErrorInfo {
	/// Captures name, message and source chain from a concrete error value.
	pub fn from_error<E: std::error::Error>(error: &E) -> Self {
		let name = std::any::type_name::<E>()
			.rsplit("::")
			.next()
			.unwrap_or("Error")
			.to_string();
		let mut chain = Vec::new();
		let mut source = error.source();
		while let Some(cause) = source {
			chain.push(cause.to_string());
			source = cause.source();
		}
		Self {
			name,
			message: error.to_string(),
			stack: if chain.is_empty() {
				None
			} else {
				Some(chain.join("\ncaused by: "))
			},
		}
	}
}

/// A single log record. Immutable once created; `data` and `message` are
/// expected to be already redacted when the entry is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
	pub timestamp: DateTime<Utc>,
	pub level: LogLevel,
	pub category: LogCategory,
	pub source: LogSource,
	pub message: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub data: Option<Map<String, Value>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_id: Option<String>,
	pub project_slug: String,
	pub environment: Environment,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_url: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_method: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_status: Option<u16>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub request_duration_ms: Option<u64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<ErrorInfo>,
}

impl LogEntry {
	/// A minimal entry stamped with the current time; optional context starts
	/// empty.
	pub fn new(
		level: LogLevel,
		category: LogCategory,
		source: LogSource,
		message: impl Into<String>,
		project_slug: impl Into<String>,
		environment: Environment,
	) -> Self {
		Self {
			timestamp: Utc::now(),
			level,
			category,
			source,
			message: message.into(),
			data: None,
			request_id: None,
			project_slug: project_slug.into(),
			environment,
			request_url: None,
			request_method: None,
			request_status: None,
			request_duration_ms: None,
			error: None,
		}
	}
}
