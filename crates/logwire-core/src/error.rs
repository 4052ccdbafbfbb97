// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for log entry construction and parsing.

use thiserror::Error;

/// Errors that can occur while building or parsing log types.
#[derive(Debug, Error)]
pub enum CoreError {
	#[error("invalid log level: {0}")]
	InvalidLevel(String),

	#[error("invalid log source: {0}")]
	InvalidSource(String),

	#[error("invalid environment: {0}")]
	InvalidEnvironment(String),

	#[error("serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

/// Result type for core log operations.
pub type Result<T> = std::result::Result<T, CoreError>;
