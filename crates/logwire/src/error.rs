// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the Logwire SDK.
//!
//! Nothing in the logging path itself returns these to callers; delivery and
//! connectivity failures are absorbed by the transport and reported through
//! `tracing`. Errors surface only from explicit calls: building a client,
//! awaiting `flush`/`shutdown`, fetching the schema, or touching the global
//! client before `init`.

use thiserror::Error;

/// Logwire SDK errors.
#[derive(Debug, Error)]
pub enum LogwireError {
	/// Endpoint is missing or not a usable base URL.
	#[error("invalid endpoint: {0}")]
	InvalidEndpoint(String),

	/// Batch size must be at least 1.
	#[error("invalid batch size: must be at least 1")]
	InvalidBatchSize,

	/// HTTP request failed.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Server returned an error response.
	#[error("server error ({status}): {message}")]
	ServerError { status: u16, message: String },

	/// Client has been shut down.
	#[error("client has been shut down")]
	ClientShutdown,

	/// Client runs without an API key and performs no network calls.
	#[error("client is in offline mode")]
	Offline,

	/// The global client was used before `init`.
	#[error("logwire is not initialized; call init() first")]
	NotInitialized,
}

/// Result type alias for SDK operations.
pub type Result<T> = std::result::Result<T, LogwireError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_server_error_message_includes_status() {
		let err = LogwireError::ServerError {
			status: 503,
			message: "unavailable".to_string(),
		};
		assert_eq!(err.to_string(), "server error (503): unavailable");
	}

	#[test]
	fn test_invalid_endpoint_names_value() {
		let err = LogwireError::InvalidEndpoint("".to_string());
		assert!(err.to_string().starts_with("invalid endpoint"));
	}

	#[test]
	fn test_not_initialized_points_at_init() {
		assert!(LogwireError::NotInitialized.to_string().contains("init()"));
	}
}
