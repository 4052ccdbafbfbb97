// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Logging SDK for the Logwire collector.
//!
//! This crate provides a client library for shipping structured application
//! logs to a Logwire collector. Entries are queued in memory, batched by
//! size and time, and delivered by a background task that degrades to
//! console-only output when the collector is unreachable.
//!
//! # Features
//!
//! - **Batched delivery**: entries flush when a batch fills or a timeout
//!   elapses, whichever comes first
//! - **Connectivity probing**: a bounded startup retry loop against the
//!   collector's health endpoint
//! - **Offline mode**: repeated delivery failures stop all network activity
//!   until an explicit reset; a missing API key means console-only operation
//! - **Redaction**: sensitive keys and message patterns are scrubbed before
//!   entries leave the process
//! - **Categories**: a fixed base set plus project-defined categories,
//!   validated against the collector's schema
//! - **Tracing capture**: a `tracing` layer that records events from the host
//!   application and its dependencies
//!
//! # Example
//!
//! ```ignore
//! use logwire::{Environment, FlowStatus, LogwireClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = LogwireClient::builder()
//!         .api_key("lw_xxx")
//!         .endpoint("https://logs.example.com")
//!         .project_slug("acme")
//!         .environment(Environment::Production)
//!         .build()?;
//!
//!     client.info("service started", None);
//!     client.auth().warn("token about to expire", None);
//!
//!     let flow = client.flow();
//!     flow.start("checkout", None);
//!     flow.step("cart validated", None);
//!     flow.end("checkout", FlowStatus::Success, Some(1200));
//!
//!     client.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod console;
mod context;
mod error;
mod layer;
mod panic_hook;
mod sender;
mod signals;
mod transport;

pub use client::{
	global, init, init_with, try_global, ApiLogger, CategoryLogger, FlowLogger, FlowStatus,
	LogwireClient, LogwireClientBuilder, SecurityLogger, SecurityStatus,
};
pub use context::{current_request_id, generate_request_id, with_request_id};
pub use error::{LogwireError, Result};
pub use layer::LogwireLayer;

// Re-export core types for convenience
pub use logwire_core::{
	ApiKey, CategoryLookup, CategorySchema, Environment, ErrorInfo, LogCategory, LogEntry,
	LogLevel, LogSchema, LogSource, BASE_CATEGORIES, DEFAULT_SENSITIVE_KEYS, REDACTED,
};
