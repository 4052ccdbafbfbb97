// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the Logwire log collection system.
//!
//! This crate provides the shared vocabulary of the logging SDK: entries,
//! severity levels, categories, the collector's category schema, and the
//! redaction pass that scrubs sensitive material before entries leave the
//! process. It contains no I/O and no runtime dependencies; the transport
//! lives in the `logwire` SDK crate.
//!
//! # Overview
//!
//! - Six severity levels with a total order used for minimum-level filtering
//! - A fixed base category set plus project-defined extra categories
//! - Log entries with optional HTTP and error context, camelCase on the wire
//! - Key-based redaction for structured data and pattern-based redaction for
//!   messages (JWTs, bearer tokens, credential pairs)
//! - An API key newtype that never prints its key material

pub mod api_key;
pub mod category;
pub mod entry;
pub mod error;
pub mod level;
pub mod redact;
pub mod schema;

pub use api_key::ApiKey;
pub use category::{CategoryLookup, LogCategory, BASE_CATEGORIES};
pub use entry::{Environment, ErrorInfo, LogEntry, LogSource};
pub use error::{CoreError, Result};
pub use level::LogLevel;
pub use redact::{redact_map, redact_message, DEFAULT_SENSITIVE_KEYS, REDACTED};
pub use schema::{CategorySchema, LogSchema};
