// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Panic hook that reports the panic as a fatal entry.
//!
//! The process is dying when the hook runs, so the normal queue would never
//! be drained; the report goes out as one synchronous, best-effort request
//! with a short timeout, then the previous hook runs.

use std::backtrace::Backtrace;
use std::panic::PanicHookInfo;
use std::time::Duration;

use serde_json::{Map, Value};

use logwire_core::{redact_message, ErrorInfo, LogCategory, LogEntry, LogLevel};

use crate::client::LogwireClient;
use crate::error::{LogwireError, Result};
use crate::sender::{collect_url, CollectRequest, API_KEY_HEADER};

/// Timeout for the one-shot panic report.
const PANIC_SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// Installs a hook that reports panics, then calls the previous hook.
pub(crate) fn install(client: LogwireClient) {
	let previous = std::panic::take_hook();
	std::panic::set_hook(Box::new(move |info| {
		report_panic(&client, info);
		previous(info);
	}));
}

/// Best-effort report; must never panic itself.
fn report_panic(client: &LogwireClient, info: &PanicHookInfo<'_>) {
	let backtrace = Backtrace::force_capture();
	let message = panic_message(info);

	let config = client.config();
	let mut entry = LogEntry::new(
		LogLevel::Fatal,
		LogCategory::Error,
		config.source,
		redact_message(&format!("panic: {message}")),
		config.project_slug.as_str(),
		config.environment,
	);
	entry.error = Some(ErrorInfo {
		name: "panic".to_string(),
		message: redact_message(&message),
		stack: Some(backtrace.to_string()),
	});
	if let Some(location) = info.location() {
		let mut data = Map::new();
		data.insert(
			"location".to_string(),
			Value::String(format!(
				"{}:{}:{}",
				location.file(),
				location.line(),
				location.column()
			)),
		);
		entry.data = Some(data);
	}

	if let Err(err) = send_sync(client, entry) {
		eprintln!("logwire: failed to report panic: {err}");
	}
}

/// One synchronous delivery attempt outside the normal queue.
fn send_sync(client: &LogwireClient, entry: LogEntry) -> Result<()> {
	let config = client.config();
	let api_key = config.api_key.as_ref().ok_or(LogwireError::Offline)?;

	let batch = [entry];
	let body = CollectRequest {
		logs: &batch,
		project_slug: &config.project_slug,
		environment: config.environment,
	};

	let http_client = reqwest::blocking::Client::builder()
		.timeout(PANIC_SEND_TIMEOUT)
		.build()?;
	let response = http_client
		.post(collect_url(&config.endpoint))
		.header(API_KEY_HEADER, api_key.as_str())
		.json(&body)
		.send()?;

	if !response.status().is_success() {
		let status = response.status().as_u16();
		let message = response.text().unwrap_or_default();
		return Err(LogwireError::ServerError { status, message });
	}
	Ok(())
}

fn panic_message(info: &PanicHookInfo<'_>) -> String {
	if let Some(s) = info.payload().downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = info.payload().downcast_ref::<String>() {
		s.clone()
	} else {
		"Box<dyn Any>".to_string()
	}
}
