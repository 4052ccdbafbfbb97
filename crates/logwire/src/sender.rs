// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wire protocol: batch collection, health probe, schema fetch.

use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

use logwire_core::{ApiKey, Environment, LogEntry, LogSchema};

use crate::config::{Config, COLLECT_PATH};
use crate::error::{LogwireError, Result};

/// Header carrying the project API key.
pub(crate) const API_KEY_HEADER: &str = "X-API-Key";

/// Health probes are short: a slow collector is treated as an unavailable
/// one.
pub(crate) const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of `POST /api/logs/collect`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CollectRequest<'a> {
	pub logs: &'a [LogEntry],
	pub project_slug: &'a str,
	pub environment: Environment,
}

/// The standard SDK User-Agent, `logwire/{version}`.
pub(crate) fn user_agent() -> String {
	format!("logwire/{}", env!("CARGO_PKG_VERSION"))
}

pub(crate) fn collect_url(base: &str) -> String {
	format!("{base}{COLLECT_PATH}")
}

pub(crate) fn health_url(base: &str) -> String {
	format!("{base}/api/health")
}

pub(crate) fn schema_url(base: &str, project_slug: &str) -> String {
	format!("{base}/api/log-schema/{project_slug}")
}

/// Delivery seam between the transport and the wire. The transport never
/// talks HTTP directly, which keeps its state machine testable with a
/// scripted sender.
#[async_trait]
pub trait LogSender: Send + Sync {
	/// Ships one batch. Any `Err` counts as a delivery failure; the batch is
	/// not retried.
	async fn send_batch(&self, batch: Vec<LogEntry>) -> Result<()>;

	/// One health probe. `true` means the collector answered 2xx in time.
	async fn check_health(&self) -> bool;
}

/// Production sender backed by reqwest.
#[derive(Debug)]
pub struct HttpSender {
	http_client: reqwest::Client,
	base_url: String,
	collect_url: String,
	health_url: String,
	api_key: ApiKey,
	project_slug: String,
	environment: Environment,
}

impl HttpSender {
	/// Builds the sender from a resolved configuration. Fails only if the
	/// underlying HTTP client cannot be constructed.
	pub fn new(config: &Config, api_key: ApiKey) -> Result<Self> {
		let http_client = reqwest::Client::builder()
			.user_agent(user_agent())
			.timeout(config.request_timeout)
			.build()?;
		Ok(Self {
			http_client,
			base_url: config.endpoint.clone(),
			collect_url: collect_url(&config.endpoint),
			health_url: health_url(&config.endpoint),
			api_key,
			project_slug: config.project_slug.clone(),
			environment: config.environment,
		})
	}

	/// Fetches the project's category schema.
	pub(crate) async fn fetch_schema(&self) -> Result<LogSchema> {
		let url = schema_url(&self.base_url, &self.project_slug);
		debug!(url = %url, "fetching log schema");
		let response = self
			.http_client
			.get(&url)
			.header(API_KEY_HEADER, self.api_key.as_str())
			.send()
			.await?;
		if !response.status().is_success() {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			return Err(LogwireError::ServerError { status, message });
		}
		Ok(response.json().await?)
	}
}

#[async_trait]
impl LogSender for HttpSender {
	async fn send_batch(&self, batch: Vec<LogEntry>) -> Result<()> {
		let body = CollectRequest {
			logs: &batch,
			project_slug: &self.project_slug,
			environment: self.environment,
		};
		debug!(url = %self.collect_url, count = batch.len(), "sending log batch");
		let response = self
			.http_client
			.post(&self.collect_url)
			.header(API_KEY_HEADER, self.api_key.as_str())
			.json(&body)
			.send()
			.await?;
		if !response.status().is_success() {
			let status = response.status().as_u16();
			let message = response.text().await.unwrap_or_default();
			return Err(LogwireError::ServerError { status, message });
		}
		Ok(())
	}

	async fn check_health(&self) -> bool {
		let result = self
			.http_client
			.get(&self.health_url)
			.timeout(HEALTH_TIMEOUT)
			.send()
			.await;
		match result {
			Ok(response) => response.status().is_success(),
			Err(error) => {
				debug!(error = %error, "health check failed");
				false
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use logwire_core::{LogCategory, LogLevel, LogSource};

	#[test]
	fn collect_body_uses_camel_case_and_logs_array() {
		let entry = LogEntry::new(
			LogLevel::Info,
			LogCategory::Api,
			LogSource::Server,
			"hello",
			"acme",
			Environment::Production,
		);
		let batch = vec![entry];
		let body = CollectRequest {
			logs: &batch,
			project_slug: "acme",
			environment: Environment::Production,
		};
		let value = serde_json::to_value(&body).unwrap();
		assert_eq!(value["projectSlug"], "acme");
		assert_eq!(value["environment"], "production");
		assert_eq!(value["logs"].as_array().unwrap().len(), 1);
		assert_eq!(value["logs"][0]["message"], "hello");
	}

	#[test]
	fn urls_derive_from_one_base() {
		let base = "https://logs.example.com";
		assert_eq!(collect_url(base), "https://logs.example.com/api/logs/collect");
		assert_eq!(health_url(base), "https://logs.example.com/api/health");
		assert_eq!(
			schema_url(base, "acme"),
			"https://logs.example.com/api/log-schema/acme"
		);
	}

	#[test]
	fn user_agent_has_version() {
		let ua = user_agent();
		assert!(ua.starts_with("logwire/"));
		assert!(ua.len() > "logwire/".len());
	}
}
