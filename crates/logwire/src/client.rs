// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Client construction and the logging API surface.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock, RwLock};
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};
use uuid::Uuid;

use logwire_core::{
	redact_map, redact_message, ApiKey, CategoryLookup, Environment, ErrorInfo, LogCategory,
	LogEntry, LogLevel, LogSchema, LogSource, DEFAULT_SENSITIVE_KEYS,
};

use crate::config::{self, Config};
use crate::console;
use crate::context;
use crate::error::{LogwireError, Result};
use crate::sender::HttpSender;
use crate::transport::{self, TransportConfig, TransportHandle};

/// Builder for constructing a [`LogwireClient`].
pub struct LogwireClientBuilder {
	api_key: Option<String>,
	endpoint: Option<String>,
	project_slug: Option<String>,
	environment: Option<Environment>,
	source: LogSource,
	batch_size: usize,
	batch_timeout: Duration,
	request_timeout: Duration,
	debug: Option<bool>,
	console_echo: bool,
	min_level: Option<LogLevel>,
	sensitive_keys: Option<Vec<String>>,
	prefix_map: Vec<(String, LogCategory)>,
	extra_categories: Vec<String>,
}

impl LogwireClientBuilder {
	/// Creates a new builder with default settings.
	pub fn new() -> Self {
		Self {
			api_key: None,
			endpoint: None,
			project_slug: None,
			environment: None,
			source: LogSource::Server,
			batch_size: config::DEFAULT_BATCH_SIZE,
			batch_timeout: config::DEFAULT_BATCH_TIMEOUT,
			request_timeout: config::DEFAULT_REQUEST_TIMEOUT,
			debug: None,
			console_echo: true,
			min_level: None,
			sensitive_keys: None,
			prefix_map: Vec::new(),
			extra_categories: Vec::new(),
		}
	}

	/// Sets the project API key.
	///
	/// Without one (here or in `LOGWIRE_API_KEY`) the client runs in offline
	/// mode: entries still echo to the console in debug mode, but nothing is
	/// queued and no network call is ever made.
	pub fn api_key(mut self, key: impl Into<String>) -> Self {
		self.api_key = Some(key.into());
		self
	}

	/// Sets the collector base URL.
	///
	/// Example: `https://logs.example.com`
	pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
		self.endpoint = Some(endpoint.into());
		self
	}

	/// Sets the project slug entries are recorded under.
	pub fn project_slug(mut self, slug: impl Into<String>) -> Self {
		self.project_slug = Some(slug.into());
		self
	}

	/// Sets the deployment environment.
	pub fn environment(mut self, environment: Environment) -> Self {
		self.environment = Some(environment);
		self
	}

	/// Sets the source reported with every entry. Defaults to `server`.
	pub fn source(mut self, source: LogSource) -> Self {
		self.source = source;
		self
	}

	/// Sets how many queued entries trigger an immediate flush.
	pub fn batch_size(mut self, size: usize) -> Self {
		self.batch_size = size;
		self
	}

	/// Sets how long a partial batch may wait before it is flushed.
	pub fn batch_timeout(mut self, timeout: Duration) -> Self {
		self.batch_timeout = timeout;
		self
	}

	/// Sets the HTTP timeout for collection requests.
	pub fn request_timeout(mut self, timeout: Duration) -> Self {
		self.request_timeout = timeout;
		self
	}

	/// Forces debug mode on or off. Defaults to on in development.
	pub fn debug(mut self, debug: bool) -> Self {
		self.debug = Some(debug);
		self
	}

	/// Enables or disables the pretty console echo in debug mode.
	pub fn console_echo(mut self, echo: bool) -> Self {
		self.console_echo = echo;
		self
	}

	/// Sets the minimum level that is recorded at all.
	///
	/// Defaults to `log` in development and `info` elsewhere.
	pub fn min_level(mut self, level: LogLevel) -> Self {
		self.min_level = Some(level);
		self
	}

	/// Replaces the default sensitive-key list used for redaction.
	pub fn sensitive_keys<I, S>(mut self, keys: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.sensitive_keys = Some(keys.into_iter().map(Into::into).collect());
		self
	}

	/// Maps a tracing target prefix to a category for the capture layer.
	///
	/// User-supplied prefixes override the built-in mapping for the same
	/// prefix.
	pub fn map_prefix(mut self, prefix: impl Into<String>, category: LogCategory) -> Self {
		self.prefix_map.push((prefix.into(), category));
		self
	}

	/// Declares a project-defined category name as known, so that
	/// [`LogwireClient::category`] resolves it without a schema fetch.
	pub fn extra_category(mut self, name: impl Into<String>) -> Self {
		self.extra_categories.push(name.into());
		self
	}

	/// Builds the client and starts its delivery pipeline.
	///
	/// Unless the client ends up in offline mode this must be called from
	/// within a Tokio runtime, because delivery runs as a background task.
	pub fn build(self) -> Result<LogwireClient> {
		if self.batch_size == 0 {
			return Err(LogwireError::InvalidBatchSize);
		}

		let api_key = self
			.api_key
			.or_else(|| config::env_string(config::ENV_API_KEY))
			.filter(|key| !key.trim().is_empty())
			.map(ApiKey::new);
		let endpoint_raw = self
			.endpoint
			.or_else(|| config::env_string(config::ENV_ENDPOINT))
			.unwrap_or_else(|| config::DEFAULT_ENDPOINT.to_string());
		let endpoint = config::normalize_endpoint(&endpoint_raw)?;
		let project_slug = self
			.project_slug
			.or_else(|| config::env_string(config::ENV_PROJECT_SLUG))
			.unwrap_or_else(|| "unknown".to_string());
		let environment = self
			.environment
			.or_else(|| config::env_string(config::ENV_ENVIRONMENT).and_then(|v| v.parse().ok()))
			.unwrap_or(Environment::Development);
		let debug = self.debug.unwrap_or(environment.is_development());
		let min_level = self.min_level.unwrap_or(if environment.is_development() {
			LogLevel::Log
		} else {
			LogLevel::Info
		});
		let sensitive_keys = self.sensitive_keys.unwrap_or_else(|| {
			DEFAULT_SENSITIVE_KEYS.iter().map(|key| key.to_string()).collect()
		});

		// User-supplied prefixes override the defaults for the same prefix.
		let mut prefix_map = config::default_prefix_map();
		for (prefix, category) in self.prefix_map {
			match prefix_map.iter_mut().find(|(existing, _)| *existing == prefix) {
				Some(slot) => slot.1 = category,
				None => prefix_map.push((prefix, category)),
			}
		}

		let config = Config {
			endpoint,
			api_key,
			project_slug,
			environment,
			source: self.source,
			batch_size: self.batch_size,
			batch_timeout: self.batch_timeout,
			request_timeout: self.request_timeout,
			debug,
			console_echo: self.console_echo,
			min_level,
			sensitive_keys,
			prefix_map,
			extra_categories: self.extra_categories,
		};

		let (sender, transport) = match config.api_key.clone() {
			Some(key) => {
				let sender = Arc::new(HttpSender::new(&config, key)?);
				let transport_config =
					TransportConfig::new(config.batch_size, config.batch_timeout);
				let handle = transport::spawn(transport_config, sender.clone());
				(Some(sender), Some(handle))
			}
			None => (None, None),
		};

		if config.offline_mode() {
			info!(
				project_slug = %config.project_slug,
				environment = %config.environment,
				"logwire initialized in offline mode (no API key)"
			);
		} else {
			info!(
				endpoint = %config.endpoint,
				project_slug = %config.project_slug,
				environment = %config.environment,
				"logwire initialized"
			);
		}

		let extra_categories = config.extra_categories.iter().cloned().collect();
		Ok(LogwireClient {
			inner: Arc::new(ClientInner {
				config,
				sender,
				transport,
				schema: RwLock::new(None),
				extra_categories: RwLock::new(extra_categories),
				warned_unknown: Mutex::new(HashSet::new()),
			}),
		})
	}
}

impl Default for LogwireClientBuilder {
	fn default() -> Self {
		Self::new()
	}
}

/// Shared state behind a cheaply cloneable client handle.
#[derive(Debug)]
struct ClientInner {
	config: Config,
	sender: Option<Arc<HttpSender>>,
	transport: Option<TransportHandle>,
	/// Cached category schema, lazily fetched; used for console formatting
	/// and for extending the known category set.
	schema: RwLock<Option<LogSchema>>,
	/// Project category names accepted in addition to the base set.
	extra_categories: RwLock<HashSet<String>>,
	/// Unknown category names already warned about, one warning per name.
	warned_unknown: Mutex<HashSet<String>>,
}

/// Handle to one logging pipeline. Clones share the same queue, transport
/// and configuration.
#[derive(Clone, Debug)]
pub struct LogwireClient {
	inner: Arc<ClientInner>,
}

impl LogwireClient {
	/// Creates a builder for configuring a client.
	pub fn builder() -> LogwireClientBuilder {
		LogwireClientBuilder::new()
	}

	pub(crate) fn config(&self) -> &Config {
		&self.inner.config
	}

	/// Logs at `dev` level under the `custom` category.
	pub fn dev(&self, message: &str, data: Option<Map<String, Value>>) {
		self.log_at(LogLevel::Dev, LogCategory::Custom, message, data, None);
	}

	/// Logs at `log` level under the `custom` category.
	pub fn log(&self, message: &str, data: Option<Map<String, Value>>) {
		self.log_at(LogLevel::Log, LogCategory::Custom, message, data, None);
	}

	/// Logs at `info` level under the `custom` category.
	pub fn info(&self, message: &str, data: Option<Map<String, Value>>) {
		self.log_at(LogLevel::Info, LogCategory::Custom, message, data, None);
	}

	/// Logs at `warn` level under the `custom` category.
	pub fn warn(&self, message: &str, data: Option<Map<String, Value>>) {
		self.log_at(LogLevel::Warn, LogCategory::Custom, message, data, None);
	}

	/// Logs at `error` level under the `custom` category.
	pub fn error(&self, message: &str, data: Option<Map<String, Value>>) {
		self.log_at(LogLevel::Error, LogCategory::Custom, message, data, None);
	}

	/// Logs at `fatal` level under the `custom` category.
	pub fn fatal(&self, message: &str, data: Option<Map<String, Value>>) {
		self.log_at(LogLevel::Fatal, LogCategory::Custom, message, data, None);
	}

	/// Logger for the `auth` category.
	pub fn auth(&self) -> CategoryLogger {
		self.category_logger(LogCategory::Auth)
	}

	/// Logger for the `db` category.
	pub fn db(&self) -> CategoryLogger {
		self.category_logger(LogCategory::Db)
	}

	/// Request/response logger for the `api` category.
	pub fn api(&self) -> ApiLogger {
		ApiLogger {
			client: self.clone(),
		}
	}

	/// Event logger for the `security` category.
	pub fn security(&self) -> SecurityLogger {
		SecurityLogger {
			client: self.clone(),
		}
	}

	/// Start/step/end logger for the `flow` category.
	pub fn flow(&self) -> FlowLogger {
		FlowLogger {
			client: self.clone(),
		}
	}

	/// Returns a logger for an arbitrary category name.
	///
	/// Known names are the built-in categories plus the project's extra
	/// categories, whether configured or learned from the schema. Unknown
	/// names fall back to `custom`, keep the requested name in the entry
	/// data, and warn once per name.
	pub fn category(&self, name: &str) -> CategoryLogger {
		let lookup = match self.inner.extra_categories.read() {
			Ok(extras) => LogCategory::resolve(name, extras.iter().map(String::as_str)),
			Err(_) => LogCategory::resolve(name, []),
		};
		match lookup {
			CategoryLookup::Known(category) => CategoryLogger {
				client: self.clone(),
				category,
				requested: None,
			},
			CategoryLookup::Unknown(requested) => {
				self.warn_unknown_category(&requested);
				CategoryLogger {
					client: self.clone(),
					category: LogCategory::Custom,
					requested: Some(requested),
				}
			}
		}
	}

	fn category_logger(&self, category: LogCategory) -> CategoryLogger {
		CategoryLogger {
			client: self.clone(),
			category,
			requested: None,
		}
	}

	fn warn_unknown_category(&self, name: &str) {
		let mut warned = match self.inner.warned_unknown.lock() {
			Ok(guard) => guard,
			Err(_) => return,
		};
		if warned.insert(name.to_string()) {
			warn!(
				category = %name,
				"unknown log category, entries will be recorded under \"custom\""
			);
		}
	}

	/// Returns the project's category schema, fetching it on first use.
	pub async fn fetch_schema(&self) -> Result<LogSchema> {
		if let Ok(cached) = self.inner.schema.read() {
			if let Some(schema) = cached.as_ref() {
				return Ok(schema.clone());
			}
		}
		self.refresh_schema().await
	}

	/// Fetches the schema again and extends the known category set with any
	/// newly defined project categories.
	pub async fn refresh_schema(&self) -> Result<LogSchema> {
		let sender = self.inner.sender.as_ref().ok_or(LogwireError::Offline)?;
		let schema = sender.fetch_schema().await?;
		if let Ok(mut extras) = self.inner.extra_categories.write() {
			for key in schema.extra_keys() {
				extras.insert(key.to_string());
			}
		}
		debug!(categories = schema.categories.len(), "log schema loaded");
		if let Ok(mut cached) = self.inner.schema.write() {
			*cached = Some(schema.clone());
		}
		Ok(schema)
	}

	/// Drains the queue now instead of waiting for the batch timeout.
	pub async fn flush(&self) -> Result<()> {
		match &self.inner.transport {
			Some(transport) => transport.flush().await,
			None => Ok(()),
		}
	}

	/// Flushes what it can and stops the delivery task.
	///
	/// Safe to call more than once; log calls made afterwards are dropped
	/// silently (the console echo still works).
	pub async fn shutdown(&self) -> Result<()> {
		match &self.inner.transport {
			Some(transport) => transport.shutdown().await,
			None => Ok(()),
		}
	}

	/// Clears offline mode entered after repeated delivery failures. Queued
	/// entries are kept and delivery resumes with the next enqueue.
	pub fn reset_offline_mode(&self) {
		if let Some(transport) = &self.inner.transport {
			transport.reset_offline_mode();
		}
	}

	/// True when the client has no API key or the transport gave up after
	/// repeated failures.
	pub fn is_offline(&self) -> bool {
		match &self.inner.transport {
			Some(transport) => transport.status().is_offline(),
			None => true,
		}
	}

	/// Entries currently waiting for delivery.
	pub fn queued(&self) -> usize {
		match &self.inner.transport {
			Some(transport) => transport.status().queued(),
			None => 0,
		}
	}

	/// Installs a process-wide panic hook that reports the panic as a fatal
	/// entry before the process dies.
	pub fn install_panic_hook(&self) {
		crate::panic_hook::install(self.clone());
	}

	/// Spawns a task that shuts the client down when the process receives
	/// an interrupt or termination signal.
	pub fn install_signal_handlers(&self) {
		crate::signals::install(self.clone());
	}

	pub(crate) fn log_at(
		&self,
		level: LogLevel,
		category: LogCategory,
		message: &str,
		data: Option<Map<String, Value>>,
		error: Option<ErrorInfo>,
	) {
		if level < self.inner.config.min_level {
			return;
		}
		let entry = self.build_entry(level, category, message, data, error);
		self.dispatch(entry);
	}

	fn log_api(
		&self,
		level: LogLevel,
		message: &str,
		data: Option<Map<String, Value>>,
		method: &str,
		url: &str,
		status: Option<u16>,
		duration_ms: Option<u64>,
	) {
		if level < self.inner.config.min_level {
			return;
		}
		let mut entry = self.build_entry(level, LogCategory::Api, message, data, None);
		entry.request_method = Some(method.to_string());
		entry.request_url = Some(url.to_string());
		entry.request_status = status;
		entry.request_duration_ms = duration_ms;
		self.dispatch(entry);
	}

	/// Builds a redacted entry stamped with the ambient request id.
	fn build_entry(
		&self,
		level: LogLevel,
		category: LogCategory,
		message: &str,
		data: Option<Map<String, Value>>,
		error: Option<ErrorInfo>,
	) -> LogEntry {
		let config = &self.inner.config;
		let mut entry = LogEntry::new(
			level,
			category,
			config.source,
			redact_message(message),
			config.project_slug.as_str(),
			config.environment,
		);
		entry.data = data.map(|data| redact_map(&data, &config.sensitive_keys));
		entry.request_id = context::current_request_id();
		entry.error = error;
		entry
	}

	fn dispatch(&self, entry: LogEntry) {
		let config = &self.inner.config;
		if config.debug && config.console_echo {
			match self.inner.schema.read() {
				Ok(schema) => console::print_entry(&entry, schema.as_ref()),
				Err(_) => console::print_entry(&entry, None),
			}
		}
		if let Some(transport) = &self.inner.transport {
			transport.enqueue(entry);
		}
	}
}

/// Logger bound to one category.
#[derive(Clone)]
pub struct CategoryLogger {
	client: LogwireClient,
	category: LogCategory,
	/// Requested name when it did not resolve; recorded in entry data.
	requested: Option<String>,
}

impl CategoryLogger {
	/// The category entries from this logger are recorded under.
	pub fn category(&self) -> &LogCategory {
		&self.category
	}

	/// Development-only diagnostics, stamped with the call site.
	#[track_caller]
	pub fn dev(&self, message: &str, data: Option<Map<String, Value>>) {
		let location = std::panic::Location::caller();
		let mut data = data.unwrap_or_default();
		data.insert("__dev".to_string(), Value::Bool(true));
		data.insert(
			"__file".to_string(),
			Value::String(format!("{}:{}", location.file(), location.line())),
		);
		self.emit(LogLevel::Dev, message, Some(data), None);
	}

	pub fn log(&self, message: &str, data: Option<Map<String, Value>>) {
		self.emit(LogLevel::Log, message, data, None);
	}

	pub fn info(&self, message: &str, data: Option<Map<String, Value>>) {
		self.emit(LogLevel::Info, message, data, None);
	}

	pub fn warn(&self, message: &str, data: Option<Map<String, Value>>) {
		self.emit(LogLevel::Warn, message, data, None);
	}

	pub fn error(&self, message: &str, data: Option<Map<String, Value>>) {
		self.emit(LogLevel::Error, message, data, None);
	}

	/// Error-level entry carrying a structured error chain.
	pub fn error_with<E: std::error::Error>(
		&self,
		message: &str,
		error: &E,
		data: Option<Map<String, Value>>,
	) {
		self.emit(LogLevel::Error, message, data, Some(ErrorInfo::from_error(error)));
	}

	pub fn fatal(&self, message: &str, data: Option<Map<String, Value>>) {
		self.emit(LogLevel::Fatal, message, data, None);
	}

	/// Fatal-level entry carrying a structured error chain.
	pub fn fatal_with<E: std::error::Error>(
		&self,
		message: &str,
		error: &E,
		data: Option<Map<String, Value>>,
	) {
		self.emit(LogLevel::Fatal, message, data, Some(ErrorInfo::from_error(error)));
	}

	fn emit(
		&self,
		level: LogLevel,
		message: &str,
		data: Option<Map<String, Value>>,
		error: Option<ErrorInfo>,
	) {
		let data = match &self.requested {
			Some(requested) => Some(merge_unknown_marker(data, requested)),
			None => data,
		};
		self.client.log_at(level, self.category.clone(), message, data, error);
	}
}

/// Request/response logging for the `api` category. Entries carry the
/// structured request fields in addition to the message.
#[derive(Clone)]
pub struct ApiLogger {
	client: LogwireClient,
}

impl ApiLogger {
	/// Logs the start of a request at `log` level.
	pub fn request(&self, method: &str, url: &str, data: Option<Map<String, Value>>) {
		let message = format!("{method} {url}");
		self.client
			.log_api(LogLevel::Log, &message, data, method, url, None, None);
	}

	/// Logs a completed request; the level follows the status class.
	pub fn response(
		&self,
		method: &str,
		url: &str,
		status: u16,
		duration_ms: u64,
		data: Option<Map<String, Value>>,
	) {
		let message = format!("{method} {url} -> {status}");
		self.client.log_api(
			response_level(status),
			&message,
			data,
			method,
			url,
			Some(status),
			Some(duration_ms),
		);
	}
}

/// Event logging for the `security` category.
#[derive(Clone)]
pub struct SecurityLogger {
	client: LogwireClient,
}

impl SecurityLogger {
	/// Records a security-relevant event; the level follows the outcome.
	pub fn event(&self, event_type: &str, status: SecurityStatus, data: Option<Map<String, Value>>) {
		let message = format!("{event_type} [{}]", status.label());
		self.client
			.log_at(status.level(), LogCategory::Security, &message, data, None);
	}
}

/// Outcome attached to a security event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityStatus {
	Success,
	Failure,
	Warning,
}

impl SecurityStatus {
	fn label(self) -> &'static str {
		match self {
			Self::Success => "SUCCESS",
			Self::Failure => "FAILURE",
			Self::Warning => "WARNING",
		}
	}

	fn level(self) -> LogLevel {
		match self {
			Self::Success => LogLevel::Info,
			Self::Failure => LogLevel::Error,
			Self::Warning => LogLevel::Warn,
		}
	}
}

/// Start/step/end logging for the `flow` category.
#[derive(Clone)]
pub struct FlowLogger {
	client: LogwireClient,
}

impl FlowLogger {
	/// Marks the start of a named multi-step flow and returns its id. The id
	/// is recorded in the entry data; pass it to later steps for correlation.
	pub fn start(&self, flow_name: &str, data: Option<Map<String, Value>>) -> String {
		let flow_id = Uuid::new_v4().to_string();
		let mut data = data.unwrap_or_default();
		data.insert("flowId".to_string(), Value::String(flow_id.clone()));
		let message = format!("START: {flow_name}");
		self.client
			.log_at(LogLevel::Info, LogCategory::Flow, &message, Some(data), None);
		flow_id
	}

	/// Records one step inside a flow.
	pub fn step(&self, step_name: &str, data: Option<Map<String, Value>>) {
		self.client
			.log_at(LogLevel::Log, LogCategory::Flow, step_name, data, None);
	}

	/// Marks the end of a flow with its outcome.
	pub fn end(&self, flow_name: &str, status: FlowStatus, duration_ms: Option<u64>) {
		let message = format!("END: {flow_name} [{}]", status.label());
		let data = duration_ms.map(|ms| {
			let mut data = Map::new();
			data.insert("durationMs".to_string(), Value::from(ms));
			data
		});
		self.client
			.log_at(status.level(), LogCategory::Flow, &message, data, None);
	}
}

/// Outcome of a completed flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStatus {
	Success,
	Failure,
}

impl FlowStatus {
	fn label(self) -> &'static str {
		match self {
			Self::Success => "SUCCESS",
			Self::Failure => "FAILURE",
		}
	}

	fn level(self) -> LogLevel {
		match self {
			Self::Success => LogLevel::Info,
			Self::Failure => LogLevel::Error,
		}
	}
}

/// Maps an HTTP status class to a level: 2xx info, 3xx warn, 4xx/5xx error.
fn response_level(status: u16) -> LogLevel {
	if status >= 400 {
		LogLevel::Error
	} else if status >= 300 {
		LogLevel::Warn
	} else {
		LogLevel::Info
	}
}

/// Records the requested name on entries that fell back to `custom`.
fn merge_unknown_marker(data: Option<Map<String, Value>>, requested: &str) -> Map<String, Value> {
	let mut data = data.unwrap_or_default();
	data.insert(
		"_unknownCategory".to_string(),
		Value::String(requested.to_string()),
	);
	data.insert(
		"_categoryWarning".to_string(),
		Value::String(format!(
			"category \"{requested}\" is not defined for this project"
		)),
	);
	data
}

static GLOBAL: OnceLock<LogwireClient> = OnceLock::new();

/// Initializes the global client from environment variables.
pub fn init() -> Result<LogwireClient> {
	init_with(LogwireClient::builder())
}

/// Initializes the global client from a builder.
///
/// A second call does not re-initialize: it warns and returns the existing
/// client unchanged.
pub fn init_with(builder: LogwireClientBuilder) -> Result<LogwireClient> {
	if let Some(existing) = GLOBAL.get() {
		warn!("logwire already initialized, keeping the existing client");
		return Ok(existing.clone());
	}
	let client = builder.build()?;
	match GLOBAL.set(client.clone()) {
		Ok(()) => Ok(client),
		// Lost a racing init; the first one wins.
		Err(_) => GLOBAL.get().cloned().ok_or(LogwireError::NotInitialized),
	}
}

/// The global client, if `init` has been called.
pub fn try_global() -> Option<&'static LogwireClient> {
	GLOBAL.get()
}

/// The global client, or an error before `init`.
pub fn global() -> Result<&'static LogwireClient> {
	GLOBAL.get().ok_or(LogwireError::NotInitialized)
}
