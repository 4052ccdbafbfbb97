// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing layer that captures events into the logging pipeline.
//!
//! Events keep flowing to whatever other layers are installed; this layer
//! only observes. The event target picks the category through the
//! configured prefix map, unmatched targets land in `console`. The SDK's own
//! diagnostics are skipped, feeding them back into the queue would loop.

use std::fmt;

use serde_json::{Map, Value};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use logwire_core::{LogCategory, LogLevel};

use crate::client::LogwireClient;

/// A tracing Layer that records every event as a log entry.
///
/// Field values are captured as structured data and the `message` field
/// becomes the entry message; both go through the client's usual redaction.
#[derive(Clone)]
pub struct LogwireLayer {
	client: LogwireClient,
}

impl LogwireLayer {
	/// Creates a layer feeding the given client.
	pub fn new(client: LogwireClient) -> Self {
		Self { client }
	}

	/// The client this layer feeds.
	pub fn client(&self) -> &LogwireClient {
		&self.client
	}

	/// Picks the category for an event target; the longest matching prefix
	/// wins.
	fn category_for_target(&self, target: &str) -> LogCategory {
		let mut best: Option<&(String, LogCategory)> = None;
		for mapping in &self.client.config().prefix_map {
			if !target.starts_with(mapping.0.as_str()) {
				continue;
			}
			match best {
				Some(current) if current.0.len() >= mapping.0.len() => {}
				_ => best = Some(mapping),
			}
		}
		match best {
			Some((_, category)) => category.clone(),
			None => LogCategory::Console,
		}
	}
}

impl<S> Layer<S> for LogwireLayer
where
	S: Subscriber + for<'a> LookupSpan<'a>,
{
	fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
		let metadata = event.metadata();
		let target = metadata.target();
		if internal_target(target) {
			return;
		}

		let mut visitor = FieldVisitor::new();
		event.record(&mut visitor);

		let message = visitor.message.unwrap_or_default();
		let data = if visitor.fields.is_empty() {
			None
		} else {
			Some(visitor.fields)
		};

		self.client.log_at(
			level_from_tracing(metadata.level()),
			self.category_for_target(target),
			&message,
			data,
			None,
		);
	}
}

/// Whether a target belongs to the SDK itself.
fn internal_target(target: &str) -> bool {
	target == "logwire"
		|| target.starts_with("logwire::")
		|| target == "logwire_core"
		|| target.starts_with("logwire_core::")
}

fn level_from_tracing(level: &tracing::Level) -> LogLevel {
	match *level {
		tracing::Level::TRACE => LogLevel::Dev,
		tracing::Level::DEBUG => LogLevel::Log,
		tracing::Level::INFO => LogLevel::Info,
		tracing::Level::WARN => LogLevel::Warn,
		tracing::Level::ERROR => LogLevel::Error,
	}
}

/// Splits an event into its message and remaining fields.
struct FieldVisitor {
	message: Option<String>,
	fields: Map<String, Value>,
}

impl FieldVisitor {
	fn new() -> Self {
		Self {
			message: None,
			fields: Map::new(),
		}
	}
}

impl Visit for FieldVisitor {
	fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
		let rendered = format!("{:?}", value);
		if field.name() == "message" {
			self.message = Some(rendered);
		} else {
			self.fields
				.insert(field.name().to_string(), Value::String(rendered));
		}
	}

	fn record_str(&mut self, field: &Field, value: &str) {
		if field.name() == "message" {
			self.message = Some(value.to_string());
		} else {
			self.fields
				.insert(field.name().to_string(), Value::String(value.to_string()));
		}
	}

	fn record_i64(&mut self, field: &Field, value: i64) {
		self.fields
			.insert(field.name().to_string(), Value::from(value));
	}

	fn record_u64(&mut self, field: &Field, value: u64) {
		self.fields
			.insert(field.name().to_string(), Value::from(value));
	}

	fn record_f64(&mut self, field: &Field, value: f64) {
		self.fields
			.insert(field.name().to_string(), Value::from(value));
	}

	fn record_bool(&mut self, field: &Field, value: bool) {
		self.fields
			.insert(field.name().to_string(), Value::Bool(value));
	}

	fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
		self.fields
			.insert(field.name().to_string(), Value::String(value.to_string()));
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::sync::{Arc, Mutex};

	use logwire_core::Environment;
	use tracing_subscriber::layer::SubscriberExt;

	fn offline_client() -> LogwireClient {
		std::env::remove_var(crate::config::ENV_API_KEY);
		LogwireClient::builder()
			.environment(Environment::Production)
			.map_prefix("my_app", LogCategory::Custom)
			.map_prefix("my_app::payments", LogCategory::Api)
			.build()
			.unwrap()
	}

	/// Captures what the visitor extracts from a real event.
	#[derive(Clone, Default)]
	struct Probe {
		seen: Arc<Mutex<Vec<(Option<String>, Map<String, Value>)>>>,
	}

	impl<S> Layer<S> for Probe
	where
		S: Subscriber + for<'a> LookupSpan<'a>,
	{
		fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
			let mut visitor = FieldVisitor::new();
			event.record(&mut visitor);
			self.seen
				.lock()
				.unwrap()
				.push((visitor.message, visitor.fields));
		}
	}

	#[test]
	fn visitor_splits_message_and_fields() {
		let probe = Probe::default();
		let subscriber = tracing_subscriber::registry().with(probe.clone());

		tracing::subscriber::with_default(subscriber, || {
			tracing::info!(user = "alice", count = 2u64, active = true, "hello world");
		});

		let seen = probe.seen.lock().unwrap();
		assert_eq!(seen.len(), 1);
		let (message, fields) = &seen[0];
		assert_eq!(message.as_deref(), Some("hello world"));
		assert_eq!(fields["user"], "alice");
		assert_eq!(fields["count"], 2);
		assert_eq!(fields["active"], true);
	}

	#[test]
	fn longest_prefix_wins() {
		let layer = LogwireLayer::new(offline_client());
		assert_eq!(
			layer.category_for_target("sqlx::query"),
			LogCategory::Db
		);
		assert_eq!(
			layer.category_for_target("my_app::payments::stripe"),
			LogCategory::Api
		);
		assert_eq!(
			layer.category_for_target("my_app::signup"),
			LogCategory::Custom
		);
		assert_eq!(
			layer.category_for_target("some_other_crate"),
			LogCategory::Console
		);
	}

	#[test]
	fn own_targets_are_skipped() {
		assert!(internal_target("logwire"));
		assert!(internal_target("logwire::transport"));
		assert!(internal_target("logwire_core::redact"));
		assert!(!internal_target("logwire_app::server"));
		assert!(!internal_target("my_app"));
	}

	#[test]
	fn tracing_levels_map_onto_log_levels() {
		assert_eq!(level_from_tracing(&tracing::Level::TRACE), LogLevel::Dev);
		assert_eq!(level_from_tracing(&tracing::Level::DEBUG), LogLevel::Log);
		assert_eq!(level_from_tracing(&tracing::Level::INFO), LogLevel::Info);
		assert_eq!(level_from_tracing(&tracing::Level::WARN), LogLevel::Warn);
		assert_eq!(level_from_tracing(&tracing::Level::ERROR), LogLevel::Error);
	}
}
