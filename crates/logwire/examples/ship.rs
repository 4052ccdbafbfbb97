// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Example: Ship a handful of log entries to a Logwire collector.
//!
//! Run with:
//!   cargo run --example ship -p logwire

use logwire::{Environment, FlowStatus, LogwireClient, SecurityStatus};
use serde_json::{Map, Value};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Configure from environment or use defaults for testing
	let api_key =
		std::env::var("LOGWIRE_API_KEY").expect("LOGWIRE_API_KEY environment variable required");
	let endpoint =
		std::env::var("LOGWIRE_ENDPOINT").unwrap_or_else(|_| "http://localhost:3001".to_string());
	let project_slug =
		std::env::var("LOGWIRE_PROJECT").unwrap_or_else(|_| "example".to_string());

	println!("Initializing logwire client...");
	println!("  Endpoint: {}", endpoint);
	println!("  Project: {}", project_slug);

	// Build the client
	let client = LogwireClient::builder()
		.api_key(&api_key)
		.endpoint(&endpoint)
		.project_slug(&project_slug)
		.environment(Environment::Development)
		.batch_size(10)
		.build()?;

	// Crashes and Ctrl-C still flush what is queued
	client.install_panic_hook();
	client.install_signal_handlers();

	// Plain entries on the default category
	client.info("application started", None);
	let mut data = Map::new();
	data.insert("version".to_string(), Value::String("0.1.0-example".to_string()));
	client.log("loaded configuration", Some(data));

	// Category loggers
	client.auth().info("user logged in", None);
	client.db().warn("slow query detected", None);

	// HTTP request/response pair
	client.api().request("GET", "/api/data", None);
	client.api().response("GET", "/api/data", 200, 42, None);

	// Security audit trail
	client
		.security()
		.event("login_attempt", SecurityStatus::Success, None);

	// A named flow with correlated steps
	let flow = client.flow();
	let flow_id = flow.start("checkout", None);
	println!("  Flow ID: {}", flow_id);
	flow.step("validate cart", None);
	flow.step("charge card", None);
	flow.end("checkout", FlowStatus::Success, Some(180));

	// Entries inside the scope carry the request id automatically
	logwire::with_request_id("req-example-1", async {
		client.info("inside request scope", None);
	})
	.await;

	// Push everything out now instead of waiting for the batch timer
	println!("\nFlushing...");
	client.flush().await?;

	println!("Queued after flush: {}", client.queued());
	println!("Offline: {}", client.is_offline());

	// Shutdown
	client.shutdown().await?;
	println!("\nClient shutdown complete.");

	Ok(())
}
