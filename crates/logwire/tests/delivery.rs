// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end delivery tests against a mock collector.

use std::time::Duration;

use logwire::{Environment, LogCategory, LogLevel, LogwireClient, LogwireClientBuilder};
use serde_json::{json, Map, Value};
use tokio::time::sleep;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const API_KEY: &str = "lw_test_key";
const COLLECT_PATH: &str = "/api/logs/collect";
const HEALTH_PATH: &str = "/api/health";

/// Collector that accepts every health probe and batch post.
async fn mock_collector() -> MockServer {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(HEALTH_PATH))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(COLLECT_PATH))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;
	server
}

/// Builder preconfigured against the mock server; tests override what they
/// exercise. The long batch timeout keeps the flush timer out of tests that
/// do not target it.
fn builder_for(server: &MockServer) -> LogwireClientBuilder {
	LogwireClient::builder()
		.api_key(API_KEY)
		.endpoint(server.uri())
		.project_slug("acme")
		.environment(Environment::Production)
		.min_level(LogLevel::Dev)
		.batch_size(8)
		.batch_timeout(Duration::from_secs(30))
		.request_timeout(Duration::from_secs(5))
		.console_echo(false)
}

async fn collect_posts(server: &MockServer) -> Vec<Request> {
	server
		.received_requests()
		.await
		.expect("request recording enabled")
		.into_iter()
		.filter(|request| request.url.path() == COLLECT_PATH)
		.collect()
}

async fn health_probes(server: &MockServer) -> usize {
	server
		.received_requests()
		.await
		.expect("request recording enabled")
		.iter()
		.filter(|request| request.url.path() == HEALTH_PATH)
		.count()
}

/// Polls until the collector has seen `count` batch posts. Delivery runs on
/// a background task, so tests that do not go through `flush` or `shutdown`
/// acks have to wait for it.
async fn wait_for_posts(server: &MockServer, count: usize) -> Vec<Request> {
	for _ in 0..100 {
		let posts = collect_posts(server).await;
		if posts.len() >= count {
			return posts;
		}
		sleep(Duration::from_millis(20)).await;
	}
	panic!("collector never saw {count} batch post(s)");
}

async fn wait_until(what: &str, mut probe: impl FnMut() -> bool) {
	for _ in 0..100 {
		if probe() {
			return;
		}
		sleep(Duration::from_millis(20)).await;
	}
	panic!("timed out waiting for {what}");
}

fn body_json(request: &Request) -> Value {
	serde_json::from_slice(&request.body).expect("collect body is json")
}

fn header_value<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
	request.headers.get(name).and_then(|value| value.to_str().ok())
}

#[tokio::test]
async fn full_batch_ships_immediately() {
	let server = mock_collector().await;
	let client = builder_for(&server)
		.batch_size(3)
		.build()
		.expect("client builds");

	client.info("one", None);
	client.info("two", None);
	client.info("three", None);

	let posts = wait_for_posts(&server, 1).await;
	assert_eq!(posts.len(), 1);
	assert_eq!(header_value(&posts[0], "x-api-key"), Some(API_KEY));

	let body = body_json(&posts[0]);
	assert_eq!(body["projectSlug"], "acme");
	assert_eq!(body["environment"], "production");
	let logs = body["logs"].as_array().expect("logs array");
	let messages: Vec<&str> = logs
		.iter()
		.map(|log| log["message"].as_str().expect("message"))
		.collect();
	assert_eq!(messages, ["one", "two", "three"]);
	assert_eq!(logs[0]["level"], "info");
	assert_eq!(logs[0]["category"], "custom");
	assert_eq!(logs[0]["source"], "server");
	assert_eq!(logs[0]["projectSlug"], "acme");
}

#[tokio::test]
async fn explicit_flush_drains_partial_batch() {
	let server = mock_collector().await;
	let client = builder_for(&server).build().expect("client builds");

	client.info("first", None);
	client.warn("second", None);
	client.flush().await.expect("flush succeeds");

	let posts = collect_posts(&server).await;
	assert_eq!(posts.len(), 1);
	let body = body_json(&posts[0]);
	assert_eq!(body["logs"].as_array().map(Vec::len), Some(2));
	assert_eq!(body["logs"][1]["level"], "warn");
	assert_eq!(client.queued(), 0);

	// Nothing further ships once the queue is drained.
	sleep(Duration::from_millis(150)).await;
	assert_eq!(collect_posts(&server).await.len(), 1);
}

#[tokio::test]
async fn partial_batch_ships_after_timeout() {
	let server = mock_collector().await;
	let client = builder_for(&server)
		.batch_timeout(Duration::from_millis(150))
		.build()
		.expect("client builds");

	client.info("lonely entry", None);

	let posts = wait_for_posts(&server, 1).await;
	let body = body_json(&posts[0]);
	assert_eq!(body["logs"].as_array().map(Vec::len), Some(1));
	assert_eq!(body["logs"][0]["message"], "lonely entry");
	assert_eq!(client.queued(), 0);
}

#[tokio::test]
async fn offline_after_repeated_failures_and_reset() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(HEALTH_PATH))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;
	// The first three posts fail, everything after succeeds.
	Mock::given(method("POST"))
		.and(path(COLLECT_PATH))
		.respond_with(ResponseTemplate::new(500))
		.up_to_n_times(3)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(COLLECT_PATH))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;

	let client = builder_for(&server)
		.batch_size(1)
		.build()
		.expect("client builds");

	client.info("a", None);
	client.info("b", None);
	client.info("c", None);

	wait_until("offline mode", || client.is_offline()).await;
	assert_eq!(collect_posts(&server).await.len(), 3);
	assert_eq!(client.queued(), 0);

	// Offline clients drop new entries without touching the network.
	client.info("dropped", None);
	sleep(Duration::from_millis(150)).await;
	assert_eq!(collect_posts(&server).await.len(), 3);
	assert_eq!(client.queued(), 0);

	// After a reset, delivery resumes on the next entry.
	client.reset_offline_mode();
	wait_until("reset to take effect", || !client.is_offline()).await;

	client.info("after-reset", None);
	let posts = wait_for_posts(&server, 4).await;
	let body = body_json(&posts[3]);
	assert_eq!(body["logs"][0]["message"], "after-reset");
}

#[tokio::test]
async fn startup_probe_failure_suppresses_delivery() {
	let server = MockServer::start().await;
	Mock::given(method("GET"))
		.and(path(HEALTH_PATH))
		.respond_with(ResponseTemplate::new(500))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(COLLECT_PATH))
		.respond_with(ResponseTemplate::new(200))
		.mount(&server)
		.await;

	let client = builder_for(&server)
		.batch_size(1)
		.build()
		.expect("client builds");

	// The failed startup probe retries once immediately, then backs off for
	// a minute; within this test only two health checks can arrive.
	let mut waited = 0;
	while health_probes(&server).await < 2 {
		waited += 1;
		assert!(waited < 100, "second startup probe never arrived");
		sleep(Duration::from_millis(20)).await;
	}

	client.info("parked", None);
	client.info("still parked", None);
	sleep(Duration::from_millis(300)).await;

	assert_eq!(health_probes(&server).await, 2);
	assert!(collect_posts(&server).await.is_empty());
	assert_eq!(client.queued(), 2);
	assert!(!client.is_offline());
}

#[tokio::test]
async fn missing_api_key_never_touches_network() {
	let server = mock_collector().await;
	let client = builder_for(&server)
		.api_key("")
		.build()
		.expect("client builds");

	assert!(client.is_offline());
	client.info("into the void", None);
	client.flush().await.expect("flush is a no-op");
	client.shutdown().await.expect("shutdown is a no-op");
	sleep(Duration::from_millis(100)).await;

	assert!(server
		.received_requests()
		.await
		.expect("request recording enabled")
		.is_empty());
}

#[tokio::test]
async fn shutdown_flushes_pending_entries_once() {
	let server = mock_collector().await;
	let client = builder_for(&server).build().expect("client builds");

	client.info("pending 1", None);
	client.info("pending 2", None);
	client.shutdown().await.expect("shutdown succeeds");

	let posts = collect_posts(&server).await;
	assert_eq!(posts.len(), 1);
	assert_eq!(body_json(&posts[0])["logs"].as_array().map(Vec::len), Some(2));

	// A second shutdown is a no-op, and entries after shutdown are dropped.
	client.shutdown().await.expect("second shutdown succeeds");
	client.info("too late", None);
	sleep(Duration::from_millis(150)).await;
	assert_eq!(collect_posts(&server).await.len(), 1);
}

#[tokio::test]
async fn endpoint_paths_are_normalized() {
	let server = mock_collector().await;
	// Pasting the full collect URL instead of the base URL must work.
	let client = builder_for(&server)
		.endpoint(format!("{}/api/logs/collect", server.uri()))
		.batch_size(1)
		.build()
		.expect("client builds");

	client.info("routed", None);
	wait_for_posts(&server, 1).await;

	for request in server
		.received_requests()
		.await
		.expect("request recording enabled")
	{
		let path = request.url.path();
		assert!(
			path == COLLECT_PATH || path == HEALTH_PATH,
			"unexpected request path {path}"
		);
	}
}

#[tokio::test]
async fn schema_fetch_extends_categories() {
	let server = mock_collector().await;
	Mock::given(method("GET"))
		.and(path("/api/log-schema/acme"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"projectId": "proj-1",
			"projectName": "Acme",
			"categories": [
				{
					"key": "auth",
					"name": "Auth",
					"nameEn": "Auth",
					"icon": "lock",
					"color": "#00ff00",
					"ansiColor": "\u{1b}[32m",
					"description": "",
					"examples": [],
					"isBase": true
				},
				{
					"key": "billing",
					"name": "Billing",
					"nameEn": "Billing",
					"icon": "card",
					"color": "#ffaa00",
					"ansiColor": "\u{1b}[33m",
					"description": "",
					"examples": [],
					"isBase": false
				}
			],
			"version": "1",
			"generatedAt": "2025-01-01T00:00:00Z"
		})))
		.mount(&server)
		.await;

	let client = builder_for(&server).build().expect("client builds");

	let schema = client.fetch_schema().await.expect("schema fetch succeeds");
	assert_eq!(schema.project_id, "proj-1");
	assert!(schema.category("billing").is_some());

	// The project-defined category now resolves instead of degrading.
	let logger = client.category("billing");
	assert_eq!(
		logger.category(),
		&LogCategory::Extra("billing".to_string())
	);

	let schema_requests: Vec<Request> = server
		.received_requests()
		.await
		.expect("request recording enabled")
		.into_iter()
		.filter(|request| request.url.path() == "/api/log-schema/acme")
		.collect();
	assert_eq!(schema_requests.len(), 1);
	assert_eq!(header_value(&schema_requests[0], "x-api-key"), Some(API_KEY));
}

#[tokio::test]
async fn entries_carry_request_context_and_error_info() {
	let server = mock_collector().await;
	let client = builder_for(&server).build().expect("client builds");

	let error = std::io::Error::new(std::io::ErrorKind::Other, "disk offline");
	let mut data = Map::new();
	data.insert("password".to_string(), Value::String("hunter2".to_string()));

	logwire::with_request_id("req-42", async {
		client
			.db()
			.error_with("write failed token=tok_123", &error, Some(data));
	})
	.await;
	client.flush().await.expect("flush succeeds");

	let posts = collect_posts(&server).await;
	let body = body_json(&posts[0]);
	let log = &body["logs"][0];
	assert_eq!(log["requestId"], "req-42");
	assert_eq!(log["category"], "db");
	assert_eq!(log["level"], "error");
	assert_eq!(log["error"]["name"], "Error");
	assert_eq!(log["error"]["message"], "disk offline");
	assert_eq!(log["data"]["password"], "[REDACTED]");
	let message = log["message"].as_str().expect("message");
	assert!(!message.contains("tok_123"), "token leaked: {message}");
}

#[tokio::test]
async fn tracing_events_flow_to_collector() {
	use tracing_subscriber::layer::SubscriberExt;

	let server = mock_collector().await;
	let client = builder_for(&server)
		.batch_size(1)
		.map_prefix("sqlx", LogCategory::Db)
		.build()
		.expect("client builds");

	let subscriber = tracing_subscriber::registry().with(logwire::LogwireLayer::new(client.clone()));
	tracing::subscriber::with_default(subscriber, || {
		tracing::info!(target: "sqlx::query", rows = 3u64, "query ran");
	});

	let posts = wait_for_posts(&server, 1).await;
	let log = &body_json(&posts[0])["logs"][0];
	assert_eq!(log["category"], "db");
	assert_eq!(log["level"], "info");
	assert_eq!(log["message"], "query ran");
	assert_eq!(log["data"]["rows"], 3);
}
