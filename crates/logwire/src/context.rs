// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped correlation ids.
//!
//! Entries logged inside [`with_request_id`] carry that id automatically, so
//! every log line of one request can be correlated at the collector without
//! threading the id through call signatures.

use std::future::Future;

use uuid::Uuid;

tokio::task_local! {
	static REQUEST_ID: String;
}

/// Runs `future` with `request_id` attached to every entry logged inside it.
pub async fn with_request_id<F>(request_id: impl Into<String>, future: F) -> F::Output
where
	F: Future,
{
	REQUEST_ID.scope(request_id.into(), future).await
}

/// The request id of the current scope, if any.
pub fn current_request_id() -> Option<String> {
	REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// A fresh random request id for middleware that starts a scope.
pub fn generate_request_id() -> String {
	Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn scope_carries_id_into_nested_futures() {
		assert_eq!(current_request_id(), None);
		let seen = with_request_id("req-7", async {
			let inner = async { current_request_id() }.await;
			inner
		})
		.await;
		assert_eq!(seen.as_deref(), Some("req-7"));
		assert_eq!(current_request_id(), None);
	}

	#[tokio::test]
	async fn scopes_nest_and_shadow() {
		let (outer, inner) = with_request_id("outer", async {
			let outer = current_request_id();
			let inner = with_request_id("inner", async { current_request_id() }).await;
			(outer, inner)
		})
		.await;
		assert_eq!(outer.as_deref(), Some("outer"));
		assert_eq!(inner.as_deref(), Some("inner"));
	}

	#[test]
	fn generated_ids_are_unique() {
		assert_ne!(generate_request_id(), generate_request_id());
	}
}
