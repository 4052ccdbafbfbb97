// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process signal handling.
//!
//! The first interrupt or terminate signal shuts the client down so queued
//! entries get a last flush; repeated signals are no-ops inside the
//! transport.

use tracing::{info, warn};

use crate::client::LogwireClient;

/// Spawns a task that waits for SIGINT or SIGTERM and drains the client.
pub(crate) fn install(client: LogwireClient) {
	tokio::spawn(async move {
		wait_for_signal().await;
		info!("shutdown signal received, draining log queue");
		if let Err(err) = client.shutdown().await {
			warn!(error = %err, "log queue drain failed during shutdown");
		}
	});
}

#[cfg(unix)]
async fn wait_for_signal() {
	use tokio::signal::unix::{signal, SignalKind};

	let ctrl_c = async {
		if tokio::signal::ctrl_c().await.is_err() {
			// Signal registration failed; never resolve rather than shutting
			// down a healthy client.
			std::future::pending::<()>().await;
		}
	};

	match signal(SignalKind::terminate()) {
		Ok(mut terminate) => {
			tokio::select! {
				_ = ctrl_c => {}
				_ = terminate.recv() => {}
			}
		}
		Err(err) => {
			warn!(error = %err, "failed to install SIGTERM handler");
			ctrl_c.await;
		}
	}
}

#[cfg(not(unix))]
async fn wait_for_signal() {
	if tokio::signal::ctrl_c().await.is_err() {
		std::future::pending::<()>().await;
	}
}
