// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Background log delivery: queueing, batching, connectivity probing,
//! offline mode, and shutdown draining.
//!
//! All mutable transport state (the FIFO queue, failure counters, mode flags
//! and both timer slots) is owned by a single background task fed through a
//! command channel. Logging callers never block and never see delivery
//! errors; the task re-validates every flag at the point of use, so racing
//! transitions (a shutdown racing an enqueue, a timer firing after the
//! collector went offline) degrade to no-ops. Delivery is at-most-once: a
//! batch taken off the queue is never re-queued, whatever the outcome.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use logwire_core::LogEntry;

use crate::error::{LogwireError, Result};
use crate::sender::LogSender;

/// Delivery failures in a row before the transport gives up and goes
/// offline.
pub(crate) const MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Startup probe attempts before the transport gives up and goes offline.
pub(crate) const STARTUP_MAX_RETRIES: u32 = 10;

/// Wait between startup probe attempts.
pub(crate) const STARTUP_RETRY_INTERVAL: Duration = Duration::from_secs(60);

/// Tuning knobs for the transport task.
#[derive(Debug, Clone)]
pub(crate) struct TransportConfig {
	/// Entries per delivery batch; reaching this many triggers an immediate
	/// flush.
	pub batch_size: usize,
	/// How long a partial batch may wait before it is flushed.
	pub batch_timeout: Duration,
	pub max_consecutive_failures: u32,
	pub startup_max_retries: u32,
	pub startup_retry_interval: Duration,
}

impl TransportConfig {
	pub fn new(batch_size: usize, batch_timeout: Duration) -> Self {
		Self {
			batch_size,
			batch_timeout,
			max_consecutive_failures: MAX_CONSECUTIVE_FAILURES,
			startup_max_retries: STARTUP_MAX_RETRIES,
			startup_retry_interval: STARTUP_RETRY_INTERVAL,
		}
	}
}

/// Command sent to the background transport task.
#[derive(Debug)]
pub(crate) enum TransportCommand {
	/// Queue an entry for batched delivery.
	Log(LogEntry),
	/// Drain the queue now; acked when the drain pass finishes.
	Flush(oneshot::Sender<()>),
	/// Final flush and stop; acked when the task is done.
	Shutdown(oneshot::Sender<()>),
	/// Leave offline mode and zero the failure counters.
	Reset,
}

/// Shared snapshot of the transport's connectivity state. Written only by
/// the transport task; read lock-free by client handles.
#[derive(Debug, Default)]
pub struct TransportStatus {
	offline: AtomicBool,
	connection_established: AtomicBool,
	probing: AtomicBool,
	shutting_down: AtomicBool,
	consecutive_failures: AtomicU32,
	startup_attempts: AtomicU32,
	queued: AtomicUsize,
}

impl TransportStatus {
	/// Offline mode entered after repeated failures; terminal until reset.
	pub fn is_offline(&self) -> bool {
		self.offline.load(Ordering::SeqCst)
	}

	/// Whether a health probe has ever succeeded for this transport.
	pub fn connection_established(&self) -> bool {
		self.connection_established.load(Ordering::SeqCst)
	}

	/// Whether the startup retry loop is still probing the collector.
	pub fn is_probing(&self) -> bool {
		self.probing.load(Ordering::SeqCst)
	}

	pub fn is_shutting_down(&self) -> bool {
		self.shutting_down.load(Ordering::SeqCst)
	}

	pub fn consecutive_failures(&self) -> u32 {
		self.consecutive_failures.load(Ordering::SeqCst)
	}

	pub fn startup_attempts(&self) -> u32 {
		self.startup_attempts.load(Ordering::SeqCst)
	}

	/// Entries currently queued for delivery.
	pub fn queued(&self) -> usize {
		self.queued.load(Ordering::SeqCst)
	}
}

/// Client-side handle to the transport task.
#[derive(Debug)]
pub(crate) struct TransportHandle {
	tx: mpsc::UnboundedSender<TransportCommand>,
	status: Arc<TransportStatus>,
	task_handle: Option<JoinHandle<()>>,
}

impl TransportHandle {
	/// Queues an entry for delivery. Never blocks; silently drops the entry
	/// when the transport is offline or shutting down.
	pub fn enqueue(&self, entry: LogEntry) {
		if self.status.is_shutting_down() || self.status.is_offline() {
			return;
		}
		// A closed channel means the task is gone; the entry is dropped,
		// same as any other post-shutdown log call.
		let _ = self.tx.send(TransportCommand::Log(entry));
	}

	/// Drains the queue in batch-sized sends and waits for completion.
	pub async fn flush(&self) -> Result<()> {
		let (ack_tx, ack_rx) = oneshot::channel();
		self.tx
			.send(TransportCommand::Flush(ack_tx))
			.map_err(|_| LogwireError::ClientShutdown)?;
		ack_rx.await.map_err(|_| LogwireError::ClientShutdown)
	}

	/// Performs the final best-effort flush and stops the task. Safe to call
	/// more than once; later calls return once the task is gone.
	pub async fn shutdown(&self) -> Result<()> {
		let (ack_tx, ack_rx) = oneshot::channel();
		if self.tx.send(TransportCommand::Shutdown(ack_tx)).is_err() {
			return Ok(());
		}
		let _ = ack_rx.await;
		Ok(())
	}

	/// Clears offline mode and the failure counters. Queued entries are
	/// kept; no probe is started, so the next enqueue resumes delivery
	/// directly.
	pub fn reset_offline_mode(&self) {
		let _ = self.tx.send(TransportCommand::Reset);
	}

	pub fn status(&self) -> &Arc<TransportStatus> {
		&self.status
	}
}

impl Drop for TransportHandle {
	fn drop(&mut self) {
		if let Some(handle) = self.task_handle.take() {
			handle.abort();
		}
	}
}

/// Spawns the transport task and returns its handle.
pub(crate) fn spawn(config: TransportConfig, sender: Arc<dyn LogSender>) -> TransportHandle {
	let (tx, rx) = mpsc::unbounded_channel();
	let status = Arc::new(TransportStatus::default());
	let transport = Transport {
		config,
		sender,
		status: status.clone(),
		rx,
		queue: VecDeque::new(),
		offline: false,
		probing: false,
		shutting_down: false,
		connection_established: false,
		consecutive_failures: 0,
		startup_attempts: 0,
		flush_at: None,
		probe_at: None,
	};
	let task_handle = tokio::spawn(transport.run());
	TransportHandle {
		tx,
		status,
		task_handle: Some(task_handle),
	}
}

/// The background task. Owns every piece of mutable delivery state.
struct Transport {
	config: TransportConfig,
	sender: Arc<dyn LogSender>,
	status: Arc<TransportStatus>,
	rx: mpsc::UnboundedReceiver<TransportCommand>,
	queue: VecDeque<LogEntry>,
	offline: bool,
	probing: bool,
	shutting_down: bool,
	connection_established: bool,
	consecutive_failures: u32,
	startup_attempts: u32,
	/// Single flush timer slot; armed only while a partial batch waits.
	flush_at: Option<Instant>,
	/// Single probe timer slot; armed only between startup retry attempts.
	probe_at: Option<Instant>,
}

fn deadline_or_far(deadline: Option<Instant>) -> Instant {
	deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(86_400))
}

/// What woke the transport loop.
enum Wake {
	Command(Option<TransportCommand>),
	FlushTimer,
	ProbeTimer,
}

impl Transport {
	async fn run(mut self) {
		info!(
			batch_size = self.config.batch_size,
			batch_timeout_ms = self.config.batch_timeout.as_millis() as u64,
			"starting log transport"
		);

		// Startup probe: one immediate health check decides between going
		// straight online and entering the bounded retry loop.
		if self.sender.check_health().await {
			self.set_connection_established(true);
			debug!("collector healthy");
		} else {
			warn!("collector unavailable, retrying in background");
			self.set_probing(true);
			self.probe_attempt().await;
		}

		loop {
			let wake = tokio::select! {
				maybe_command = self.rx.recv() => Wake::Command(maybe_command),
				_ = tokio::time::sleep_until(deadline_or_far(self.flush_at)), if self.flush_at.is_some() => Wake::FlushTimer,
				_ = tokio::time::sleep_until(deadline_or_far(self.probe_at)), if self.probe_at.is_some() => Wake::ProbeTimer,
			};
			match wake {
				Wake::Command(Some(command)) => {
					if self.handle_command(command).await {
						break;
					}
				}
				// All handles dropped; nothing can reach the queue anymore.
				Wake::Command(None) => break,
				Wake::FlushTimer => {
					self.flush_at = None;
					self.flush_batch().await;
					self.pump().await;
				}
				Wake::ProbeTimer => {
					self.probe_at = None;
					self.probe_attempt().await;
				}
			}
		}

		debug!("log transport stopped");
	}

	/// Returns true when the task should stop.
	async fn handle_command(&mut self, command: TransportCommand) -> bool {
		match command {
			TransportCommand::Log(entry) => {
				// Re-validate: the flag may have flipped after the handle
				// checked it.
				if self.shutting_down || self.offline {
					return false;
				}
				self.queue.push_back(entry);
				self.sync_queued();
				// While probing, entries accumulate; the probe loop flushes
				// them once the collector answers.
				if !self.probing {
					self.pump().await;
				}
				false
			}
			TransportCommand::Flush(ack) => {
				if !self.shutting_down {
					self.drain().await;
				}
				let _ = ack.send(());
				false
			}
			TransportCommand::Shutdown(ack) => {
				self.begin_shutdown().await;
				let _ = ack.send(());
				true
			}
			TransportCommand::Reset => {
				self.reset_offline_mode();
				false
			}
		}
	}

	/// Scheduling pass: flush while a full batch is queued, otherwise arm
	/// the flush timer for whatever partial batch remains.
	async fn pump(&mut self) {
		loop {
			if self.shutting_down || self.offline || self.probing {
				return;
			}
			if self.queue.len() >= self.config.batch_size {
				self.flush_batch().await;
				continue;
			}
			if !self.queue.is_empty() && self.flush_at.is_none() {
				self.flush_at = Some(Instant::now() + self.config.batch_timeout);
			}
			return;
		}
	}

	/// Sends one batch of up to `batch_size` entries from the head of the
	/// queue. The batch is gone from the queue whatever the outcome.
	async fn flush_batch(&mut self) {
		if self.queue.is_empty() {
			return;
		}
		if self.offline {
			// Offline entered between scheduling and firing: discard.
			self.queue.clear();
			self.sync_queued();
			return;
		}

		let take = self.config.batch_size.min(self.queue.len());
		let batch: Vec<LogEntry> = self.queue.drain(..take).collect();
		self.sync_queued();
		// An immediate flush supersedes any armed timer.
		self.flush_at = None;

		match self.sender.send_batch(batch).await {
			Ok(()) => {
				self.set_consecutive_failures(0);
				debug!(count = take, "log batch delivered");
			}
			Err(error) => {
				self.set_consecutive_failures(self.consecutive_failures + 1);
				debug!(
					error = %error,
					failures = self.consecutive_failures,
					max = self.config.max_consecutive_failures,
					"log batch delivery failed, batch dropped"
				);
				if self.consecutive_failures >= self.config.max_consecutive_failures {
					self.go_offline("delivery failed repeatedly");
				}
			}
		}
	}

	/// Flushes until the queue is empty or the transport goes offline.
	async fn drain(&mut self) {
		while !self.queue.is_empty() && !self.offline {
			self.flush_batch().await;
		}
	}

	/// One startup probe attempt; arms the probe timer for the next one
	/// until the attempt budget runs out.
	async fn probe_attempt(&mut self) {
		if self.shutting_down || self.connection_established {
			self.set_probing(false);
			return;
		}
		self.set_startup_attempts(self.startup_attempts + 1);
		debug!(
			attempt = self.startup_attempts,
			max = self.config.startup_max_retries,
			"probing collector health"
		);
		if self.sender.check_health().await {
			info!(attempts = self.startup_attempts, "collector reachable, resuming delivery");
			self.set_probing(false);
			self.set_offline(false);
			self.set_connection_established(true);
			self.set_consecutive_failures(0);
			self.probe_at = None;
			if !self.queue.is_empty() {
				self.pump().await;
			}
		} else if self.startup_attempts >= self.config.startup_max_retries {
			self.set_probing(false);
			self.go_offline("startup retries exhausted");
		} else {
			self.probe_at = Some(Instant::now() + self.config.startup_retry_interval);
		}
	}

	/// Terminal until reset: stop all delivery and drop what is queued.
	fn go_offline(&mut self, reason: &str) {
		warn!(
			reason,
			dropped = self.queue.len(),
			"collector unreachable, entering offline mode"
		);
		self.set_offline(true);
		self.queue.clear();
		self.sync_queued();
		self.flush_at = None;
		self.probe_at = None;
		self.set_probing(false);
	}

	/// Mirror of the public reset: clears offline state and counters but
	/// keeps the queue and does not probe.
	fn reset_offline_mode(&mut self) {
		info!("offline mode reset");
		self.set_offline(false);
		self.set_consecutive_failures(0);
		self.set_connection_established(false);
		self.set_startup_attempts(0);
		self.set_probing(false);
		self.probe_at = None;
	}

	/// First shutdown wins: cancel timers, stop probing, and make one
	/// best-effort flush if the collector was ever reachable.
	async fn begin_shutdown(&mut self) {
		if self.shutting_down {
			return;
		}
		self.set_shutting_down();
		self.flush_at = None;
		self.probe_at = None;
		self.set_probing(false);
		if !self.offline && self.connection_established && !self.queue.is_empty() {
			debug!(queued = self.queue.len(), "final flush before shutdown");
			self.flush_batch().await;
		}
		info!("log transport shut down");
	}

	fn sync_queued(&self) {
		self.status.queued.store(self.queue.len(), Ordering::SeqCst);
	}

	fn set_offline(&mut self, value: bool) {
		self.offline = value;
		self.status.offline.store(value, Ordering::SeqCst);
	}

	fn set_probing(&mut self, value: bool) {
		self.probing = value;
		self.status.probing.store(value, Ordering::SeqCst);
	}

	fn set_shutting_down(&mut self) {
		self.shutting_down = true;
		self.status.shutting_down.store(true, Ordering::SeqCst);
	}

	fn set_connection_established(&mut self, value: bool) {
		self.connection_established = value;
		self.status
			.connection_established
			.store(value, Ordering::SeqCst);
	}

	fn set_consecutive_failures(&mut self, value: u32) {
		self.consecutive_failures = value;
		self.status.consecutive_failures.store(value, Ordering::SeqCst);
	}

	fn set_startup_attempts(&mut self, value: u32) {
		self.startup_attempts = value;
		self.status.startup_attempts.store(value, Ordering::SeqCst);
	}
}
