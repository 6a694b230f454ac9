// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Countdown of job cycles that have not yet acknowledged shutdown.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Clone, Debug)]
pub struct Completion {
	inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
	remaining: AtomicUsize,
	zero: Notify,
}

impl Completion {
	pub fn new(count: usize) -> Self {
		Self {
			inner: Arc::new(Inner {
				remaining: AtomicUsize::new(count),
				zero: Notify::new(),
			}),
		}
	}

	/// Marks one participant complete. Extra calls past zero are ignored.
	pub fn done(&self) {
		let previous = self
			.inner
			.remaining
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
		if previous == Ok(1) {
			self.inner.zero.notify_waiters();
		}
	}

	pub fn remaining(&self) -> usize {
		self.inner.remaining.load(Ordering::Acquire)
	}

	/// Returns a guard that calls [`done`](Self::done) when dropped.
	pub fn guard(&self) -> CompletionGuard {
		CompletionGuard {
			completion: self.clone(),
		}
	}

	/// Waits until every participant has completed.
	pub async fn wait(&self) {
		loop {
			let notified = self.inner.zero.notified();
			tokio::pin!(notified);
			notified.as_mut().enable();

			if self.remaining() == 0 {
				return;
			}
			notified.await;
		}
	}
}

/// Completes its participant on drop, including when the owning task panics.
#[derive(Debug)]
pub struct CompletionGuard {
	completion: Completion,
}

impl Drop for CompletionGuard {
	fn drop(&mut self) {
		self.completion.done();
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	#[tokio::test]
	async fn test_zero_count_is_complete() {
		let completion = Completion::new(0);
		completion.wait().await;
		assert_eq!(completion.remaining(), 0);
	}

	#[tokio::test]
	async fn test_done_past_zero_saturates() {
		let completion = Completion::new(1);
		completion.done();
		completion.done();
		assert_eq!(completion.remaining(), 0);
	}

	#[tokio::test]
	async fn test_wait_blocks_until_all_done() {
		let completion = Completion::new(3);
		for i in 0..3u64 {
			let guard = completion.guard();
			tokio::spawn(async move {
				tokio::time::sleep(Duration::from_millis(10 * (i + 1))).await;
				drop(guard);
			});
		}

		tokio::time::timeout(Duration::from_secs(5), completion.wait())
			.await
			.expect("all participants should complete");
		assert_eq!(completion.remaining(), 0);
	}

	#[tokio::test]
	async fn test_guard_completes_on_panic() {
		let completion = Completion::new(1);
		let guard = completion.guard();
		let handle = tokio::spawn(async move {
			let _guard = guard;
			panic!("cycle task failed");
		});

		assert!(handle.await.is_err());
		completion.wait().await;
	}

	#[tokio::test(start_paused = true)]
	async fn test_wait_pending_while_participants_remain() {
		let completion = Completion::new(2);
		completion.done();

		let result = tokio::time::timeout(Duration::from_secs(1), completion.wait()).await;
		assert!(result.is_err());
		assert_eq!(completion.remaining(), 1);
	}
}
