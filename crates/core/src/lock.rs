//! Exclusive-access scheduler for the shared automation session.

use tokio::sync::Mutex;
use tracing::trace;

/// Serializes all operations against one shared resource.
///
/// At most one operation runs at a time; concurrent callers queue and
/// acquire in FIFO arrival order (tokio's mutex is fair). An operation that
/// returns an error still releases the lock on scope exit, so queued work
/// always makes progress. When the lock is idle an operation starts without
/// any scheduling delay.
pub struct SessionLock<S> {
	session: S,
	gate: Mutex<()>,
}

impl<S> SessionLock<S> {
	pub fn new(session: S) -> Self {
		Self {
			session,
			gate: Mutex::new(()),
		}
	}

	/// Runs `op` with exclusive access to the protected session.
	pub async fn run_exclusive<R>(&self, op: impl AsyncFnOnce(&S) -> R) -> R {
		let _guard = self.gate.lock().await;
		trace!(target: "glue", "session lock acquired");
		let out = op(&self.session).await;
		trace!(target: "glue", "session lock released");
		out
	}

	/// Borrows the session WITHOUT taking the lock.
	///
	/// Only safe for operations that tolerate running concurrently with a
	/// lock holder, such as listing window handles while focus is changing.
	pub fn unlocked(&self) -> &S {
		&self.session
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;
	use std::sync::atomic::{AtomicUsize, Ordering};
	use std::time::Duration;

	use parking_lot::Mutex;
	use tokio::sync::oneshot;
	use tokio::time::sleep;

	use super::*;

	#[tokio::test]
	async fn one_operation_at_a_time() {
		let lock = Arc::new(SessionLock::new(()));
		let active = Arc::new(AtomicUsize::new(0));
		let peak = Arc::new(AtomicUsize::new(0));

		let tasks: Vec<_> = (0..8)
			.map(|_| {
				let lock = Arc::clone(&lock);
				let active = Arc::clone(&active);
				let peak = Arc::clone(&peak);
				tokio::spawn(async move {
					lock.run_exclusive(async |_| {
						let now = active.fetch_add(1, Ordering::SeqCst) + 1;
						peak.fetch_max(now, Ordering::SeqCst);
						sleep(Duration::from_millis(2)).await;
						active.fetch_sub(1, Ordering::SeqCst);
					})
					.await;
				})
			})
			.collect();

		for task in tasks {
			task.await.unwrap();
		}
		assert_eq!(peak.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn queued_operations_complete_in_arrival_order() {
		let lock = Arc::new(SessionLock::new(()));
		let order = Arc::new(Mutex::new(Vec::new()));

		// Hold the lock so every subsequent caller parks in the queue.
		let (release_tx, release_rx) = oneshot::channel::<()>();
		let holder = {
			let lock = Arc::clone(&lock);
			tokio::spawn(async move {
				lock.run_exclusive(async |_| {
					let _ = release_rx.await;
				})
				.await;
			})
		};
		tokio::task::yield_now().await;

		let mut waiters = Vec::new();
		for i in 0..5u32 {
			let lock = Arc::clone(&lock);
			let order = Arc::clone(&order);
			waiters.push(tokio::spawn(async move {
				lock.run_exclusive(async |_| {
					// Uneven latency must not reorder completions.
					if i % 2 == 0 {
						sleep(Duration::from_millis(5)).await;
					}
					order.lock().push(i);
				})
				.await;
			}));
			// Let caller i reach the queue before caller i + 1 is issued.
			tokio::task::yield_now().await;
		}

		release_tx.send(()).unwrap();
		holder.await.unwrap();
		for waiter in waiters {
			waiter.await.unwrap();
		}
		assert_eq!(*order.lock(), vec![0, 1, 2, 3, 4]);
	}

	#[tokio::test]
	async fn failure_releases_the_lock() {
		let lock = SessionLock::new(());

		let failed: Result<(), &str> = lock.run_exclusive(async |_| Err("boom")).await;
		assert!(failed.is_err());

		// A failing operation must not starve whatever comes next.
		let ok = lock.run_exclusive(async |_| 42).await;
		assert_eq!(ok, 42);
	}

	#[tokio::test]
	async fn unlocked_bypasses_the_gate() {
		let lock = Arc::new(SessionLock::new(AtomicUsize::new(7)));
		let (release_tx, release_rx) = oneshot::channel::<()>();

		let holder = {
			let lock = Arc::clone(&lock);
			tokio::spawn(async move {
				lock.run_exclusive(async |_| {
					let _ = release_rx.await;
				})
				.await;
			})
		};
		tokio::task::yield_now().await;

		// Readable while an operation holds the lock.
		assert_eq!(lock.unlocked().load(Ordering::SeqCst), 7);

		release_tx.send(()).unwrap();
		holder.await.unwrap();
	}
}
