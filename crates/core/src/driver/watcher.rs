//! Background discovery of wallet-spawned windows.
//!
//! The automation protocol has no "window opened" notification, so the
//! watcher polls. Handle listing runs WITHOUT the session lock; the diff is
//! always computed against the watcher's own previous snapshot so transient
//! focus changes under the lock cannot fake new windows.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::session::Session;

use super::Shared;

pub(super) async fn run<S: Session>(shared: Arc<Shared<S>>) {
	let mut running = shared.running.subscribe();

	let mut previous = match shared.lock.unlocked().window_handles().await {
		Ok(handles) => handles,
		Err(err) => {
			warn!(target: "glue", error = %err, "initial window snapshot failed");
			Vec::new()
		}
	};

	while *running.borrow() {
		match shared.lock.unlocked().window_handles().await {
			Ok(next) => {
				let created: Vec<_> = next.iter().filter(|h| !previous.contains(h)).cloned().collect();
				previous = next;

				if !created.is_empty() {
					debug!(target: "glue", windows = ?created, "discovered new windows");
					shared.pending.lock().extend(created);
					// Pass failures surface to the command that hit them;
					// the poll loop itself must keep going.
					if let Err(err) = shared.classify_pending().await {
						warn!(target: "glue", error = %err, "classification pass failed");
					}
				}
			}
			Err(err) => {
				// Listing can fail transiently while the session shuts down.
				debug!(target: "glue", error = %err, "window snapshot failed");
			}
		}

		// The stop signal cuts the sleep short; the flag check at the top of
		// the cycle is what actually ends the loop.
		tokio::select! {
			_ = running.changed() => {}
			_ = sleep(shared.config.poll_interval) => {}
		}
	}
}
