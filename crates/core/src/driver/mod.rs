//! The window-event correlation driver.
//!
//! Owns the session lock, the pending-window queue, and the background
//! watcher. Classification ([`classify`]) and action dispatch ([`dispatch`])
//! are the two consumers that compete for the lock; its FIFO queue is the
//! only ordering between them.

mod classify;
mod dispatch;
mod watcher;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use glue_protocol::WalletEvent;

pub use classify::WindowIntent;

use crate::config::DriverConfig;
use crate::error::{Error, Result};
use crate::lock::SessionLock;
use crate::selectors;
use crate::session::{Session, WindowHandle};

/// Receiving ends handed to the transport layer at startup.
pub struct DriverChannels {
	/// Domain events, one per classified wallet window.
	pub events: mpsc::UnboundedReceiver<WalletEvent>,
	/// One-shot completion signal carrying the final report payload,
	/// resolved after the session is closed.
	pub done: oneshot::Receiver<Value>,
}

/// Drives one wallet extension instance through a shared automation session.
pub struct WalletDriver<S: Session> {
	shared: Arc<Shared<S>>,
	watcher: Mutex<Option<JoinHandle<()>>>,
	done_tx: Mutex<Option<oneshot::Sender<Value>>>,
}

/// State shared with the background watcher task.
struct Shared<S> {
	lock: SessionLock<S>,
	pending: Mutex<Vec<WindowHandle>>,
	events: mpsc::UnboundedSender<WalletEvent>,
	config: DriverConfig,
	running: watch::Sender<bool>,
}

impl<S: Session> WalletDriver<S> {
	/// Takes ownership of the session and starts the window watcher.
	pub fn start(session: S, config: DriverConfig) -> (Self, DriverChannels) {
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		let (done_tx, done_rx) = oneshot::channel();
		let (running, _) = watch::channel(true);

		let shared = Arc::new(Shared {
			lock: SessionLock::new(session),
			pending: Mutex::new(Vec::new()),
			events: events_tx,
			config,
			running,
		});
		let watcher = tokio::spawn(watcher::run(Arc::clone(&shared)));

		let driver = Self {
			shared,
			watcher: Mutex::new(Some(watcher)),
			done_tx: Mutex::new(Some(done_tx)),
		};
		let channels = DriverChannels {
			events: events_rx,
			done: done_rx,
		};
		(driver, channels)
	}

	/// Imports and unlocks the wallet. Must complete before any other
	/// operation is issued; failure is fatal to the whole instance.
	pub async fn setup(&self) -> Result<()> {
		let config = &self.shared.config;
		self.shared
			.lock
			.run_exclusive(async |session| {
				session.navigate(&config.extension_url).await?;

				click_when_visible(session, selectors::IMPORT_EXISTING_WALLET, config.ui_timeout).await?;
				click_when_visible(session, selectors::IMPORT_RECOVERY_PHRASE, config.ui_timeout).await?;
				type_when_visible(session, selectors::SECRET_INPUT, &config.recovery_phrase, config.ui_timeout).await?;
				click_when_visible(session, selectors::IMPORT_WALLET, config.ui_timeout).await?;

				type_when_visible(session, selectors::SET_PASSWORD, &config.password, config.ui_timeout).await?;
				type_when_visible(session, selectors::SET_PASSWORD_VERIFY, &config.password, config.ui_timeout).await?;
				click_when_visible(session, selectors::TERMS_CHECKBOX, config.ui_timeout).await?;
				click_when_visible(session, selectors::PASSWORD_CONTINUE, config.ui_timeout).await?;

				session.wait_visible(selectors::NOTIFICATION_BELL, config.ui_timeout).await
			})
			.await
	}

	/// Opens the dapp page and connects the wallet to it, handing control to
	/// the wallet-triggered window flow.
	pub async fn launch(&self, url: &str) -> Result<()> {
		let ui_timeout = self.shared.config.ui_timeout;
		self.shared
			.lock
			.run_exclusive(async |session| {
				session.navigate(url).await?;
				click_when_visible(session, selectors::CONNECT_BUTTON, ui_timeout).await
			})
			.await
	}

	/// Stops the watcher, then closes the session.
	pub async fn stop(&self) -> Result<()> {
		// The watcher observes the flag at the top of its next cycle; an
		// in-flight classification pass is allowed to finish. send_replace
		// stores the value even when the watcher has not subscribed yet.
		self.shared.running.send_replace(false);
		let task = self.watcher.lock().take();
		if let Some(task) = task {
			if let Err(err) = task.await {
				warn!(target: "glue", error = %err, "window watcher task failed");
			}
		}
		self.shared.lock.run_exclusive(async |session| session.close().await).await
	}

	/// Terminal hook: stops the session and resolves the completion signal
	/// with the harness's report payload, exactly once.
	pub async fn report(&self, value: Value) -> Result<()> {
		let done_tx = self.done_tx.lock().take().ok_or(Error::AlreadyReported)?;
		let stopped = self.stop().await;
		// The receiver may be gone when the transport shut down first.
		let _ = done_tx.send(value);
		stopped
	}
}

impl<S: Session> Shared<S> {
	fn emit(&self, event: WalletEvent) {
		debug!(target: "glue", id = event.id(), "emitting event");
		// Fire and forget; a dropped receiver means the harness went away.
		let _ = self.events.send(event);
	}

	/// Types the wallet password if the unlock prompt is on screen.
	/// A no-op otherwise, so callers can invoke it unconditionally.
	async fn unlock_if_locked(&self, session: &S) -> Result<()> {
		if !session.is_present(selectors::UNLOCK_INPUT).await? {
			return Ok(());
		}
		session.wait_visible(selectors::UNLOCK_INPUT, self.config.unlock_timeout).await?;
		let submit = format!("{}\n", self.config.password);
		session.send_keys(selectors::UNLOCK_INPUT, &submit).await?;
		tokio::time::sleep(self.config.post_unlock_delay).await;
		Ok(())
	}
}

pub(crate) async fn click_when_visible<S: Session>(session: &S, selector: &str, timeout: Duration) -> Result<()> {
	session.wait_visible(selector, timeout).await?;
	session.click(selector).await
}

pub(crate) async fn type_when_visible<S: Session>(
	session: &S,
	selector: &str,
	keys: &str,
	timeout: Duration,
) -> Result<()> {
	session.wait_visible(selector, timeout).await?;
	session.send_keys(selector, keys).await
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use serde_json::json;

	use crate::config::DriverConfig;
	use crate::selectors;
	use crate::testing::{FakeSession, FakeWindow};

	use super::WalletDriver;

	fn test_config() -> DriverConfig {
		DriverConfig {
			poll_interval: Duration::from_millis(10),
			ui_timeout: Duration::from_millis(100),
			unlock_timeout: Duration::from_millis(100),
			post_unlock_delay: Duration::ZERO,
			new_window_timeout: Duration::from_millis(100),
			new_window_poll: Duration::from_millis(10),
			..DriverConfig::default()
		}
	}

	fn setup_ready_window() -> FakeWindow {
		FakeWindow::with_url("about:blank")
			.element(selectors::IMPORT_EXISTING_WALLET, "")
			.element(selectors::IMPORT_RECOVERY_PHRASE, "")
			.element(selectors::SECRET_INPUT, "")
			.element(selectors::IMPORT_WALLET, "")
			.element(selectors::SET_PASSWORD, "")
			.element(selectors::SET_PASSWORD_VERIFY, "")
			.element(selectors::TERMS_CHECKBOX, "")
			.element(selectors::PASSWORD_CONTINUE, "")
			.element(selectors::NOTIFICATION_BELL, "")
	}

	#[tokio::test]
	async fn setup_walks_the_import_flow() {
		let session = FakeSession::new();
		session.add_window("main", setup_ready_window());
		session.focus("main");

		let (driver, _channels) = WalletDriver::start(session.clone(), test_config());
		driver.setup().await.unwrap();

		let clicked: Vec<String> = session.clicks().into_iter().map(|(_, s)| s).collect();
		assert_eq!(
			clicked,
			vec![
				selectors::IMPORT_EXISTING_WALLET.to_string(),
				selectors::IMPORT_RECOVERY_PHRASE.to_string(),
				selectors::IMPORT_WALLET.to_string(),
				selectors::TERMS_CHECKBOX.to_string(),
				selectors::PASSWORD_CONTINUE.to_string(),
			]
		);

		let typed: Vec<(String, String)> =
			session.keys_sent().into_iter().map(|(_, sel, keys)| (sel, keys)).collect();
		let config = test_config();
		assert_eq!(
			typed,
			vec![
				(selectors::SECRET_INPUT.to_string(), config.recovery_phrase.clone()),
				(selectors::SET_PASSWORD.to_string(), config.password.clone()),
				(selectors::SET_PASSWORD_VERIFY.to_string(), config.password.clone()),
			]
		);

		driver.stop().await.unwrap();
	}

	#[tokio::test]
	async fn setup_fails_when_landmark_never_appears() {
		let session = FakeSession::new();
		// Import flow present, but the bell never shows up.
		let mut window = setup_ready_window();
		window.elements.remove(selectors::NOTIFICATION_BELL);
		session.add_window("main", window);
		session.focus("main");

		let (driver, _channels) = WalletDriver::start(session.clone(), test_config());
		assert!(driver.setup().await.is_err());

		driver.stop().await.unwrap();
	}

	#[tokio::test]
	async fn launch_connects_the_dapp() {
		let session = FakeSession::new();
		session.add_window(
			"main",
			FakeWindow::with_url("about:blank").element(selectors::CONNECT_BUTTON, ""),
		);
		session.focus("main");

		let (driver, _channels) = WalletDriver::start(session.clone(), test_config());
		driver.launch("http://localhost:3000/tests").await.unwrap();

		assert_eq!(session.clicks().len(), 1);
		assert_eq!(session.clicks()[0].1, selectors::CONNECT_BUTTON);

		driver.stop().await.unwrap();
	}

	#[tokio::test]
	async fn stop_closes_the_session() {
		let session = FakeSession::new();
		session.add_window("main", FakeWindow::with_url("about:blank"));
		session.focus("main");

		let (driver, _channels) = WalletDriver::start(session.clone(), test_config());
		driver.stop().await.unwrap();

		assert!(session.is_closed());
	}

	#[tokio::test]
	async fn report_resolves_the_completion_signal_once() {
		let session = FakeSession::new();
		session.add_window("main", FakeWindow::with_url("about:blank"));
		session.focus("main");

		let (driver, channels) = WalletDriver::start(session.clone(), test_config());
		driver.report(json!({ "passed": 12, "failed": 0 })).await.unwrap();

		assert!(session.is_closed());
		assert_eq!(channels.done.await.unwrap(), json!({ "passed": 12, "failed": 0 }));

		// The signal is one-shot; a second report is a protocol error.
		assert!(driver.report(json!({})).await.is_err());
	}
}
