//! Intent classification of freshly discovered wallet windows.

use tracing::{debug, warn};
use url::Url;

use glue_protocol::{RequestAccountsEvent, SendTransactionEvent, SignMessageEvent, WalletEvent};

use crate::error::Result;
use crate::selectors;
use crate::session::{Session, WindowHandle};
use crate::units;

use super::Shared;

/// Declared purpose of a wallet window, read from its `action` URL query
/// parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowIntent {
	RequestAccounts,
	SignMessage,
	/// The wallet shows one confirmation surface for signing and sending a
	/// transaction, so the two are indistinguishable at this layer.
	SendTransaction,
	/// Anything else, including a missing parameter. Logged and skipped,
	/// never an error.
	Unrecognized,
}

impl WindowIntent {
	pub fn from_action(action: Option<&str>) -> Self {
		match action {
			Some("requestEthereumAccounts") => Self::RequestAccounts,
			Some("signEthereumMessage") => Self::SignMessage,
			Some("signEthereumTransaction") => Self::SendTransaction,
			_ => Self::Unrecognized,
		}
	}
}

impl<S: Session> Shared<S> {
	/// Drains and classifies every window discovered so far.
	///
	/// Runs under the session lock. Handles that arrive during the pass land
	/// in a fresh queue and wait for the next one, so nothing is processed
	/// twice. Focus is restored to the previously active window afterwards,
	/// even when a handle in the batch fails.
	pub(super) async fn classify_pending(&self) -> Result<()> {
		self.lock
			.run_exclusive(async |session| {
				let batch: Vec<WindowHandle> = std::mem::take(&mut *self.pending.lock());
				if batch.is_empty() {
					return Ok(());
				}

				// Best-effort: the previously focused window may already be gone.
				let prior = session.focused_window().await.ok();

				let outcome = self.classify_batch(session, batch).await;

				if let Some(prior) = prior {
					if let Err(err) = session.focus_window(&prior).await {
						debug!(target: "glue", window = %prior, error = %err, "could not restore focus");
					}
				}
				outcome
			})
			.await
	}

	async fn classify_batch(&self, session: &S, batch: Vec<WindowHandle>) -> Result<()> {
		for handle in batch {
			match self.classify_window(session, &handle).await {
				Ok(()) => {}
				// Expected race: the window closed before or during
				// processing. Skip it and keep draining the batch.
				Err(err) if err.is_window_gone() => {
					debug!(target: "glue", window = %handle, "window disappeared before classification");
				}
				Err(err) => return Err(err),
			}
		}
		Ok(())
	}

	async fn classify_window(&self, session: &S, handle: &WindowHandle) -> Result<()> {
		session.focus_window(handle).await?;

		let location = session.current_url().await?;
		let url = Url::parse(&location)?;
		let action = url
			.query_pairs()
			.find(|(key, _)| key == "action")
			.map(|(_, value)| value.into_owned());

		match WindowIntent::from_action(action.as_deref()) {
			WindowIntent::RequestAccounts => {
				self.unlock_if_locked(session).await?;
				self.emit(WalletEvent::RequestAccounts(RequestAccountsEvent {
					id: handle.to_string(),
					accounts: Vec::new(),
				}));
			}
			WindowIntent::SignMessage => {
				self.unlock_if_locked(session).await?;
				let message = self.read_text(session, selectors::MESSAGE_BODY).await?;
				self.emit(WalletEvent::SignMessage(SignMessageEvent {
					id: handle.to_string(),
					message,
				}));
			}
			WindowIntent::SendTransaction => {
				self.unlock_if_locked(session).await?;
				let to = self.read_text(session, selectors::TX_RECIPIENT).await?;
				let from = self.read_text(session, selectors::TX_SENDER).await?;
				let cost = self.read_text(session, selectors::TX_AMOUNT).await?;
				let value = units::parse_base_units(units::extract_decimal(&cost), 18)?;
				self.emit(WalletEvent::SendTransaction(SendTransactionEvent {
					id: handle.to_string(),
					from,
					to,
					data: "0x".to_string(),
					value: value.to_string(),
				}));
			}
			WindowIntent::Unrecognized => {
				let title = session.title().await.unwrap_or_default();
				warn!(
					target: "glue",
					window = %handle,
					%title,
					url = %location,
					action = action.as_deref().unwrap_or(""),
					"unrecognized wallet window"
				);
			}
		}
		Ok(())
	}

	/// Waits for a region to render, then reads its text. Window content
	/// appears asynchronously after the window itself does.
	async fn read_text(&self, session: &S, selector: &str) -> Result<String> {
		session.wait_visible(selector, self.config.ui_timeout).await?;
		session.text(selector).await
	}
}
