//! Routing of harness response commands back to wallet windows.

use std::collections::HashSet;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::debug;

use glue_protocol::{ActivateChain, Respond, RespondAction};

use crate::error::{Error, Result};
use crate::selectors;
use crate::session::{Session, WindowHandle};

use super::{WalletDriver, click_when_visible, type_when_visible};

impl<S: Session> WalletDriver<S> {
	/// Approves or rejects a pending account-connection window.
	pub async fn request_accounts(&self, cmd: &Respond) -> Result<()> {
		self.respond(cmd, selectors::AUTHORIZE_ALLOW, selectors::AUTHORIZE_DENY).await
	}

	/// Approves or rejects a pending message-signing window.
	pub async fn sign_message(&self, cmd: &Respond) -> Result<()> {
		self.respond(cmd, selectors::MESSAGE_CONFIRM, selectors::MESSAGE_CANCEL).await
	}

	/// Approves or rejects a pending transaction window.
	pub async fn send_transaction(&self, cmd: &Respond) -> Result<()> {
		self.respond(cmd, selectors::TX_CONFIRM, selectors::TX_CANCEL).await
	}

	pub async fn sign_transaction(&self, _cmd: &Respond) -> Result<()> {
		Err(Error::Unimplemented("signTransaction"))
	}

	pub async fn switch_ethereum_chain(&self, _chain_id: &str) -> Result<()> {
		Err(Error::Unimplemented("switchEthereumChain"))
	}

	/// Common shape of the three response families: switch to the target
	/// window, activate the control the action maps to, and always hand
	/// focus back before releasing the lock.
	async fn respond(&self, cmd: &Respond, confirm: &str, cancel: &str) -> Result<()> {
		let control = match cmd.action {
			RespondAction::Approve => confirm,
			RespondAction::Reject => cancel,
		};
		let target = WindowHandle::from(cmd.id.as_str());
		let shared = &self.shared;

		shared
			.lock
			.run_exclusive(async |session| {
				let prior = session.focused_window().await?;
				let outcome = async {
					session.focus_window(&target).await?;
					click_when_visible(session, control, shared.config.ui_timeout).await
				}
				.await;
				restore_focus(session, &prior).await;
				match outcome {
					// Expected race: the target closed between the event and
					// the harness's answer. Nothing left to click.
					Err(err) if err.is_window_gone() => {
						debug!(target: "glue", window = %target, "response target disappeared");
						Ok(())
					}
					other => other,
				}
			})
			.await
	}

	/// Adds a custom network through the wallet's settings surface.
	///
	/// A longer protocol than the response families: it opens its own
	/// settings window, and the add-network control spawns yet another
	/// window that has to be picked out of the handle set by elimination.
	pub async fn activate_chain(&self, cmd: &ActivateChain) -> Result<()> {
		self.shared
			.lock
			.run_exclusive(async |session| {
				let prior = session.focused_window().await?;
				let outcome = self.add_custom_network(session, cmd).await;
				restore_focus(session, &prior).await;
				outcome
			})
			.await
	}

	async fn add_custom_network(&self, session: &S, cmd: &ActivateChain) -> Result<()> {
		let config = &self.shared.config;

		let settings = session.open_window().await?;
		session.focus_window(&settings).await?;
		session.navigate(&config.extension_url).await?;
		self.shared.unlock_if_locked(session).await?;

		click_when_visible(session, selectors::SETTINGS_LINK, config.ui_timeout).await?;
		click_when_visible(session, selectors::NETWORKS_MENU, config.ui_timeout).await?;
		session.wait_visible(selectors::ADD_CUSTOM_NETWORK, config.ui_timeout).await?;

		// The click spawns the form in a fresh window; snapshot the handle
		// set first so the newcomer can be told apart.
		let before: HashSet<WindowHandle> = session.window_handles().await?.into_iter().collect();
		session.click(selectors::ADD_CUSTOM_NETWORK).await?;
		let form = wait_for_new_window(session, &before, config.new_window_timeout, config.new_window_poll).await?;
		debug!(target: "glue", window = %form, "switching to custom network window");

		session.focus_window(&form).await?;
		self.shared.unlock_if_locked(session).await?;

		let name = format!("Test Chain {}", cmd.chain_id);
		type_when_visible(session, selectors::NETWORK_NAME_INPUT, &name, config.ui_timeout).await?;
		type_when_visible(session, selectors::NETWORK_RPC_INPUT, &cmd.rpc_url, config.ui_timeout).await?;
		type_when_visible(session, selectors::NETWORK_CHAIN_ID_INPUT, &cmd.chain_id, config.ui_timeout).await?;
		click_when_visible(session, selectors::NETWORK_SAVE, config.ui_timeout).await
	}
}

/// Best-effort focus restore; the prior window may itself be gone.
async fn restore_focus<S: Session>(session: &S, prior: &WindowHandle) {
	if let Err(err) = session.focus_window(prior).await {
		debug!(target: "glue", window = %prior, error = %err, "could not restore focus");
	}
}

async fn wait_for_new_window<S: Session>(
	session: &S,
	before: &HashSet<WindowHandle>,
	timeout: Duration,
	poll: Duration,
) -> Result<WindowHandle> {
	let deadline = Instant::now() + timeout;
	loop {
		let handles = session.window_handles().await?;
		if let Some(new) = handles.into_iter().find(|handle| !before.contains(handle)) {
			return Ok(new);
		}
		if Instant::now() >= deadline {
			return Err(Error::Timeout {
				ms: timeout.as_millis() as u64,
				condition: "custom network window".to_string(),
			});
		}
		sleep(poll).await;
	}
}
