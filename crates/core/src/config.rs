use std::time::Duration;

/// Internal page of the wallet extension under test.
pub const EXTENSION_URL: &str =
	"chrome-extension://hnfanknocfeofbddgcijnmhnfnkdnaad/index.html?inPageRequest=false";

const WALLET_PASSWORD: &str = "ethereum1";
const RECOVERY_PHRASE: &str =
	"basket cradle actor pizza similar liar suffer another all fade flag brave";

/// Runtime knobs for [`WalletDriver`](crate::WalletDriver).
///
/// Defaults carry the reference wallet's constants; tests shrink the
/// timeouts, the CLI overrides the poll interval.
#[derive(Debug, Clone)]
pub struct DriverConfig {
	pub extension_url: String,
	pub password: String,
	pub recovery_phrase: String,
	/// Window discovery cadence.
	pub poll_interval: Duration,
	/// Bound for individual element visibility waits.
	pub ui_timeout: Duration,
	/// Bound for the unlock prompt to accept input.
	pub unlock_timeout: Duration,
	/// Settle time after submitting the unlock password.
	pub post_unlock_delay: Duration,
	/// Bound for the add-network popup to appear after the triggering click.
	pub new_window_timeout: Duration,
	/// Cadence while waiting for that popup.
	pub new_window_poll: Duration,
}

impl Default for DriverConfig {
	fn default() -> Self {
		Self {
			extension_url: EXTENSION_URL.to_string(),
			password: WALLET_PASSWORD.to_string(),
			recovery_phrase: RECOVERY_PHRASE.to_string(),
			poll_interval: Duration::from_millis(500),
			ui_timeout: Duration::from_secs(2),
			unlock_timeout: Duration::from_secs(2),
			post_unlock_delay: Duration::from_secs(1),
			new_window_timeout: Duration::from_secs(10),
			new_window_poll: Duration::from_millis(250),
		}
	}
}
