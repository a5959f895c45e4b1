//! Capability surface over the shared automation session.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque identifier of one browser window/tab.
///
/// Stable for the window's lifetime and unique at any instant. Backends may
/// reuse identifiers after a window closes, so a handle is a lookup key into
/// the live session, not a permanent name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowHandle(String);

impl WindowHandle {
	pub fn new(raw: impl Into<String>) -> Self {
		Self(raw.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for WindowHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<String> for WindowHandle {
	fn from(raw: String) -> Self {
		Self(raw)
	}
}

impl From<&str> for WindowHandle {
	fn from(raw: &str) -> Self {
		Self(raw.to_string())
	}
}

/// The boundary toward the automation backend.
///
/// Element operations are keyed by CSS selector and act on the currently
/// focused window. Methods take `&self`; implementations are expected to be
/// cheap handles over the real session. Mutual exclusion is NOT this trait's
/// job: every caller goes through [`SessionLock`](crate::SessionLock).
#[async_trait]
pub trait Session: Send + Sync + 'static {
	async fn window_handles(&self) -> Result<Vec<WindowHandle>>;

	async fn focused_window(&self) -> Result<WindowHandle>;

	async fn focus_window(&self, window: &WindowHandle) -> Result<()>;

	/// Opens a new window without switching focus to it.
	async fn open_window(&self) -> Result<WindowHandle>;

	/// Navigates the focused window.
	async fn navigate(&self, url: &str) -> Result<()>;

	async fn current_url(&self) -> Result<String>;

	async fn title(&self) -> Result<String>;

	/// Whether at least one element matches, without waiting.
	async fn is_present(&self, selector: &str) -> Result<bool>;

	async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()>;

	async fn click(&self, selector: &str) -> Result<()>;

	async fn send_keys(&self, selector: &str, keys: &str) -> Result<()>;

	async fn text(&self, selector: &str) -> Result<String>;

	/// Ends the whole automation session.
	async fn close(&self) -> Result<()>;
}
