use thiserror::Error;

use crate::session::WindowHandle;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
	/// Expected race: the window closed between discovery and use.
	/// Callers that iterate over windows skip this and keep going.
	#[error("window no longer exists: {0}")]
	WindowGone(WindowHandle),

	#[error("element not found: {selector}")]
	ElementNotFound { selector: String },

	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	/// Declared harness command family without an implementation. Distinct
	/// from other failures so the harness can tell "refused" from "broken".
	#[error("{0} is not implemented")]
	Unimplemented(&'static str),

	#[error("final report already submitted")]
	AlreadyReported,

	#[error("malformed window url: {0}")]
	Url(#[from] url::ParseError),

	#[error("amount parse failed: {0}")]
	Units(#[from] alloy_primitives::utils::UnitsError),

	#[error(transparent)]
	Backend(anyhow::Error),
}

impl Error {
	pub fn backend(err: impl Into<anyhow::Error>) -> Self {
		Self::Backend(err.into())
	}

	pub fn is_window_gone(&self) -> bool {
		matches!(self, Self::WindowGone(_))
	}
}
