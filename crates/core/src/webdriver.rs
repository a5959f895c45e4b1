//! WebDriver-backed [`Session`] implementation.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use fantoccini::error::CmdError;
use fantoccini::wd::{Capabilities, WindowHandle as WdWindowHandle};
use fantoccini::{Client, ClientBuilder, Locator};
use parking_lot::Mutex;
use serde_json::json;
use tokio::time::{Instant, sleep};

use crate::error::{Error, Result};
use crate::session::{Session, WindowHandle};

const VISIBILITY_POLL: Duration = Duration::from_millis(100);

/// Options for [`WebDriverSession::connect`].
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
	/// Packed wallet extension (.crx) to install into the browser.
	pub extension: Option<PathBuf>,
	/// Pin the browser version the driver should provision.
	pub browser_version: Option<String>,
}

/// The production automation backend: one WebDriver session over a
/// chromedriver-compatible endpoint, with the wallet extension installed.
pub struct WebDriverSession {
	client: Client,
	/// Last window this session switched to, for error attribution.
	focused: Mutex<Option<WindowHandle>>,
}

impl WebDriverSession {
	pub async fn connect(webdriver_url: &str, options: &ConnectOptions) -> Result<Self> {
		let mut chrome_options = serde_json::Map::new();
		if let Some(path) = &options.extension {
			let packed = std::fs::read(path).map_err(Error::backend)?;
			chrome_options.insert("extensions".to_string(), json!([STANDARD.encode(packed)]));
		}

		let mut caps = Capabilities::new();
		caps.insert("browserName".to_string(), json!("chrome"));
		if let Some(version) = &options.browser_version {
			caps.insert("browserVersion".to_string(), json!(version));
		}
		caps.insert("goog:chromeOptions".to_string(), serde_json::Value::Object(chrome_options));

		let client = ClientBuilder::native()
			.capabilities(caps)
			.connect(webdriver_url)
			.await
			.map_err(Error::backend)?;

		Ok(Self {
			client,
			focused: Mutex::new(None),
		})
	}

	fn convert(&self, err: CmdError) -> Error {
		if err.is_no_such_window() {
			let window = self
				.focused
				.lock()
				.clone()
				.unwrap_or_else(|| WindowHandle::new("unknown"));
			Error::WindowGone(window)
		} else {
			Error::backend(err)
		}
	}

	async fn find(&self, selector: &str) -> Result<fantoccini::elements::Element> {
		self.client.find(Locator::Css(selector)).await.map_err(|err| {
			if err.is_no_such_element() {
				Error::ElementNotFound {
					selector: selector.to_string(),
				}
			} else {
				self.convert(err)
			}
		})
	}
}

#[async_trait]
impl Session for WebDriverSession {
	async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
		let windows = self.client.windows().await.map_err(|err| self.convert(err))?;
		Ok(windows.into_iter().map(|window| WindowHandle::new(String::from(window))).collect())
	}

	async fn focused_window(&self) -> Result<WindowHandle> {
		let window = self.client.window().await.map_err(|err| self.convert(err))?;
		Ok(WindowHandle::new(String::from(window)))
	}

	async fn focus_window(&self, window: &WindowHandle) -> Result<()> {
		let handle = WdWindowHandle::try_from(window.as_str().to_string()).map_err(Error::backend)?;
		self.client
			.switch_to_window(handle)
			.await
			.map_err(|err| {
				if err.is_no_such_window() {
					Error::WindowGone(window.clone())
				} else {
					self.convert(err)
				}
			})?;
		*self.focused.lock() = Some(window.clone());
		Ok(())
	}

	async fn open_window(&self) -> Result<WindowHandle> {
		// WebDriver creates the window without switching to it.
		let response = self.client.new_window(false).await.map_err(|err| self.convert(err))?;
		Ok(WindowHandle::new(response.handle))
	}

	async fn navigate(&self, url: &str) -> Result<()> {
		self.client.goto(url).await.map_err(|err| self.convert(err))
	}

	async fn current_url(&self) -> Result<String> {
		let url = self.client.current_url().await.map_err(|err| self.convert(err))?;
		Ok(url.to_string())
	}

	async fn title(&self) -> Result<String> {
		self.client.title().await.map_err(|err| self.convert(err))
	}

	async fn is_present(&self, selector: &str) -> Result<bool> {
		let found = self
			.client
			.find_all(Locator::Css(selector))
			.await
			.map_err(|err| self.convert(err))?;
		Ok(!found.is_empty())
	}

	async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()> {
		let deadline = Instant::now() + timeout;
		loop {
			match self.find(selector).await {
				Ok(element) => {
					if element.is_displayed().await.map_err(|err| self.convert(err))? {
						return Ok(());
					}
				}
				Err(Error::ElementNotFound { .. }) => {}
				Err(err) => return Err(err),
			}
			if Instant::now() >= deadline {
				return Err(Error::Timeout {
					ms: timeout.as_millis() as u64,
					condition: selector.to_string(),
				});
			}
			sleep(VISIBILITY_POLL).await;
		}
	}

	async fn click(&self, selector: &str) -> Result<()> {
		self.find(selector).await?.click().await.map_err(|err| self.convert(err))
	}

	async fn send_keys(&self, selector: &str, keys: &str) -> Result<()> {
		self.find(selector).await?.send_keys(keys).await.map_err(|err| self.convert(err))
	}

	async fn text(&self, selector: &str) -> Result<String> {
		self.find(selector).await?.text().await.map_err(|err| self.convert(err))
	}

	async fn close(&self) -> Result<()> {
		self.client.clone().close().await.map_err(|err| self.convert(err))
	}
}
