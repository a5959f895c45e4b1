//! Scriptable [`Session`] double for driver tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::{Instant, sleep};

use crate::error::{Error, Result};
use crate::session::{Session, WindowHandle};

const POLL: Duration = Duration::from_millis(5);

/// One scripted browser window. Elements are keyed by the exact selector
/// string the driver uses; presence implies visibility.
#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
	pub url: String,
	pub title: String,
	pub elements: HashMap<String, String>,
}

impl FakeWindow {
	pub fn with_url(url: impl Into<String>) -> Self {
		Self {
			url: url.into(),
			..Self::default()
		}
	}

	pub fn element(mut self, selector: impl Into<String>, text: impl Into<String>) -> Self {
		self.elements.insert(selector.into(), text.into());
		self
	}
}

#[derive(Default)]
struct FakeState {
	windows: Vec<(WindowHandle, FakeWindow)>,
	focused: Option<WindowHandle>,
	clicks: Vec<(WindowHandle, String)>,
	keys: Vec<(WindowHandle, String, String)>,
	staged_opened: Vec<(WindowHandle, FakeWindow)>,
	spawn_on_click: HashMap<String, Vec<(WindowHandle, FakeWindow)>>,
	closed: bool,
	opened_counter: u64,
}

impl FakeState {
	fn window(&self, handle: &WindowHandle) -> Option<&FakeWindow> {
		self.windows.iter().find(|(h, _)| h == handle).map(|(_, w)| w)
	}

	fn focused_existing(&self) -> Result<(WindowHandle, &FakeWindow)> {
		let handle = self
			.focused
			.clone()
			.ok_or_else(|| Error::backend(anyhow::anyhow!("no focused window")))?;
		match self.window(&handle) {
			Some(window) => Ok((handle, window)),
			None => Err(Error::WindowGone(handle)),
		}
	}
}

/// In-memory browser session with scripted windows.
#[derive(Clone, Default)]
pub struct FakeSession {
	state: Arc<Mutex<FakeState>>,
}

impl FakeSession {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_window(&self, handle: impl Into<WindowHandle>, window: FakeWindow) {
		self.state.lock().windows.push((handle.into(), window));
	}

	pub fn remove_window(&self, handle: &WindowHandle) {
		self.state.lock().windows.retain(|(h, _)| h != handle);
	}

	pub fn focus(&self, handle: impl Into<WindowHandle>) {
		self.state.lock().focused = Some(handle.into());
	}

	/// Next `open_window` call materializes this window.
	pub fn stage_opened_window(&self, handle: impl Into<WindowHandle>, window: FakeWindow) {
		self.state.lock().staged_opened.push((handle.into(), window));
	}

	/// Clicking `selector` makes `window` appear, like a wallet popup.
	pub fn spawn_on_click(
		&self,
		selector: impl Into<String>,
		handle: impl Into<WindowHandle>,
		window: FakeWindow,
	) {
		self.state
			.lock()
			.spawn_on_click
			.entry(selector.into())
			.or_default()
			.push((handle.into(), window));
	}

	pub fn clicks(&self) -> Vec<(WindowHandle, String)> {
		self.state.lock().clicks.clone()
	}

	pub fn keys_sent(&self) -> Vec<(WindowHandle, String, String)> {
		self.state.lock().keys.clone()
	}

	pub fn focused(&self) -> Option<WindowHandle> {
		self.state.lock().focused.clone()
	}

	pub fn is_closed(&self) -> bool {
		self.state.lock().closed
	}
}

#[async_trait]
impl Session for FakeSession {
	async fn window_handles(&self) -> Result<Vec<WindowHandle>> {
		Ok(self.state.lock().windows.iter().map(|(h, _)| h.clone()).collect())
	}

	async fn focused_window(&self) -> Result<WindowHandle> {
		self.state.lock().focused_existing().map(|(handle, _)| handle)
	}

	async fn focus_window(&self, window: &WindowHandle) -> Result<()> {
		let mut state = self.state.lock();
		if state.window(window).is_none() {
			return Err(Error::WindowGone(window.clone()));
		}
		state.focused = Some(window.clone());
		Ok(())
	}

	async fn open_window(&self) -> Result<WindowHandle> {
		let mut state = self.state.lock();
		let (handle, window) = if state.staged_opened.is_empty() {
			state.opened_counter += 1;
			(WindowHandle::new(format!("opened-{}", state.opened_counter)), FakeWindow::default())
		} else {
			state.staged_opened.remove(0)
		};
		state.windows.push((handle.clone(), window));
		Ok(handle)
	}

	async fn navigate(&self, url: &str) -> Result<()> {
		let mut state = self.state.lock();
		let (handle, _) = state.focused_existing()?;
		for (h, window) in &mut state.windows {
			if *h == handle {
				window.url = url.to_string();
			}
		}
		Ok(())
	}

	async fn current_url(&self) -> Result<String> {
		self.state.lock().focused_existing().map(|(_, w)| w.url.clone())
	}

	async fn title(&self) -> Result<String> {
		self.state.lock().focused_existing().map(|(_, w)| w.title.clone())
	}

	async fn is_present(&self, selector: &str) -> Result<bool> {
		let state = self.state.lock();
		let (_, window) = state.focused_existing()?;
		Ok(window.elements.contains_key(selector))
	}

	async fn wait_visible(&self, selector: &str, timeout: Duration) -> Result<()> {
		let deadline = Instant::now() + timeout;
		loop {
			if self.is_present(selector).await? {
				return Ok(());
			}
			if Instant::now() >= deadline {
				return Err(Error::Timeout {
					ms: timeout.as_millis() as u64,
					condition: selector.to_string(),
				});
			}
			sleep(POLL).await;
		}
	}

	async fn click(&self, selector: &str) -> Result<()> {
		let mut guard = self.state.lock();
		let state = &mut *guard;
		let (handle, present) = {
			let (handle, window) = state.focused_existing()?;
			(handle, window.elements.contains_key(selector))
		};
		if !present {
			return Err(Error::ElementNotFound {
				selector: selector.to_string(),
			});
		}
		state.clicks.push((handle, selector.to_string()));
		let spawned = state
			.spawn_on_click
			.get_mut(selector)
			.filter(|spawns| !spawns.is_empty())
			.map(|spawns| spawns.remove(0));
		if let Some((handle, window)) = spawned {
			state.windows.push((handle, window));
		}
		Ok(())
	}

	async fn send_keys(&self, selector: &str, keys: &str) -> Result<()> {
		let mut state = self.state.lock();
		let (handle, window) = state.focused_existing()?;
		if !window.elements.contains_key(selector) {
			return Err(Error::ElementNotFound {
				selector: selector.to_string(),
			});
		}
		state.keys.push((handle, selector.to_string(), keys.to_string()));
		Ok(())
	}

	async fn text(&self, selector: &str) -> Result<String> {
		let state = self.state.lock();
		let (_, window) = state.focused_existing()?;
		window.elements.get(selector).cloned().ok_or_else(|| Error::ElementNotFound {
			selector: selector.to_string(),
		})
	}

	async fn close(&self) -> Result<()> {
		self.state.lock().closed = true;
		Ok(())
	}
}
