//! Window-event correlation engine for driving a wallet browser extension.
//!
//! The wallet under test opens a fresh browser window for every action it
//! wants confirmed (connect accounts, sign a message, send a transaction).
//! This crate discovers those windows, classifies each by the intent declared
//! in its URL, emits one domain event per window toward the conformance
//! harness, and routes harness responses back to the window they target.
//!
//! All UI work funnels through a single [`SessionLock`], so concurrent
//! callers never interleave their interactions with the shared browser
//! session. The [`Session`] trait is the seam toward the automation backend;
//! [`webdriver::WebDriverSession`] is the production implementation and
//! [`testing::FakeSession`] the scriptable test double.

pub mod config;
pub mod driver;
pub mod error;
pub mod lock;
pub mod selectors;
pub mod session;
pub mod testing;
pub mod units;
pub mod webdriver;

pub use config::DriverConfig;
pub use driver::{DriverChannels, WalletDriver};
pub use error::{Error, Result};
pub use lock::SessionLock;
pub use session::{Session, WindowHandle};
