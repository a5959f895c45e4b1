//! Wire types for the wallet conformance harness protocol.
//!
//! Events flow from the glue toward the harness; commands flow back. Both
//! sides carry the originating window handle as the correlation id, so a
//! command can find "the same" window an event was emitted for.

mod commands;
mod events;

pub use commands::{ActivateChain, Report, Respond, RespondAction, SwitchEthereumChain, WalletCommand};
pub use events::{RequestAccountsEvent, SendTransactionEvent, SignMessageEvent, WalletEvent};
