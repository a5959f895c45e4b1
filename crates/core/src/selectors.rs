//! CSS selectors for the wallet extension UI.
//!
//! Controls that must be actionable carry a `:not([disabled])` qualifier, so
//! waiting for visibility doubles as waiting for the control to enable.

// Unlock prompt, shown whenever the wallet has re-locked itself.
pub const UNLOCK_INPUT: &str = "[data-testid='unlock-with-password']";

// First-run import flow.
pub const IMPORT_EXISTING_WALLET: &str = "[data-testid='btn-import-existing-wallet']";
pub const IMPORT_RECOVERY_PHRASE: &str = "[data-testid='btn-import-recovery-phrase']";
pub const SECRET_INPUT: &str = "[data-testid='secret-input']";
pub const IMPORT_WALLET: &str = "[data-testid='btn-import-wallet']:not([disabled])";
pub const SET_PASSWORD: &str = "[data-testid='setPassword']";
pub const SET_PASSWORD_VERIFY: &str = "[data-testid='setPasswordVerify']";
pub const TERMS_CHECKBOX: &str = "[data-testid='terms-and-privacy-policy-parent']";
pub const PASSWORD_CONTINUE: &str = "[data-testid='btn-password-continue']:not([disabled])";
// Post-setup landmark: visible once the main wallet view is ready.
pub const NOTIFICATION_BELL: &str = "[data-testid='notification-bell-container']";

// Dapp page.
pub const CONNECT_BUTTON: &str = "#connect";

// Account connection window.
pub const AUTHORIZE_ALLOW: &str = "[data-testid='allow-authorize-button']:not([disabled])";
pub const AUTHORIZE_DENY: &str = "[data-testid='deny-authorize-button']:not([disabled])";

// Message signing window.
pub const MESSAGE_BODY: &str = "[data-testid='sign-message-content']";
pub const MESSAGE_CONFIRM: &str = "[data-testid='confirm-sign-message-button']:not([disabled])";
pub const MESSAGE_CANCEL: &str = "[data-testid='cancel-sign-message-button']:not([disabled])";

// Transaction confirmation window.
pub const TX_RECIPIENT: &str = "[data-testid='transaction-recipient']";
pub const TX_SENDER: &str = "[data-testid='transaction-sender']";
pub const TX_AMOUNT: &str = "[data-testid='transaction-amount']";
pub const TX_CONFIRM: &str = "[data-testid='confirm-transaction-button']:not([disabled])";
pub const TX_CANCEL: &str = "[data-testid='cancel-transaction-button']:not([disabled])";

// Settings surface used by activate-chain.
pub const SETTINGS_LINK: &str = "[data-testid='settings-navigation-link']";
pub const NETWORKS_MENU: &str = "[data-testid='settings-networks-menu-cell-pressable']";
pub const ADD_CUSTOM_NETWORK: &str = "[data-testid='add-custom-network']";
pub const NETWORK_NAME_INPUT: &str = "[data-testid='custom-network-name-input']";
pub const NETWORK_RPC_INPUT: &str = "[data-testid='custom-network-rpc-url-input']";
pub const NETWORK_CHAIN_ID_INPUT: &str = "[data-testid='custom-network-chain-id-input']";
pub const NETWORK_SAVE: &str = "[data-testid='custom-network-save']:not([disabled])";
