//! Error taxonomy for wallet operations

use thiserror::Error;

pub type WalletResult<T> = Result<T, WalletError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WalletError {
    /// The wallet approved the connection but handed back no usable account.
    #[error("wallet '{wallet}' authorized no accounts")]
    NoAccountAuthorized { wallet: String },

    /// None of the recognized signing features is exposed by the wallet.
    #[error("wallet '{wallet}' does not support transaction signing")]
    UnsupportedWallet { wallet: String },

    /// The underlying wallet feature call rejected or threw.
    #[error("{capability} failed: {message}")]
    CapabilityFailure { capability: String, message: String },

    #[error("no wallet connected")]
    NotConnected,

    #[error("execution client error: {0}")]
    Client(String),

    #[error("storage error: {0}")]
    Storage(String),
}

impl WalletError {
    pub fn capability(capability: impl Into<String>, message: impl ToString) -> Self {
        WalletError::CapabilityFailure {
            capability: capability.into(),
            message: message.to_string(),
        }
    }
}
