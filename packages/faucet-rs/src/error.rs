//! Error types for faucet client operations
//!
//! Failures are returned as values so the front end decides how to surface
//! them. None of them leave the session in an unusable state.

use alloy::primitives::B256;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, FaucetError>;

/// Wallet connection failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("No wallet provider available: configure a private key to connect")]
    NoProvider,

    #[error("Wallet returned no authorized accounts")]
    NoAccounts,

    #[error("Wallet request failed: {0}")]
    Request(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FaucetError {
    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error("Failed to read {call}: {message}")]
    Read { call: &'static str, message: String },

    #[error("Failed to submit {call}: {message}")]
    Transaction { call: &'static str, message: String },

    #[error("{call} transaction reverted: {tx_hash}")]
    Reverted { call: &'static str, tx_hash: B256 },

    #[error("Not connected: connect a wallet first")]
    NotConnected,

    #[error("Claim unavailable: address is not eligible or a claim is already in flight")]
    ClaimUnavailable,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl FaucetError {
    pub(crate) fn read(call: &'static str, err: impl std::fmt::Display) -> Self {
        FaucetError::Read {
            call,
            message: err.to_string(),
        }
    }

    pub(crate) fn transaction(call: &'static str, err: impl std::fmt::Display) -> Self {
        FaucetError::Transaction {
            call,
            message: err.to_string(),
        }
    }
}
