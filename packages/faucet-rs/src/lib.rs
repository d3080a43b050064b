//! Faucet-RS: Client Library for the ERC-20 Token Faucet
//!
//! This crate provides everything a front end needs to talk to a deployed
//! `TokenFaucet` / `FaucetToken` contract pair:
//!
//! - **Wallet** - Wallet provider abstraction and account authorization
//! - **Contracts** - Faucet and token bindings generated with alloy's `sol!`
//! - **Client** - Lazily memoized provider, signer and contract bindings with typed reads/writes
//! - **Api** - The `FaucetApi` handle that front ends receive instead of a global
//! - **View** - Connect/refresh/claim state machine and eligibility explanations
//! - **Testing** - In-memory `FaucetApi` for front-end tests
//!
//! Eligibility, cooldown and lifetime limits are decided by the contract. This
//! crate only mirrors them.
//!
//! ## Feature Flags
//!
//! - `testing` - Enable the mock `FaucetApi` for downstream tests

pub mod api;
pub mod client;
pub mod config;
pub mod contracts;
pub mod error;
pub mod tokens;
pub mod view;
pub mod wallet;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api::{FaucetApi, FaucetSession};
pub use client::{ClaimReceipt, FaucetClient, FaucetInfo, TokensClaimedEvent};
pub use config::{DeploymentAddresses, FaucetConfig};
pub use error::{FaucetError, Result, WalletError};
pub use tokens::{format_cooldown, format_token_amount};
pub use view::{claim_enabled, ClaimOutcome, Explanation, FaucetView, Snapshot, ViewState};
pub use wallet::{connect_wallet, LocalWallet, WalletProvider};
