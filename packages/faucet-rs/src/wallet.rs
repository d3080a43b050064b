//! Wallet Connector
//!
//! A [`WalletProvider`] stands in for the injected browser wallet: it
//! authorizes accounts and hands out the signer used for transactions.

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{FaucetError, Result, WalletError};

/// Source of authorized accounts and their signer
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Request account authorization. The first entry is the active account.
    async fn request_accounts(&self) -> std::result::Result<Vec<Address>, WalletError>;

    /// Wallet that signs for the active account
    fn wallet(&self) -> EthereumWallet;
}

/// Wallet provider backed by a local private key
#[derive(Clone)]
pub struct LocalWallet {
    signer: PrivateKeySigner,
}

impl LocalWallet {
    /// Create from a hex private key (with or without 0x prefix)
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .map_err(|e| FaucetError::Config(format!("Invalid private key: {}", e)))?;

        Ok(Self { signer })
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalWallet")
            .field("address", &self.signer.address())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WalletProvider for LocalWallet {
    async fn request_accounts(&self) -> std::result::Result<Vec<Address>, WalletError> {
        Ok(vec![self.signer.address()])
    }

    fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

/// Connect to the wallet and return the first authorized address.
///
/// No provider is a precondition failure. Calling again re-requests
/// authorization; nothing is retried.
pub async fn connect_wallet(
    provider: Option<&dyn WalletProvider>,
) -> std::result::Result<Address, WalletError> {
    let provider = provider.ok_or(WalletError::NoProvider)?;

    debug!("Requesting wallet accounts");
    let accounts = provider.request_accounts().await?;
    let address = accounts.first().copied().ok_or(WalletError::NoAccounts)?;

    info!(address = %address, "Wallet connected");
    Ok(address)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil account #0
    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    struct EmptyWallet;

    #[async_trait]
    impl WalletProvider for EmptyWallet {
        async fn request_accounts(&self) -> std::result::Result<Vec<Address>, WalletError> {
            Ok(vec![])
        }

        fn wallet(&self) -> EthereumWallet {
            let signer: PrivateKeySigner = TEST_KEY.parse().unwrap();
            EthereumWallet::from(signer)
        }
    }

    #[tokio::test]
    async fn test_connect_without_provider() {
        let result = connect_wallet(None).await;
        assert_eq!(result, Err(WalletError::NoProvider));
    }

    #[tokio::test]
    async fn test_connect_local_wallet() {
        let wallet = LocalWallet::from_private_key(TEST_KEY).unwrap();
        let address = connect_wallet(Some(&wallet)).await.unwrap();
        assert_eq!(
            address,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_connect_no_accounts() {
        let result = connect_wallet(Some(&EmptyWallet)).await;
        assert_eq!(result, Err(WalletError::NoAccounts));
    }

    #[test]
    fn test_invalid_private_key() {
        let err = LocalWallet::from_private_key("not-a-key").unwrap_err();
        assert!(matches!(err, FaucetError::Config(_)));
    }

    #[test]
    fn test_debug_hides_key() {
        let wallet = LocalWallet::from_private_key(TEST_KEY).unwrap();
        let printed = format!("{:?}", wallet);
        assert!(!printed.contains("ac0974bec"));
    }
}
