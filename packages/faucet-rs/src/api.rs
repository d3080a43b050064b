//! Faucet API handle
//!
//! [`FaucetApi`] is the flat method table a front end works against. It is
//! handed to the view explicitly, so view code never reaches into the wallet
//! or contract modules and tests can substitute an in-memory implementation.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;

use crate::client::{ClaimReceipt, FaucetClient};
use crate::config::FaucetConfig;
use crate::error::Result;
use crate::wallet::{connect_wallet, LocalWallet, WalletProvider};

/// Wallet and faucet operations available to a front end
#[async_trait]
pub trait FaucetApi: Send + Sync {
    /// Request wallet authorization and return the active address
    async fn connect_wallet(&self) -> Result<Address>;

    async fn get_balance(&self, account: Address) -> Result<U256>;
    async fn can_claim(&self, account: Address) -> Result<bool>;
    async fn get_remaining_allowance(&self, account: Address) -> Result<U256>;
    async fn is_paused(&self) -> Result<bool>;
    async fn get_last_claim_at(&self, account: Address) -> Result<U256>;
    async fn get_total_claimed(&self, account: Address) -> Result<U256>;
    async fn get_cooldown_time(&self) -> Result<U256>;
    async fn get_max_claim_amount(&self) -> Result<U256>;

    /// Submit a claim and wait for inclusion
    async fn request_tokens(&self) -> Result<ClaimReceipt>;

    /// Forget cached chain bindings
    fn reset(&mut self);
}

/// Wallet provider plus contract client, owned by one front end
pub struct FaucetSession {
    wallet: Option<Arc<dyn WalletProvider>>,
    client: FaucetClient,
}

impl FaucetSession {
    pub fn new(config: &FaucetConfig, wallet: Option<Arc<dyn WalletProvider>>) -> Self {
        let client = FaucetClient::new(config, wallet.clone());
        Self { wallet, client }
    }

    /// Build a session from configuration, using the configured private key
    /// as the wallet provider when present
    pub fn from_config(config: &FaucetConfig) -> Result<Self> {
        let wallet = match &config.private_key {
            Some(key) => {
                let wallet: Arc<dyn WalletProvider> = Arc::new(LocalWallet::from_private_key(key)?);
                Some(wallet)
            }
            None => None,
        };

        Ok(Self::new(config, wallet))
    }

    pub fn client(&self) -> &FaucetClient {
        &self.client
    }

    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }
}

#[async_trait]
impl FaucetApi for FaucetSession {
    async fn connect_wallet(&self) -> Result<Address> {
        Ok(connect_wallet(self.wallet.as_deref()).await?)
    }

    async fn get_balance(&self, account: Address) -> Result<U256> {
        self.client.get_balance(account).await
    }

    async fn can_claim(&self, account: Address) -> Result<bool> {
        self.client.can_claim(account).await
    }

    async fn get_remaining_allowance(&self, account: Address) -> Result<U256> {
        self.client.get_remaining_allowance(account).await
    }

    async fn is_paused(&self) -> Result<bool> {
        self.client.is_paused().await
    }

    async fn get_last_claim_at(&self, account: Address) -> Result<U256> {
        self.client.get_last_claim_at(account).await
    }

    async fn get_total_claimed(&self, account: Address) -> Result<U256> {
        self.client.get_total_claimed(account).await
    }

    async fn get_cooldown_time(&self) -> Result<U256> {
        self.client.get_cooldown_time().await
    }

    async fn get_max_claim_amount(&self) -> Result<U256> {
        self.client.get_max_claim_amount().await
    }

    async fn request_tokens(&self) -> Result<ClaimReceipt> {
        self.client.request_tokens().await
    }

    fn reset(&mut self) {
        self.client.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FaucetError, WalletError};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_session_without_key_has_no_wallet() {
        let session = FaucetSession::from_config(&FaucetConfig::default()).unwrap();
        assert!(!session.has_wallet());

        let err = session.connect_wallet().await.unwrap_err();
        assert_eq!(err, FaucetError::Wallet(WalletError::NoProvider));
    }

    #[tokio::test]
    async fn test_session_with_key_connects() {
        let config = FaucetConfig {
            private_key: Some(TEST_KEY.to_string()),
            ..Default::default()
        };
        let session = FaucetSession::from_config(&config).unwrap();
        let address = session.connect_wallet().await.unwrap();
        assert_eq!(
            address,
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_reset_drops_client_bindings() {
        let config = FaucetConfig {
            rpc_url: "http://localhost:8545".parse().unwrap(),
            private_key: Some(TEST_KEY.to_string()),
            ..Default::default()
        };
        let mut session = FaucetSession::from_config(&config).unwrap();
        session.client().get_provider().await.unwrap();
        assert!(session.client().is_initialized());

        FaucetApi::reset(&mut session);
        assert!(!session.client().is_initialized());
        assert!(session.connect_wallet().await.is_ok());
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        let config = FaucetConfig {
            private_key: Some("0xnope".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            FaucetSession::from_config(&config),
            Err(FaucetError::Config(_))
        ));
    }
}
