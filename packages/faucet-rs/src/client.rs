//! Faucet Contract Client
//!
//! Single point of truth for chain connectivity and contract bindings.
//!
//! The provider, signer and both contract bindings are built on first use and
//! memoized for the lifetime of the client. Nothing invalidates them
//! automatically: when the active account or network changes, call
//! [`FaucetClient::reset`] and the next call rebuilds everything.
//!
//! # Transaction Building
//!
//! Writes layer `with_recommended_fillers()` and the wallet filler over the
//! memoized provider, so nonce, gas and fees come from the node and the
//! wallet. There is no local retry or gas override.

use std::sync::Arc;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, B256, U256},
    providers::{ProviderBuilder, RootProvider},
    rpc::types::TransactionReceipt,
    transports::http::{Client, Http},
};
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use url::Url;

use crate::config::FaucetConfig;
use crate::contracts::{FaucetToken, TokenFaucet};
use crate::error::{FaucetError, Result, WalletError};
use crate::tokens::serialize_decimal;
use crate::wallet::WalletProvider;

pub type HttpProvider = RootProvider<Http<Client>>;
pub type TokenContract = FaucetToken::FaucetTokenInstance<Http<Client>, HttpProvider>;
pub type FaucetContract = TokenFaucet::TokenFaucetInstance<Http<Client>, HttpProvider>;

/// Decoded `TokensClaimed(user, amount, timestamp)` event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokensClaimedEvent {
    pub user: Address,
    #[serde(serialize_with = "serialize_decimal")]
    pub amount: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub timestamp: U256,
}

/// Result of a confirmed faucet transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClaimReceipt {
    pub tx_hash: B256,
    pub block_number: Option<u64>,
    /// Present when the receipt carries a `TokensClaimed` log
    pub claimed: Option<TokensClaimedEvent>,
}

impl ClaimReceipt {
    fn from_receipt(receipt: &TransactionReceipt) -> Self {
        let claimed = receipt.inner.logs().iter().find_map(|log| {
            log.log_decode::<TokenFaucet::TokensClaimed>()
                .ok()
                .map(|decoded| {
                    let event = decoded.inner.data;
                    TokensClaimedEvent {
                        user: event.user,
                        amount: event.amount,
                        timestamp: event.timestamp,
                    }
                })
        });

        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            claimed,
        }
    }
}

/// Faucet-wide constants and token metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaucetInfo {
    pub faucet_address: Address,
    pub token_address: Address,
    pub admin: Address,
    pub paused: bool,
    #[serde(serialize_with = "serialize_decimal")]
    pub faucet_amount: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub cooldown_time: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub max_claim_amount: U256,
    pub token_symbol: String,
    pub token_decimals: u8,
    #[serde(serialize_with = "serialize_decimal")]
    pub token_total_supply: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub token_max_supply: U256,
}

/// Lazily connected faucet/token client
pub struct FaucetClient {
    rpc_url: Url,
    chain_id: u64,
    token_address: Address,
    faucet_address: Address,
    wallet: Option<Arc<dyn WalletProvider>>,

    provider: OnceCell<HttpProvider>,
    signer: OnceCell<EthereumWallet>,
    token: OnceCell<TokenContract>,
    faucet: OnceCell<FaucetContract>,
}

impl FaucetClient {
    /// Create a client. Nothing touches the network until the first call.
    pub fn new(config: &FaucetConfig, wallet: Option<Arc<dyn WalletProvider>>) -> Self {
        Self {
            rpc_url: config.rpc_url.clone(),
            chain_id: config.chain_id,
            token_address: config.token_address,
            faucet_address: config.faucet_address,
            wallet,
            provider: OnceCell::new(),
            signer: OnceCell::new(),
            token: OnceCell::new(),
            faucet: OnceCell::new(),
        }
    }

    pub fn token_address(&self) -> Address {
        self.token_address
    }

    pub fn faucet_address(&self) -> Address {
        self.faucet_address
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Drop every memoized binding; the next call rebuilds them
    pub fn reset(&mut self) {
        self.provider = OnceCell::new();
        self.signer = OnceCell::new();
        self.token = OnceCell::new();
        self.faucet = OnceCell::new();
        debug!("Faucet client bindings reset");
    }

    /// Whether the provider has been built yet
    pub fn is_initialized(&self) -> bool {
        self.provider.initialized()
    }

    // =========================================================================
    // Memoized bindings
    // =========================================================================

    pub async fn get_provider(&self) -> Result<&HttpProvider> {
        self.provider
            .get_or_try_init(|| async {
                let provider = ProviderBuilder::new().on_http(self.rpc_url.clone());
                info!(
                    rpc_url = %self.rpc_url,
                    chain_id = self.chain_id,
                    "Created faucet RPC provider"
                );
                Ok::<_, FaucetError>(provider)
            })
            .await
    }

    pub async fn get_signer(&self) -> Result<&EthereumWallet> {
        self.signer
            .get_or_try_init(|| async {
                let wallet = self.wallet.as_ref().ok_or(WalletError::NoProvider)?;
                let signer = wallet.wallet();
                debug!("Signer initialized from wallet provider");
                Ok::<_, FaucetError>(signer)
            })
            .await
    }

    pub async fn get_token_contract(&self) -> Result<&TokenContract> {
        self.token
            .get_or_try_init(|| async {
                let provider = self.get_provider().await?.clone();
                debug!(token = %self.token_address, "Token binding created");
                Ok::<_, FaucetError>(FaucetToken::new(self.token_address, provider))
            })
            .await
    }

    pub async fn get_faucet_contract(&self) -> Result<&FaucetContract> {
        self.faucet
            .get_or_try_init(|| async {
                let provider = self.get_provider().await?.clone();
                debug!(faucet = %self.faucet_address, "Faucet binding created");
                Ok::<_, FaucetError>(TokenFaucet::new(self.faucet_address, provider))
            })
            .await
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Token balance of an account
    pub async fn get_balance(&self, account: Address) -> Result<U256> {
        let token = self.get_token_contract().await?;
        let result = token
            .balanceOf(account)
            .call()
            .await
            .map_err(|e| FaucetError::read("balanceOf", e))?;
        debug!(account = %account, balance = %result._0, "Read balance");
        Ok(result._0)
    }

    /// Contract-computed eligibility
    pub async fn can_claim(&self, account: Address) -> Result<bool> {
        let faucet = self.get_faucet_contract().await?;
        let result = faucet
            .canClaim(account)
            .call()
            .await
            .map_err(|e| FaucetError::read("canClaim", e))?;
        debug!(account = %account, eligible = result._0, "Read eligibility");
        Ok(result._0)
    }

    pub async fn get_remaining_allowance(&self, account: Address) -> Result<U256> {
        let faucet = self.get_faucet_contract().await?;
        let result = faucet
            .remainingAllowance(account)
            .call()
            .await
            .map_err(|e| FaucetError::read("remainingAllowance", e))?;
        Ok(result._0)
    }

    pub async fn is_paused(&self) -> Result<bool> {
        let faucet = self.get_faucet_contract().await?;
        let result = faucet
            .isPaused()
            .call()
            .await
            .map_err(|e| FaucetError::read("isPaused", e))?;
        Ok(result._0)
    }

    /// Unix timestamp of the account's last claim, 0 if never claimed
    pub async fn get_last_claim_at(&self, account: Address) -> Result<U256> {
        let faucet = self.get_faucet_contract().await?;
        let result = faucet
            .lastClaimAt(account)
            .call()
            .await
            .map_err(|e| FaucetError::read("lastClaimAt", e))?;
        Ok(result._0)
    }

    pub async fn get_total_claimed(&self, account: Address) -> Result<U256> {
        let faucet = self.get_faucet_contract().await?;
        let result = faucet
            .totalClaimed(account)
            .call()
            .await
            .map_err(|e| FaucetError::read("totalClaimed", e))?;
        Ok(result._0)
    }

    /// Cooldown between claims, in seconds
    pub async fn get_cooldown_time(&self) -> Result<U256> {
        let faucet = self.get_faucet_contract().await?;
        let result = faucet
            .COOLDOWN_TIME()
            .call()
            .await
            .map_err(|e| FaucetError::read("COOLDOWN_TIME", e))?;
        Ok(result._0)
    }

    /// Lifetime claim cap per account, in raw token units
    pub async fn get_max_claim_amount(&self) -> Result<U256> {
        let faucet = self.get_faucet_contract().await?;
        let result = faucet
            .MAX_CLAIM_AMOUNT()
            .call()
            .await
            .map_err(|e| FaucetError::read("MAX_CLAIM_AMOUNT", e))?;
        Ok(result._0)
    }

    /// Faucet constants and token metadata, read concurrently
    pub async fn get_faucet_info(&self) -> Result<FaucetInfo> {
        let faucet = self.get_faucet_contract().await?;
        let token = self.get_token_contract().await?;

        let (
            admin,
            paused,
            faucet_amount,
            cooldown_time,
            max_claim_amount,
            token_symbol,
            token_decimals,
            token_total_supply,
            token_max_supply,
        ) = tokio::try_join!(
            async {
                faucet
                    .admin()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| FaucetError::read("admin", e))
            },
            self.is_paused(),
            async {
                faucet
                    .FAUCET_AMOUNT()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| FaucetError::read("FAUCET_AMOUNT", e))
            },
            self.get_cooldown_time(),
            self.get_max_claim_amount(),
            async {
                token
                    .symbol()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| FaucetError::read("symbol", e))
            },
            async {
                token
                    .decimals()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| FaucetError::read("decimals", e))
            },
            async {
                token
                    .totalSupply()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| FaucetError::read("totalSupply", e))
            },
            async {
                token
                    .MAX_SUPPLY()
                    .call()
                    .await
                    .map(|r| r._0)
                    .map_err(|e| FaucetError::read("MAX_SUPPLY", e))
            }
        )?;

        Ok(FaucetInfo {
            faucet_address: self.faucet_address,
            token_address: self.token_address,
            admin,
            paused,
            faucet_amount,
            cooldown_time,
            max_claim_amount,
            token_symbol,
            token_decimals,
            token_total_supply,
            token_max_supply,
        })
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Submit `requestTokens()` and wait for inclusion
    pub async fn request_tokens(&self) -> Result<ClaimReceipt> {
        let wallet = self.get_signer().await?.clone();
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_provider(self.get_provider().await?.clone());

        let faucet = TokenFaucet::new(self.faucet_address, &provider);

        debug!(faucet = %self.faucet_address, "Submitting requestTokens");

        let pending_tx = faucet
            .requestTokens()
            .send()
            .await
            .map_err(|e| FaucetError::transaction("requestTokens", e))?;

        let tx_hash = *pending_tx.tx_hash();
        info!(tx_hash = %tx_hash, "Claim transaction sent");

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| FaucetError::transaction("requestTokens", e))?;

        if !receipt.status() {
            warn!(tx_hash = %tx_hash, "Claim transaction reverted");
            return Err(FaucetError::Reverted {
                call: "requestTokens",
                tx_hash,
            });
        }

        let claim = ClaimReceipt::from_receipt(&receipt);
        info!(
            tx_hash = %tx_hash,
            block = ?claim.block_number,
            amount = ?claim.claimed.as_ref().map(|c| c.amount),
            "Tokens claimed"
        );

        Ok(claim)
    }

    /// Pause or resume the faucet. The contract rejects non-admin callers.
    pub async fn set_paused(&self, paused: bool) -> Result<B256> {
        let wallet = self.get_signer().await?.clone();
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_provider(self.get_provider().await?.clone());

        let faucet = TokenFaucet::new(self.faucet_address, &provider);

        let pending_tx = faucet
            .setPaused(paused)
            .send()
            .await
            .map_err(|e| FaucetError::transaction("setPaused", e))?;

        let tx_hash = *pending_tx.tx_hash();
        info!(tx_hash = %tx_hash, paused = paused, "setPaused transaction sent");

        let receipt = pending_tx
            .get_receipt()
            .await
            .map_err(|e| FaucetError::transaction("setPaused", e))?;

        if !receipt.status() {
            return Err(FaucetError::Reverted {
                call: "setPaused",
                tx_hash,
            });
        }

        let emitted = receipt
            .inner
            .logs()
            .iter()
            .any(|log| log.log_decode::<TokenFaucet::FaucetPaused>().is_ok());
        if !emitted {
            warn!(tx_hash = %tx_hash, "setPaused confirmed without a FaucetPaused event");
        }

        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::LocalWallet;

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn local_config() -> FaucetConfig {
        FaucetConfig {
            rpc_url: "http://localhost:8545".parse().unwrap(),
            chain_id: 31337,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bindings_are_memoized() {
        let client = FaucetClient::new(&local_config(), None);
        assert!(!client.is_initialized());

        // Building an HTTP provider does not touch the network
        let first = client.get_faucet_contract().await.unwrap() as *const FaucetContract;
        let second = client.get_faucet_contract().await.unwrap() as *const FaucetContract;
        assert_eq!(first, second);
        assert!(client.is_initialized());

        let token = client.get_token_contract().await.unwrap();
        assert_eq!(*token.address(), client.token_address());
    }

    #[tokio::test]
    async fn test_reset_drops_bindings() {
        let mut client = FaucetClient::new(&local_config(), None);
        client.get_provider().await.unwrap();
        assert!(client.is_initialized());

        client.reset();
        assert!(!client.is_initialized());
    }

    #[tokio::test]
    async fn test_signer_requires_wallet() {
        let client = FaucetClient::new(&local_config(), None);
        let err = client.get_signer().await.unwrap_err();
        assert_eq!(err, FaucetError::Wallet(WalletError::NoProvider));
    }

    #[tokio::test]
    async fn test_request_tokens_without_wallet_fails_before_sending() {
        let client = FaucetClient::new(&local_config(), None);
        let err = client.request_tokens().await.unwrap_err();
        assert_eq!(err, FaucetError::Wallet(WalletError::NoProvider));
    }

    #[tokio::test]
    async fn test_signer_from_local_wallet() {
        let wallet = LocalWallet::from_private_key(TEST_KEY).unwrap();
        let client = FaucetClient::new(&local_config(), Some(Arc::new(wallet)));
        assert!(client.get_signer().await.is_ok());
    }
}
