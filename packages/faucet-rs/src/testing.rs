//! In-memory faucet for front-end tests
//!
//! [`MockFaucetApi`] implements [`FaucetApi`] over a [`MockChain`] that
//! tests mutate directly. Every call is recorded so tests can assert which
//! reads a refresh issued.

use std::sync::{Mutex, MutexGuard};

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::api::FaucetApi;
use crate::client::{ClaimReceipt, TokensClaimedEvent};
use crate::error::{FaucetError, Result, WalletError};

/// Default claim size (100 tokens, 18 decimals)
pub const MOCK_FAUCET_AMOUNT: u128 = 100_000_000_000_000_000_000;
/// Default lifetime cap (1000 tokens, 18 decimals)
pub const MOCK_MAX_CLAIM: u128 = 1_000_000_000_000_000_000_000;
/// Default cooldown (24 hours)
pub const MOCK_COOLDOWN: u64 = 86_400;

/// Contract state served by the mock
#[derive(Debug, Clone)]
pub struct MockChain {
    pub balance: U256,
    pub eligible: bool,
    pub allowance: U256,
    pub paused: bool,
    pub last_claim_at: U256,
    pub total_claimed: U256,
    pub cooldown: U256,
    pub max_claim: U256,
    pub faucet_amount: U256,
    /// Block timestamp used for successful claims
    pub now: u64,
    /// Name of a read that fails (e.g. "canClaim")
    pub failing_read: Option<&'static str>,
    /// Revert reason returned by requestTokens
    pub failing_claim: Option<String>,
    /// Read that starts failing once a claim succeeds
    pub fail_read_after_claim: Option<&'static str>,
}

impl Default for MockChain {
    fn default() -> Self {
        Self {
            balance: U256::ZERO,
            eligible: true,
            allowance: U256::from(MOCK_MAX_CLAIM),
            paused: false,
            last_claim_at: U256::ZERO,
            total_claimed: U256::ZERO,
            cooldown: U256::from(MOCK_COOLDOWN),
            max_claim: U256::from(MOCK_MAX_CLAIM),
            faucet_amount: U256::from(MOCK_FAUCET_AMOUNT),
            now: 1_700_000_000,
            failing_read: None,
            failing_claim: None,
            fail_read_after_claim: None,
        }
    }
}

/// Mock wallet + faucet
pub struct MockFaucetApi {
    account: Option<Address>,
    chain: Mutex<MockChain>,
    calls: Mutex<Vec<&'static str>>,
    resets: Mutex<usize>,
}

impl MockFaucetApi {
    /// Mock whose wallet authorizes `account`
    pub fn new(account: Address) -> Self {
        Self::with_chain(Some(account), MockChain::default())
    }

    /// Mock with no wallet provider
    pub fn without_wallet() -> Self {
        Self::with_chain(None, MockChain::default())
    }

    pub fn with_chain(account: Option<Address>, chain: MockChain) -> Self {
        Self {
            account,
            chain: Mutex::new(chain),
            calls: Mutex::new(Vec::new()),
            resets: Mutex::new(0),
        }
    }

    /// Mutate the served contract state
    pub fn update(&self, f: impl FnOnce(&mut MockChain)) {
        f(&mut lock(&self.chain));
    }

    pub fn chain(&self) -> MockChain {
        lock(&self.chain).clone()
    }

    /// Recorded calls, in order
    pub fn calls(&self) -> Vec<&'static str> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        lock(&self.calls).iter().filter(|c| **c == name).count()
    }

    pub fn clear_calls(&self) {
        lock(&self.calls).clear();
    }

    pub fn reset_count(&self) -> usize {
        *lock(&self.resets)
    }

    fn read<T>(&self, call: &'static str, f: impl FnOnce(&MockChain) -> T) -> Result<T> {
        lock(&self.calls).push(call);
        let chain = lock(&self.chain);
        if chain.failing_read == Some(call) {
            return Err(FaucetError::Read {
                call,
                message: "mock read failure".to_string(),
            });
        }
        Ok(f(&chain))
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl FaucetApi for MockFaucetApi {
    async fn connect_wallet(&self) -> Result<Address> {
        lock(&self.calls).push("connectWallet");
        Ok(self.account.ok_or(WalletError::NoProvider)?)
    }

    async fn get_balance(&self, _account: Address) -> Result<U256> {
        self.read("balanceOf", |c| c.balance)
    }

    async fn can_claim(&self, _account: Address) -> Result<bool> {
        self.read("canClaim", |c| c.eligible)
    }

    async fn get_remaining_allowance(&self, _account: Address) -> Result<U256> {
        self.read("remainingAllowance", |c| c.allowance)
    }

    async fn is_paused(&self) -> Result<bool> {
        self.read("isPaused", |c| c.paused)
    }

    async fn get_last_claim_at(&self, _account: Address) -> Result<U256> {
        self.read("lastClaimAt", |c| c.last_claim_at)
    }

    async fn get_total_claimed(&self, _account: Address) -> Result<U256> {
        self.read("totalClaimed", |c| c.total_claimed)
    }

    async fn get_cooldown_time(&self) -> Result<U256> {
        self.read("COOLDOWN_TIME", |c| c.cooldown)
    }

    async fn get_max_claim_amount(&self) -> Result<U256> {
        self.read("MAX_CLAIM_AMOUNT", |c| c.max_claim)
    }

    async fn request_tokens(&self) -> Result<ClaimReceipt> {
        lock(&self.calls).push("requestTokens");
        let user = self.account.ok_or(WalletError::NoProvider)?;

        let mut chain = lock(&self.chain);
        if let Some(reason) = &chain.failing_claim {
            return Err(FaucetError::Transaction {
                call: "requestTokens",
                message: reason.clone(),
            });
        }

        let amount = chain.faucet_amount;
        chain.balance += amount;
        chain.total_claimed += amount;
        chain.allowance = chain.max_claim.saturating_sub(chain.total_claimed);
        chain.last_claim_at = U256::from(chain.now);
        chain.eligible = false;
        if let Some(call) = chain.fail_read_after_claim.take() {
            chain.failing_read = Some(call);
        }

        Ok(ClaimReceipt {
            tx_hash: B256::repeat_byte(0xab),
            block_number: Some(1),
            claimed: Some(TokensClaimedEvent {
                user,
                amount,
                timestamp: U256::from(chain.now),
            }),
        })
    }

    fn reset(&mut self) {
        *lock(&self.resets) += 1;
    }
}
