//! Faucet View Model
//!
//! Two states: [`ViewState::Disconnected`] (initial) and
//! [`ViewState::Connected`]. Connecting runs one refresh batch; a successful
//! claim runs another.
//!
//! A refresh issues eight independent reads concurrently and commits them as
//! one [`Snapshot`] only if all succeed. The values are not read atomically,
//! so the local explanation can briefly disagree with the contract's
//! `canClaim`; the contract flag is the one that gates claiming.

use alloy::primitives::{Address, U256};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::FaucetApi;
use crate::client::ClaimReceipt;
use crate::config::DEFAULT_TOKEN_DECIMALS;
use crate::error::{FaucetError, Result};
use crate::tokens::{format_cooldown, format_token_amount, serialize_decimal, to_u64_saturating};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Disconnected,
    Connected { address: Address },
}

/// Contract state mirrored by the last successful refresh
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    #[serde(serialize_with = "serialize_decimal")]
    pub balance: U256,
    pub eligible: bool,
    #[serde(serialize_with = "serialize_decimal")]
    pub allowance: U256,
    pub paused: bool,
    #[serde(serialize_with = "serialize_decimal")]
    pub last_claim_at: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub total_claimed: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub cooldown: U256,
    #[serde(serialize_with = "serialize_decimal")]
    pub max_claim: U256,
}

/// Why the address cannot claim, as far as the mirrored state shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Explanation {
    Paused,
    LifetimeLimit { max_claim: U256 },
    Cooldown { last_claim_at: u64, cooldown: u64 },
}

impl Explanation {
    pub fn message(&self, now: u64, token_decimals: u8) -> String {
        match self {
            Explanation::Paused => "Faucet is paused by admin.".to_string(),
            Explanation::LifetimeLimit { max_claim } => format!(
                "Lifetime limit reached ({} tokens).",
                format_token_amount(*max_claim, token_decimals)
            ),
            Explanation::Cooldown {
                last_claim_at,
                cooldown,
            } => format!(
                "Cooldown: try again in {}.",
                format_cooldown(*last_claim_at, *cooldown, now)
            ),
        }
    }
}

impl Snapshot {
    /// At most one explanation, only when the contract says not eligible.
    ///
    /// Precedence: paused, then lifetime limit, then cooldown. An address
    /// that has reached its lifetime limit and is also inside its cooldown
    /// sees only the limit message, since waiting out the cooldown would not
    /// let it claim. The cooldown case needs a previous claim and a non-zero
    /// cooldown.
    pub fn explanation(&self) -> Option<Explanation> {
        if self.eligible {
            return None;
        }

        if self.paused {
            return Some(Explanation::Paused);
        }

        if self.total_claimed >= self.max_claim {
            return Some(Explanation::LifetimeLimit {
                max_claim: self.max_claim,
            });
        }

        if !self.last_claim_at.is_zero() && !self.cooldown.is_zero() {
            return Some(Explanation::Cooldown {
                last_claim_at: to_u64_saturating(self.last_claim_at),
                cooldown: to_u64_saturating(self.cooldown),
            });
        }

        None
    }
}

/// A confirmed claim. The follow-up refresh can still fail, in which case the
/// previous snapshot stays on screen.
#[derive(Debug, Clone)]
pub struct ClaimOutcome {
    pub receipt: ClaimReceipt,
    pub refresh_error: Option<FaucetError>,
}

/// The claim button is live only for an eligible address with no claim in flight
pub fn claim_enabled(eligible: bool, claiming: bool) -> bool {
    eligible && !claiming
}

/// Connect/refresh/claim state machine over an injected [`FaucetApi`]
pub struct FaucetView<A: FaucetApi> {
    api: A,
    state: ViewState,
    snapshot: Snapshot,
    /// Set by the first successful refresh
    loaded: bool,
    claiming: bool,
    token_decimals: u8,
}

impl<A: FaucetApi> FaucetView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: ViewState::Disconnected,
            snapshot: Snapshot::default(),
            loaded: false,
            claiming: false,
            token_decimals: DEFAULT_TOKEN_DECIMALS,
        }
    }

    pub fn with_token_decimals(mut self, decimals: u8) -> Self {
        self.token_decimals = decimals;
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn address(&self) -> Option<Address> {
        match self.state {
            ViewState::Connected { address } => Some(address),
            ViewState::Disconnected => None,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Whether any refresh has succeeded since connecting
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn token_decimals(&self) -> u8 {
        self.token_decimals
    }

    pub fn is_claiming(&self) -> bool {
        self.claiming
    }

    pub fn claim_enabled(&self) -> bool {
        claim_enabled(self.snapshot.eligible, self.claiming)
    }

    /// Explanation text for the current snapshot. Nothing is explained until
    /// a refresh has succeeded.
    pub fn explanation_message(&self, now: u64) -> Option<String> {
        if !self.loaded {
            return None;
        }
        self.snapshot
            .explanation()
            .map(|e| e.message(now, self.token_decimals))
    }

    /// Connect the wallet, then load the first snapshot.
    ///
    /// A wallet failure leaves the view Disconnected. A failed first refresh
    /// is returned as an error but the view stays Connected with the initial
    /// snapshot, ready for another refresh.
    pub async fn connect(&mut self) -> Result<Address> {
        let address = match self.api.connect_wallet().await {
            Ok(address) => address,
            Err(e) => {
                warn!(error = %e, "Wallet connection failed");
                return Err(e);
            }
        };

        self.state = ViewState::Connected { address };
        info!(address = %address, "View connected");

        self.refresh().await?;
        Ok(address)
    }

    /// Re-read all eight values. On any failure the previous snapshot is kept.
    pub async fn refresh(&mut self) -> Result<()> {
        let address = self.address().ok_or(FaucetError::NotConnected)?;
        let api = &self.api;

        debug!(address = %address, "Refreshing faucet snapshot");

        let result = tokio::try_join!(
            api.get_balance(address),
            api.can_claim(address),
            api.get_remaining_allowance(address),
            api.is_paused(),
            api.get_last_claim_at(address),
            api.get_total_claimed(address),
            api.get_cooldown_time(),
            api.get_max_claim_amount()
        );

        let (balance, eligible, allowance, paused, last_claim_at, total_claimed, cooldown, max_claim) =
            match result {
                Ok(values) => values,
                Err(e) => {
                    warn!(address = %address, error = %e, "Refresh failed, keeping previous snapshot");
                    return Err(e);
                }
            };

        self.snapshot = Snapshot {
            balance,
            eligible,
            allowance,
            paused,
            last_claim_at,
            total_claimed,
            cooldown,
            max_claim,
        };
        self.loaded = true;

        debug!(
            address = %address,
            balance = %balance,
            eligible = eligible,
            paused = paused,
            "Snapshot updated"
        );
        Ok(())
    }

    /// Claim tokens, then refresh.
    ///
    /// The busy flag is set for the duration of the write and cleared on
    /// every path.
    pub async fn claim(&mut self) -> Result<ClaimOutcome> {
        if self.address().is_none() {
            return Err(FaucetError::NotConnected);
        }
        if !self.claim_enabled() {
            return Err(FaucetError::ClaimUnavailable);
        }

        self.claiming = true;
        let result = self.claim_and_refresh().await;
        self.claiming = false;

        result
    }

    async fn claim_and_refresh(&mut self) -> Result<ClaimOutcome> {
        let receipt = match self.api.request_tokens().await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "Claim failed");
                return Err(e);
            }
        };

        let refresh_error = self.refresh().await.err();
        Ok(ClaimOutcome {
            receipt,
            refresh_error,
        })
    }

    /// Drop chain bindings and ask the wallet again.
    ///
    /// The wallet may now report a different account. A wallet failure leaves
    /// the view Disconnected.
    pub async fn reconnect(&mut self) -> Result<Address> {
        self.disconnect();
        self.connect().await
    }

    /// Drop chain bindings and return to the initial state
    pub fn disconnect(&mut self) {
        self.api.reset();
        self.state = ViewState::Disconnected;
        self.snapshot = Snapshot::default();
        self.loaded = false;
        self.claiming = false;
        info!("View disconnected");
    }
}
