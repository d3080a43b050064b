//! Faucet client configuration

use alloy::primitives::{address, Address};
use serde::Deserialize;
use std::env;
use std::path::Path;
use std::str::FromStr;
use url::Url;

use crate::error::{FaucetError, Result};

/// Fallback token address when `TOKEN_ADDRESS` is not set
pub const DEFAULT_TOKEN_ADDRESS: Address = address!("890366DDF2aCA587bC8C65988CdA170D660C6a00");
/// Fallback faucet address when `FAUCET_ADDRESS` is not set
pub const DEFAULT_FAUCET_ADDRESS: Address = address!("5887f06ac93Fe10Ee2A2b08f9460837508054747");
/// Sepolia public RPC
pub const DEFAULT_RPC_URL: &str = "https://ethereum-sepolia-rpc.publicnode.com";
/// Sepolia chain ID
pub const DEFAULT_CHAIN_ID: u64 = 11_155_111;
pub const DEFAULT_TOKEN_DECIMALS: u8 = 18;

/// Faucet client configuration
#[derive(Clone)]
pub struct FaucetConfig {
    /// RPC URL (e.g., "http://localhost:8545")
    pub rpc_url: Url,
    /// Chain ID
    pub chain_id: u64,
    /// FaucetToken contract address
    pub token_address: Address,
    /// TokenFaucet contract address
    pub faucet_address: Address,
    /// Decimals used when displaying token amounts
    pub token_decimals: u8,
    /// Private key for the local wallet (None means no wallet provider)
    pub private_key: Option<String>,
}

/// Addresses written by the deployment script (`deployment-addresses.json`)
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentAddresses {
    pub token: Address,
    pub faucet: Address,
}

impl DeploymentAddresses {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            FaucetError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            FaucetError::Config(format!("Invalid deployment file {}: {}", path.display(), e))
        })
    }
}

impl Default for FaucetConfig {
    fn default() -> Self {
        Self {
            rpc_url: Url::parse(DEFAULT_RPC_URL).expect("default RPC URL is valid"),
            chain_id: DEFAULT_CHAIN_ID,
            token_address: DEFAULT_TOKEN_ADDRESS,
            faucet_address: DEFAULT_FAUCET_ADDRESS,
            token_decimals: DEFAULT_TOKEN_DECIMALS,
            private_key: None,
        }
    }
}

impl FaucetConfig {
    /// Load configuration from environment, falling back to the built-in defaults
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let rpc_url = match env::var("EVM_RPC_URL") {
            Ok(v) => parse_url(&v)?,
            Err(_) => defaults.rpc_url,
        };

        let chain_id = match env::var("EVM_CHAIN_ID") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| FaucetError::Config(format!("Invalid EVM_CHAIN_ID: {}", v)))?,
            Err(_) => defaults.chain_id,
        };

        let token_address = match env::var("TOKEN_ADDRESS") {
            Ok(v) => parse_address("TOKEN_ADDRESS", &v)?,
            Err(_) => defaults.token_address,
        };

        let faucet_address = match env::var("FAUCET_ADDRESS") {
            Ok(v) => parse_address("FAUCET_ADDRESS", &v)?,
            Err(_) => defaults.faucet_address,
        };

        let token_decimals = match env::var("TOKEN_DECIMALS") {
            Ok(v) => v
                .trim()
                .parse()
                .map_err(|_| FaucetError::Config(format!("Invalid TOKEN_DECIMALS: {}", v)))?,
            Err(_) => defaults.token_decimals,
        };

        let private_key = env::var("EVM_PRIVATE_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        Ok(Self {
            rpc_url,
            chain_id,
            token_address,
            faucet_address,
            token_decimals,
            private_key,
        })
    }

    /// Override both contract addresses with a deployment file
    pub fn with_deployment_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let deployed = DeploymentAddresses::load(path)?;
        self.token_address = deployed.token;
        self.faucet_address = deployed.faucet;
        Ok(self)
    }
}

impl std::fmt::Debug for FaucetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaucetConfig")
            .field("rpc_url", &self.rpc_url.as_str())
            .field("chain_id", &self.chain_id)
            .field("token_address", &self.token_address)
            .field("faucet_address", &self.faucet_address)
            .field("token_decimals", &self.token_decimals)
            .field(
                "private_key",
                &self.private_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

pub fn parse_url(value: &str) -> Result<Url> {
    value
        .trim()
        .parse()
        .map_err(|e| FaucetError::Config(format!("Invalid RPC URL {}: {}", value, e)))
}

pub fn parse_address(name: &str, value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|e| FaucetError::Config(format!("Invalid {}: {}", name, e)))
}
