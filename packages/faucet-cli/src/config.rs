//! CLI configuration
//!
//! Layers, lowest first: built-in defaults, environment (`.env` included),
//! the deployment file, then explicit flags.

use std::path::PathBuf;

use alloy::primitives::Address;
use clap::Args;
use eyre::Result;
use faucet_rs::config::parse_url;
use faucet_rs::FaucetConfig;

/// Connection flags shared by every subcommand
#[derive(Debug, Clone, Default, Args)]
pub struct ConnectionArgs {
    /// RPC URL (overrides EVM_RPC_URL)
    #[arg(long, global = true)]
    pub rpc_url: Option<String>,

    /// Chain ID (overrides EVM_CHAIN_ID)
    #[arg(long, global = true)]
    pub chain_id: Option<u64>,

    /// Token contract address (overrides TOKEN_ADDRESS)
    #[arg(long, global = true)]
    pub token: Option<Address>,

    /// Faucet contract address (overrides FAUCET_ADDRESS)
    #[arg(long, global = true)]
    pub faucet: Option<Address>,

    /// deployment-addresses.json written by the deploy script
    #[arg(long, global = true)]
    pub deployment: Option<PathBuf>,
}

/// Load configuration from environment and flags
pub fn load(args: &ConnectionArgs) -> Result<FaucetConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!("Loaded .env from {:?}", path);
    }

    let config = FaucetConfig::from_env()?;
    apply_overrides(config, args)
}

/// Apply the deployment file and explicit flags on top of `config`
pub fn apply_overrides(mut config: FaucetConfig, args: &ConnectionArgs) -> Result<FaucetConfig> {
    if let Some(path) = &args.deployment {
        config = config.with_deployment_file(path)?;
    }

    if let Some(url) = &args.rpc_url {
        config.rpc_url = parse_url(url)?;
    }
    if let Some(chain_id) = args.chain_id {
        config.chain_id = chain_id;
    }
    if let Some(token) = args.token {
        config.token_address = token;
    }
    if let Some(faucet) = args.faucet {
        config.faucet_address = faucet;
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_flags_override_defaults() {
        let args = ConnectionArgs {
            rpc_url: Some("http://localhost:8545".to_string()),
            chain_id: Some(31337),
            faucet: Some(Address::repeat_byte(0x22)),
            ..Default::default()
        };

        let config = apply_overrides(FaucetConfig::default(), &args).unwrap();
        assert_eq!(config.rpc_url.as_str(), "http://localhost:8545/");
        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.faucet_address, Address::repeat_byte(0x22));
        assert_eq!(config.token_address, FaucetConfig::default().token_address);
    }

    #[test]
    fn test_flags_win_over_deployment_file() {
        let path = env::temp_dir().join(format!("faucet-cli-deploy-{}.json", std::process::id()));
        std::fs::write(
            &path,
            format!(
                r#"{{"token": "{}", "faucet": "{}"}}"#,
                Address::repeat_byte(0x01),
                Address::repeat_byte(0x02)
            ),
        )
        .unwrap();

        let args = ConnectionArgs {
            deployment: Some(path.clone()),
            token: Some(Address::repeat_byte(0x03)),
            ..Default::default()
        };
        let config = apply_overrides(FaucetConfig::default(), &args).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.token_address, Address::repeat_byte(0x03));
        assert_eq!(config.faucet_address, Address::repeat_byte(0x02));
    }

    #[test]
    fn test_invalid_rpc_url() {
        let args = ConnectionArgs {
            rpc_url: Some("not a url".to_string()),
            ..Default::default()
        };
        assert!(apply_overrides(FaucetConfig::default(), &args).is_err());
    }

    #[test]
    #[serial]
    fn test_env_addresses() {
        env::set_var("FAUCET_ADDRESS", "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512");
        env::set_var("EVM_CHAIN_ID", "31337");

        let config = FaucetConfig::from_env().unwrap();

        env::remove_var("FAUCET_ADDRESS");
        env::remove_var("EVM_CHAIN_ID");

        assert_eq!(
            config.faucet_address,
            "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
                .parse::<Address>()
                .unwrap()
        );
        assert_eq!(config.chain_id, 31337);
    }

    #[test]
    #[serial]
    fn test_env_invalid_chain_id() {
        env::set_var("EVM_CHAIN_ID", "sepolia");
        let result = FaucetConfig::from_env();
        env::remove_var("EVM_CHAIN_ID");

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_env_token_decimals() {
        env::set_var("TOKEN_DECIMALS", "6");
        let config = FaucetConfig::from_env();
        env::remove_var("TOKEN_DECIMALS");

        assert_eq!(config.unwrap().token_decimals, 6);
    }

    #[test]
    #[serial]
    fn test_env_invalid_token_decimals() {
        for value in ["eighteen", "256", "-1"] {
            env::set_var("TOKEN_DECIMALS", value);
            let result = FaucetConfig::from_env();
            env::remove_var("TOKEN_DECIMALS");

            let err = result.unwrap_err();
            assert!(err.to_string().contains("Invalid TOKEN_DECIMALS"), "{}", value);
        }
    }
}
