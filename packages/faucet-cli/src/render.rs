//! Text rendering for the faucet screen

use std::fmt::Write;

use alloy::primitives::Address;
use faucet_rs::{format_token_amount, FaucetApi, FaucetInfo, FaucetView, Snapshot, ViewState};
use serde::Serialize;

const LABEL_WIDTH: usize = 21;

/// Seconds since the unix epoch
pub fn unix_now() -> u64 {
    chrono::Utc::now().timestamp().max(0) as u64
}

/// Human name for the footer
pub fn network_name(chain_id: u64) -> String {
    match chain_id {
        1 => "Ethereum Mainnet".to_string(),
        11_155_111 => "Sepolia Testnet".to_string(),
        31_337 => "Anvil Local".to_string(),
        other => format!("Chain {}", other),
    }
}

fn row(out: &mut String, label: &str, value: impl std::fmt::Display) {
    let _ = writeln!(out, "{:<width$}{}", label, value, width = LABEL_WIDTH);
}

/// Label of the claim button, with its enabled state
pub fn claim_button<A: FaucetApi>(view: &FaucetView<A>) -> String {
    if view.is_claiming() {
        "[ Claiming... ]".to_string()
    } else if view.claim_enabled() {
        "[ Claim Tokens ]".to_string()
    } else {
        "[ Claim Tokens ] (disabled)".to_string()
    }
}

/// Render the single faucet screen
pub fn render_view<A: FaucetApi>(view: &FaucetView<A>, chain_id: u64, now: u64) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Token Faucet");
    let _ = writeln!(out, "============");

    match view.state() {
        ViewState::Disconnected => {
            let _ = writeln!(out, "[ Connect Wallet ]");
        }
        ViewState::Connected { address } => {
            let decimals = view.token_decimals();
            let snapshot = view.snapshot();

            row(&mut out, "Address:", address);
            row(
                &mut out,
                "Balance:",
                format_token_amount(snapshot.balance, decimals),
            );
            row(
                &mut out,
                "Remaining Allowance:",
                format_token_amount(snapshot.allowance, decimals),
            );
            row(
                &mut out,
                "Eligibility:",
                if snapshot.eligible {
                    "Eligible"
                } else {
                    "Not Eligible"
                },
            );

            if let Some(message) = view.explanation_message(now) {
                let _ = writeln!(out, "  {}", message);
            }

            let _ = writeln!(out, "{}", claim_button(view));
        }
    }

    let _ = writeln!(out, "{} - ERC-20 Faucet", network_name(chain_id));
    out
}

/// JSON shape of `faucet status --json`
#[derive(Debug, Serialize)]
pub struct StatusReport<'a> {
    pub address: Address,
    pub snapshot: &'a Snapshot,
    pub claim_enabled: bool,
    pub explanation: Option<String>,
}

impl<'a> StatusReport<'a> {
    /// None while disconnected
    pub fn from_view<A: FaucetApi>(view: &'a FaucetView<A>, now: u64) -> Option<Self> {
        Some(Self {
            address: view.address()?,
            snapshot: view.snapshot(),
            claim_enabled: view.claim_enabled(),
            explanation: view.explanation_message(now),
        })
    }
}

/// Render `faucet info`
pub fn render_info(info: &FaucetInfo, chain_id: u64) -> String {
    let decimals = info.token_decimals;
    let mut out = String::new();
    let _ = writeln!(out, "Token Faucet ({})", network_name(chain_id));
    row(&mut out, "Faucet:", info.faucet_address);
    row(&mut out, "Admin:", info.admin);
    row(
        &mut out,
        "Status:",
        if info.paused { "Paused" } else { "Active" },
    );
    row(
        &mut out,
        "Claim Amount:",
        format!(
            "{} {}",
            format_token_amount(info.faucet_amount, decimals),
            info.token_symbol
        ),
    );
    row(&mut out, "Cooldown:", format!("{}s", info.cooldown_time));
    row(
        &mut out,
        "Lifetime Limit:",
        format!(
            "{} {}",
            format_token_amount(info.max_claim_amount, decimals),
            info.token_symbol
        ),
    );
    row(&mut out, "Token:", info.token_address);
    row(
        &mut out,
        "Total Supply:",
        format!(
            "{} / {} {}",
            format_token_amount(info.token_total_supply, decimals),
            format_token_amount(info.token_max_supply, decimals),
            info.token_symbol
        ),
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;
    use faucet_rs::testing::MockFaucetApi;

    #[test]
    fn test_network_name() {
        assert_eq!(network_name(11_155_111), "Sepolia Testnet");
        assert_eq!(network_name(31_337), "Anvil Local");
        assert_eq!(network_name(56), "Chain 56");
    }

    #[test]
    fn test_render_disconnected() {
        let view = FaucetView::new(MockFaucetApi::without_wallet());
        let text = render_view(&view, 11_155_111, 0);

        assert!(text.contains("[ Connect Wallet ]"));
        assert!(!text.contains("Claim Tokens"));
        assert!(text.contains("Sepolia Testnet - ERC-20 Faucet"));
    }

    #[tokio::test]
    async fn test_render_connected() {
        let mut view = FaucetView::new(MockFaucetApi::new(Address::repeat_byte(0x11)));
        view.api().update(|c| c.balance = U256::from(2_500_000_000_000_000_000u128));
        view.connect().await.unwrap();

        let text = render_view(&view, 31_337, 0);
        assert!(text.contains(&Address::repeat_byte(0x11).to_string()));
        assert!(text.contains("2.5"));
        assert!(!text.contains("Not Eligible"));
        assert!(text.contains("[ Claim Tokens ]\n"));
    }

    #[test]
    fn test_render_info() {
        let info = FaucetInfo {
            faucet_address: Address::repeat_byte(0x01),
            token_address: Address::repeat_byte(0x02),
            admin: Address::repeat_byte(0x03),
            paused: false,
            faucet_amount: U256::from(100_000_000_000_000_000_000u128),
            cooldown_time: U256::from(86_400u64),
            max_claim_amount: U256::from(1_000_000_000_000_000_000_000u128),
            token_symbol: "FTK".to_string(),
            token_decimals: 18,
            token_total_supply: U256::from(300_000_000_000_000_000_000u128),
            token_max_supply: U256::from(1_000_000_000_000_000_000_000_000u128),
        };

        let text = render_info(&info, 11_155_111);
        assert!(text.contains("100 FTK"));
        assert!(text.contains("86400s"));
        assert!(text.contains("1000 FTK"));
        assert!(text.contains("300 / 1000000 FTK"));
        assert!(text.contains("Active"));
    }
}
