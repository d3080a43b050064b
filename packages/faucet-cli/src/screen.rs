//! Interactive faucet screen
//!
//! Redraws the view after every command. Failures are printed as notices and
//! never end the session; only `quit` or end of input does.

use eyre::Result;
use faucet_rs::{FaucetApi, FaucetError, FaucetView, WalletError};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

use crate::render::{render_view, unix_now};

const HELP: &str = "Commands: connect (c), refresh (r), claim (l), disconnect (d), help (h), quit (q)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Connect,
    Refresh,
    Claim,
    Disconnect,
    Help,
    Quit,
}

impl Command {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "c" | "connect" => Some(Command::Connect),
            "r" | "refresh" => Some(Command::Refresh),
            "l" | "claim" => Some(Command::Claim),
            "d" | "disconnect" => Some(Command::Disconnect),
            "h" | "help" | "?" => Some(Command::Help),
            "q" | "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// User-facing text for a failed action
pub fn notice(err: &FaucetError) -> String {
    match err {
        FaucetError::Wallet(WalletError::NoProvider) => {
            "No wallet configured. Set EVM_PRIVATE_KEY to connect.".to_string()
        }
        other => other.to_string(),
    }
}

/// Screen settings
#[derive(Debug, Clone, Copy)]
pub struct ScreenOptions {
    pub chain_id: u64,
    /// Source of the current unix time for cooldown display
    pub clock: fn() -> u64,
}

impl ScreenOptions {
    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            clock: unix_now,
        }
    }
}

/// Run one command against the view and return the notice to show, if any
pub async fn execute<A: FaucetApi>(view: &mut FaucetView<A>, command: Command) -> Option<String> {
    match command {
        Command::Connect if view.address().is_some() => match view.reconnect().await {
            Ok(address) => Some(format!("Reconnected as {}", address)),
            Err(e) => Some(notice(&e)),
        },
        Command::Connect => view.connect().await.err().map(|e| notice(&e)),
        Command::Refresh => view.refresh().await.err().map(|e| notice(&e)),
        Command::Claim => match view.claim().await {
            Ok(outcome) => {
                let mut text = format!("Tokens claimed successfully! (tx {})", outcome.receipt.tx_hash);
                if let Some(e) = outcome.refresh_error {
                    text.push_str(&format!("\nRefresh failed, values may be stale: {}", notice(&e)));
                }
                Some(text)
            }
            Err(e) => Some(notice(&e)),
        },
        Command::Disconnect => {
            view.disconnect();
            None
        }
        Command::Help => Some(HELP.to_string()),
        Command::Quit => None,
    }
}

/// Drive the screen from `input` until quit or end of input
pub async fn run<A, R, W>(
    view: &mut FaucetView<A>,
    options: ScreenOptions,
    input: R,
    output: &mut W,
) -> Result<()>
where
    A: FaucetApi,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();

    loop {
        let screen = render_view(view, options.chain_id, (options.clock)());
        output.write_all(screen.as_bytes()).await?;
        output.write_all(b"> ").await?;
        output.flush().await?;

        let Some(line) = lines.next_line().await? else {
            debug!("Input closed, leaving screen");
            break;
        };

        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = Command::parse(&line) else {
            output
                .write_all(format!("Unknown command: {}\n{}\n", line.trim(), HELP).as_bytes())
                .await?;
            continue;
        };

        if command == Command::Quit {
            break;
        }

        if command == Command::Claim && view.claim_enabled() {
            output.write_all(b"Claiming...\n").await?;
            output.flush().await?;
        }

        if let Some(text) = execute(view, command).await {
            output.write_all(format!("{}\n", text).as_bytes()).await?;
        }
    }

    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("c"), Some(Command::Connect));
        assert_eq!(Command::parse(" CLAIM \n"), Some(Command::Claim));
        assert_eq!(Command::parse("exit"), Some(Command::Quit));
        assert_eq!(Command::parse("withdraw"), None);
    }

    #[test]
    fn test_notice_for_missing_wallet() {
        let text = notice(&FaucetError::Wallet(WalletError::NoProvider));
        assert!(text.contains("EVM_PRIVATE_KEY"));
    }
}
