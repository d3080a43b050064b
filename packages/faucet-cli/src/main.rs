//! Token Faucet CLI
//!
//! Connects a configured wallet to the faucet contract, shows eligibility and
//! claims tokens:
//! - faucet status   -> one-shot view of the connected address
//! - faucet claim    -> claim once and print the receipt
//! - faucet watch    -> interactive screen
//! - faucet info     -> faucet and token parameters
//! - faucet pause / unpause -> admin toggle

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, Result};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use faucet_cli::config::{self, ConnectionArgs};
use faucet_cli::render::{render_info, render_view, unix_now, StatusReport};
use faucet_cli::screen::{self, notice, ScreenOptions};
use faucet_rs::{FaucetConfig, FaucetSession, FaucetView};

#[derive(Parser)]
#[command(name = "faucet")]
#[command(about = "ERC-20 token faucet client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    connection: ConnectionArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show balance, allowance and eligibility of the configured wallet
    Status {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Claim tokens once
    Claim {
        /// Print the receipt as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive screen (connect, refresh, claim, disconnect)
    Watch,

    /// Show faucet and token parameters
    Info {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Pause the faucet (admin only)
    Pause,

    /// Resume the faucet (admin only)
    Unpause,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config::load(&cli.connection)?;
    info!(
        rpc = %config.rpc_url,
        chain_id = config.chain_id,
        faucet = %config.faucet_address,
        token = %config.token_address,
        "Configuration loaded"
    );

    match cli.command {
        Commands::Status { json } => status(&config, json).await,
        Commands::Claim { json } => claim(&config, json).await,
        Commands::Watch => watch(&config).await,
        Commands::Info { json } => faucet_info(&config, json).await,
        Commands::Pause => set_paused(&config, true).await,
        Commands::Unpause => set_paused(&config, false).await,
    }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("info,faucet_rs=debug,faucet_cli=debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn new_view(config: &FaucetConfig) -> Result<FaucetView<FaucetSession>> {
    let session = FaucetSession::from_config(config)?;
    Ok(FaucetView::new(session).with_token_decimals(config.token_decimals))
}

async fn status(config: &FaucetConfig, json: bool) -> Result<()> {
    let mut view = new_view(config)?;
    if let Err(e) = view.connect().await {
        bail!(notice(&e));
    }

    let now = unix_now();
    if json {
        let report = StatusReport::from_view(&view, now);
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_view(&view, config.chain_id, now));
    }
    Ok(())
}

async fn claim(config: &FaucetConfig, json: bool) -> Result<()> {
    let mut view = new_view(config)?;
    if let Err(e) = view.connect().await {
        bail!(notice(&e));
    }

    if !view.claim_enabled() {
        let reason = view
            .explanation_message(unix_now())
            .unwrap_or_else(|| "Address is not eligible to claim.".to_string());
        bail!(reason);
    }

    let outcome = view.claim().await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&outcome.receipt)?);
    } else {
        println!("Tokens claimed successfully!");
        println!("Transaction: {}", outcome.receipt.tx_hash);
        if let Some(event) = &outcome.receipt.claimed {
            println!(
                "Amount:      {}",
                faucet_rs::format_token_amount(event.amount, view.token_decimals())
            );
        }
        match outcome.refresh_error {
            Some(e) => eprintln!("Warning: refresh after claim failed: {}", notice(&e)),
            None => print!("{}", render_view(&view, config.chain_id, unix_now())),
        }
    }
    Ok(())
}

async fn watch(config: &FaucetConfig) -> Result<()> {
    let mut view = new_view(config)?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();

    screen::run(&mut view, ScreenOptions::new(config.chain_id), stdin, &mut stdout).await
}

async fn faucet_info(config: &FaucetConfig, json: bool) -> Result<()> {
    let session = FaucetSession::from_config(config)?;
    let info = session.client().get_faucet_info().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        print!("{}", render_info(&info, config.chain_id));
    }
    Ok(())
}

async fn set_paused(config: &FaucetConfig, paused: bool) -> Result<()> {
    let session = FaucetSession::from_config(config)?;
    if !session.has_wallet() {
        bail!("EVM_PRIVATE_KEY is required to {}", if paused { "pause" } else { "unpause" });
    }

    let tx_hash = session.client().set_paused(paused).await?;
    println!(
        "Faucet {} (tx {})",
        if paused { "paused" } else { "resumed" },
        tx_hash
    );
    Ok(())
}
