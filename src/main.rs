// src/main.rs
//! hd-wallet command line entry point.
//! Results go to stdout as JSON; logs go to stderr.
use anyhow::{Context, Result};
use clap::Parser;
use hd_wallet_core::blockchain::explorer::BlockExplorerClient;
use hd_wallet_core::cli::{Cli, Commands};
use hd_wallet_core::core::config::{AppConfig, NetworkParams};
use hd_wallet_core::core::wallet::Wallet;
use hd_wallet_core::security::{redact_body, redact_phrase};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging()?;

    let config = load_config(&cli)?;
    info!(
        "hd-wallet v{} on network '{}'",
        env!("CARGO_PKG_VERSION"),
        config.network.name
    );
    let wallet = Wallet::new(&config)?;

    match cli.command {
        Commands::Generate { bits } => {
            let mut rng = rand::rngs::OsRng;
            print_json(&wallet.generate(&mut rng, bits)?)?;
        }
        Commands::Recover { mnemonic } => {
            debug!("recover {}", redact_phrase(&mnemonic));
            print_json(&wallet.recover(&mnemonic)?)?;
        }
        Commands::Accounts { mnemonic } => {
            debug!("accounts {}", redact_phrase(&mnemonic));
            print_json(&wallet.derive_account_list(&mnemonic)?)?;
        }
        Commands::Subaddress { private_key, chain_code } => {
            debug!("subaddress {}", redact_body(&private_key));
            print_json(&wallet.derive_subaddress(&private_key, chain_code.as_deref())?)?;
        }
        Commands::PrivateKey { mnemonic, address } => {
            debug!("private-key {} for {}", redact_phrase(&mnemonic), address);
            let private_key = wallet.get_private_key_for_address(&mnemonic, &address)?;
            print_json(&serde_json::json!({ "privateKey": private_key }))?;
        }
        Commands::Reverse { address, private_key } => {
            debug!("reverse {} with {}", address, redact_body(&private_key));
            print_json(&wallet.reverse_mnemonic_lookup(&address, &private_key)?)?;
        }
        Commands::History { mnemonic, timeout_secs } => {
            let addresses = wallet.derive_account_list(&mnemonic)?.addresses();
            let client = BlockExplorerClient::new(&config.explorer)?;
            let histories =
                wallet.history(&client, &addresses, Duration::from_secs(timeout_secs)).await;
            print_json(&histories)?;
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// `--config` wins over $HD_WALLET_CONFIG; `--network` wins over both.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AppConfig::from_env()?,
    };
    if let Some(name) = &cli.network {
        config.network = NetworkParams::by_name(name)?;
    }
    config.validate()?;
    Ok(config)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
