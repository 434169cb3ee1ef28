use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// HD wallet CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(
    name = "hd-wallet",
    about = "Deterministic HD wallet key derivation",
    version,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// TOML config file (defaults to $HD_WALLET_CONFIG)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Network profile: custom, bitcoin or testnet
    #[arg(long, global = true)]
    pub network: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create a new wallet
    Generate {
        /// Entropy strength: 128, 160, 192, 224 or 256
        #[arg(long)]
        bits: Option<usize>,
    },
    /// Key and address of the first account of a phrase
    Recover {
        #[arg(long, env = "HD_WALLET_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
    },
    /// List the first accounts of a phrase
    Accounts {
        #[arg(long, env = "HD_WALLET_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
    },
    /// Address at 0/0 below a raw private key
    Subaddress {
        /// 32-byte private key, hex
        #[arg(long = "private-key", env = "HD_WALLET_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
        /// 32-byte chain code, hex (defaults to zeros)
        #[arg(long = "chain-code")]
        chain_code: Option<String>,
    },
    /// Exportable key for one of a phrase's addresses
    PrivateKey {
        #[arg(long, env = "HD_WALLET_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
        #[arg(long)]
        address: String,
    },
    /// Best-effort phrase for a key that owns an address
    Reverse {
        #[arg(long)]
        address: String,
        #[arg(long = "private-key", env = "HD_WALLET_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
    },
    /// Transaction history of a phrase's accounts
    History {
        #[arg(long, env = "HD_WALLET_MNEMONIC", hide_env_values = true)]
        mnemonic: String,
        /// Overall deadline for all lookups, in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
    },
}
