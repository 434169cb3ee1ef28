// src/lib.rs
//! Deterministic HD wallet derivation.
//!
//! BIP39 phrases, BIP32 key trees, Base58Check addresses and WIF secrets,
//! plus a stateless [`core::wallet::Wallet`] facade over them.

pub mod blockchain;
pub mod cli;
pub mod core;
pub mod crypto;
pub mod security;

pub use crate::core::errors::{ErrorKind, Result, WalletError};
pub use crate::core::wallet::Wallet;
