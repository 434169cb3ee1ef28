//! Wallet facade.
//!
//! Every operation is a one-shot pipeline over its inputs:
//! mnemonic -> seed -> master key -> account path -> address/secret.
//! Nothing is cached between calls.

pub mod create;
pub mod history;
pub mod recover;
pub mod reverse;
pub mod subaddress;
pub mod types;

pub use types::{
    AccountEntry, AccountList, AddressHistory, GeneratedWallet, RecoveredWallet, ReverseLookup,
    Subaddress,
};

use crate::blockchain::bitcoin::address::{decode_address, to_address, to_secret_encoding};
use crate::core::bip32::{ChildNumber, ExtendedKey};
use crate::core::bip44::DerivationPath;
use crate::core::config::{AppConfig, NetworkParams};
use crate::core::errors::{Result, WalletError};
use crate::core::mnemonic::Mnemonic;
use crate::crypto::kdf::SeedStretcher;

/// Stateless entry point for the wallet operations, bound to one network
/// profile and derivation layout.
#[derive(Debug, Clone)]
pub struct Wallet {
    network: NetworkParams,
    account_path: DerivationPath,
    account_count: u32,
    default_entropy_bits: usize,
    stretcher: SeedStretcher,
}

impl Wallet {
    pub fn new(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            network: config.network.clone(),
            account_path: config.derivation.account_path.parse()?,
            account_count: config.derivation.account_count,
            default_entropy_bits: config.derivation.default_entropy_bits,
            stretcher: SeedStretcher::new(config.seed.pbkdf2_iterations),
        })
    }

    /// Default layout on the given network.
    pub fn with_network(network: NetworkParams) -> Result<Self> {
        Self::new(&AppConfig { network, ..AppConfig::default() })
    }

    pub fn network(&self) -> &NetworkParams {
        &self.network
    }

    pub fn account_path(&self) -> &DerivationPath {
        &self.account_path
    }

    pub fn account_count(&self) -> u32 {
        self.account_count
    }

    /// Account-level key (the path without its address index).
    fn account_key(&self, mnemonic: &Mnemonic) -> Result<ExtendedKey> {
        let seed = self.stretcher.stretch(mnemonic, "");
        ExtendedKey::master_from_seed(&seed[..])?.derive_path(&self.account_path)
    }

    fn address_key(account: &ExtendedKey, index: u32) -> Result<ExtendedKey> {
        account.derive(ChildNumber::normal(index)?)
    }

    /// Hash160 behind a caller-supplied address. An address this profile
    /// cannot produce (malformed, bad checksum, foreign version) is a mismatch.
    fn claimed_hash(&self, address: &str) -> Result<[u8; 20]> {
        decode_address(address, &self.network).map_err(|e| {
            tracing::warn!("Address {} is not a {} address: {}", address, self.network.name, e);
            WalletError::AddressMismatch
        })
    }

    fn address_of(&self, key: &ExtendedKey) -> String {
        to_address(&key.public_key_bytes(), &self.network)
    }

    fn secret_of(&self, key: &ExtendedKey) -> Result<String> {
        let private_key = key
            .private_key_bytes()
            .ok_or_else(|| WalletError::InvalidKeyMaterial("expected a private key".into()))?;
        Ok(to_secret_encoding(&private_key, &self.network, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.network.script_hash = config.network.pub_key_hash;
        assert!(Wallet::new(&config).is_err());
    }

    #[test]
    fn test_default_layout() {
        let wallet = Wallet::new(&AppConfig::default()).unwrap();
        assert_eq!(wallet.account_path().to_string(), "m/44'/0'/0'/0");
        assert_eq!(wallet.account_count(), 10);
        assert_eq!(wallet.network().pub_key_hash, 25);
    }
}
