use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::errors::{Result, WalletError};

/// Version bytes and prefixes for one network.
///
/// Every encoder and decoder takes the profile explicitly; there is no
/// process-global network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub name: String,
    pub message_prefix: String,
    pub bech32_hrp: String,
    /// Extended public key version (xpub)
    pub bip32_public: u32,
    /// Extended private key version (xprv)
    pub bip32_private: u32,
    pub pub_key_hash: u8,
    pub script_hash: u8,
    /// Secret-key (WIF) version byte
    pub wif: u8,
}

impl NetworkParams {
    /// The service's own profile. Addresses start with `B`.
    pub fn custom() -> Self {
        Self {
            name: "custom".to_string(),
            message_prefix: "\x18Bitcoin Signed Message:\n".to_string(),
            bech32_hrp: "bc".to_string(),
            bip32_public: 0x0488_B21E,
            bip32_private: 0x0488_ADE4,
            pub_key_hash: 25,
            script_hash: 26,
            wif: 0x80,
        }
    }

    pub fn bitcoin() -> Self {
        Self {
            name: "bitcoin".to_string(),
            pub_key_hash: 0x00,
            script_hash: 0x05,
            ..Self::custom()
        }
    }

    pub fn testnet() -> Self {
        Self {
            name: "testnet".to_string(),
            message_prefix: "\x18Bitcoin Signed Message:\n".to_string(),
            bech32_hrp: "tb".to_string(),
            bip32_public: 0x0435_87CF,
            bip32_private: 0x0435_8394,
            pub_key_hash: 0x6f,
            script_hash: 0xc4,
            wif: 0xef,
        }
    }

    /// Look up a preset by name (`custom`, `bitcoin`, `testnet`).
    pub fn by_name(name: &str) -> Result<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "custom" => Ok(Self::custom()),
            "bitcoin" | "mainnet" => Ok(Self::bitcoin()),
            "testnet" => Ok(Self::testnet()),
            other => Err(WalletError::ConfigError(format!("unknown network profile '{}'", other))),
        }
    }

    /// Reject profiles whose version bytes would make encodings ambiguous.
    pub fn validate(&self) -> Result<()> {
        if self.pub_key_hash == self.script_hash {
            return Err(WalletError::ConfigError(format!(
                "{}: pubkey-hash and script-hash version bytes are both {:#04x}",
                self.name, self.pub_key_hash
            )));
        }
        if self.bip32_public == self.bip32_private {
            return Err(WalletError::ConfigError(format!(
                "{}: extended public and private prefixes are both {:#010x}",
                self.name, self.bip32_public
            )));
        }
        if self.wif == self.pub_key_hash || self.wif == self.script_hash {
            return Err(WalletError::ConfigError(format!(
                "{}: secret-key version byte {:#04x} collides with an address version",
                self.name, self.wif
            )));
        }
        Ok(())
    }
}

impl Default for NetworkParams {
    fn default() -> Self {
        Self::custom()
    }
}

/// Key derivation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DerivationConfig {
    /// Account prefix; the address index is appended as the last level
    #[serde(default = "DerivationConfig::default_account_path")]
    pub account_path: String,

    #[serde(default = "DerivationConfig::default_account_count")]
    pub account_count: u32,

    #[serde(default = "DerivationConfig::default_entropy_bits")]
    pub default_entropy_bits: usize,
}

impl DerivationConfig {
    fn default_account_path() -> String { crate::core::bip44::Bip44Path::bitcoin().to_string() }
    fn default_account_count() -> u32 { 10 }
    fn default_entropy_bits() -> usize { 192 }
}

impl Default for DerivationConfig {
    fn default() -> Self {
        Self {
            account_path: Self::default_account_path(),
            account_count: Self::default_account_count(),
            default_entropy_bits: Self::default_entropy_bits(),
        }
    }
}

/// Seed stretching settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    /// PBKDF2 iteration count
    #[serde(default = "SeedConfig::default_pbkdf2_iterations")]
    pub pbkdf2_iterations: u32,
}

impl SeedConfig {
    fn default_pbkdf2_iterations() -> u32 { crate::crypto::kdf::BIP39_ITERATIONS }
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self { pbkdf2_iterations: Self::default_pbkdf2_iterations() }
    }
}

/// Block explorer used for transaction history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    #[serde(default = "ExplorerConfig::default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds)
    #[serde(default = "ExplorerConfig::default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "ExplorerConfig::default_max_retries")]
    pub max_retries: u32,
}

impl ExplorerConfig {
    fn default_base_url() -> String { "https://blockstream.info/api".to_string() }
    fn default_timeout_secs() -> u64 { 10 }
    fn default_max_retries() -> u32 { 2 }
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: Self::default_base_url(),
            timeout_secs: Self::default_timeout_secs(),
            max_retries: Self::default_max_retries(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub network: NetworkParams,

    #[serde(default)]
    pub derivation: DerivationConfig,

    #[serde(default)]
    pub seed: SeedConfig,

    #[serde(default)]
    pub explorer: ExplorerConfig,
}

pub const CONFIG_PATH_ENV: &str = "HD_WALLET_CONFIG";
pub const NETWORK_ENV: &str = "HD_WALLET_NETWORK";
pub const EXPLORER_URL_ENV: &str = "HD_WALLET_EXPLORER_URL";

impl AppConfig {
    /// Read a TOML file. Missing sections fall back to their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            WalletError::ConfigError(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: AppConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the file named by `HD_WALLET_CONFIG`, with
    /// `HD_WALLET_NETWORK` and `HD_WALLET_EXPLORER_URL` applied on top.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) if Path::new(&path).exists() => Self::load(&path)?,
            Ok(path) => {
                tracing::warn!("Config file {} not found, using defaults", path);
                Self::default()
            }
            Err(_) => Self::default(),
        };

        if let Ok(name) = std::env::var(NETWORK_ENV) {
            config.network = NetworkParams::by_name(&name)?;
        }
        if let Ok(url) = std::env::var(EXPLORER_URL_ENV) {
            config.explorer.base_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.derivation.account_path.parse::<crate::core::bip44::DerivationPath>()?;
        if self.derivation.account_count == 0 {
            return Err(WalletError::ConfigError("account_count must be at least 1".into()));
        }
        crate::core::mnemonic::WordCount::from_entropy_bits(self.derivation.default_entropy_bits)
            .map_err(|_| {
                WalletError::ConfigError(format!(
                    "default_entropy_bits {} is not one of 128, 160, 192, 224, 256",
                    self.derivation.default_entropy_bits
                ))
            })?;
        if self.seed.pbkdf2_iterations == 0 {
            return Err(WalletError::ConfigError("pbkdf2_iterations must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_coherent() {
        for params in [NetworkParams::custom(), NetworkParams::bitcoin(), NetworkParams::testnet()] {
            params.validate().unwrap();
        }
    }

    #[test]
    fn test_custom_is_default() {
        let params = NetworkParams::default();
        assert_eq!(params.pub_key_hash, 25);
        assert_eq!(params.script_hash, 26);
        assert_eq!(params.wif, 0x80);
        assert_eq!(params.bip32_public, 0x0488B21E);
    }

    #[test]
    fn test_rejects_colliding_versions() {
        let mut params = NetworkParams::custom();
        params.script_hash = params.pub_key_hash;
        assert!(matches!(params.validate(), Err(WalletError::ConfigError(_))));

        let mut params = NetworkParams::bitcoin();
        params.wif = 0x05;
        assert!(params.validate().is_err());

        let mut params = NetworkParams::testnet();
        params.bip32_private = params.bip32_public;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_by_name() {
        assert_eq!(NetworkParams::by_name("Testnet").unwrap(), NetworkParams::testnet());
        assert!(NetworkParams::by_name("litecoin").is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [explorer]
            base_url = "http://localhost:3000"
            "#,
        )
        .unwrap();
        assert_eq!(config.explorer.base_url, "http://localhost:3000");
        assert_eq!(config.explorer.max_retries, 2);
        assert_eq!(config.derivation.account_count, 10);
        assert_eq!(config.seed.pbkdf2_iterations, 2048);
        assert_eq!(config.network, NetworkParams::custom());
        config.validate().unwrap();
    }

    #[test]
    fn test_validate_rejects_bad_derivation() {
        let mut config = AppConfig::default();
        config.derivation.account_path = "m/44'/x".into();
        assert!(matches!(config.validate(), Err(WalletError::InvalidPath(_))));

        let mut config = AppConfig::default();
        config.derivation.default_entropy_bits = 100;
        assert!(matches!(config.validate(), Err(WalletError::ConfigError(_))));
    }
}
