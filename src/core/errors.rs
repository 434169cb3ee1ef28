//! Error types for wallet derivation operations.
//!
//! Every failure in the derivation pipeline is reported as a typed
//! [`WalletError`]. None of the variants carry secret material: phrases,
//! seeds and keys never end up in an error message.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

/// Why a mnemonic phrase was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MnemonicFault {
    /// Word count is not one of 12, 15, 18, 21 or 24.
    WordCount(usize),
    /// Word at this (zero-based) position is not in the wordlist.
    UnknownWord(usize),
    /// Embedded checksum bits do not match the entropy.
    Checksum,
}

impl std::fmt::Display for MnemonicFault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MnemonicFault::WordCount(n) => {
                write!(f, "invalid word count {}, expected 12, 15, 18, 21 or 24", n)
            }
            MnemonicFault::UnknownWord(pos) => write!(f, "word #{} is not in the wordlist", pos + 1),
            MnemonicFault::Checksum => write!(f, "checksum mismatch"),
        }
    }
}

/// Coarse error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed hex, wrong length, bad word count.
    InputValidation,
    /// Mnemonic or Base58Check checksum failed.
    ChecksumFailure,
    /// A derived scalar fell outside the curve order.
    CryptographicInvariantViolation,
    /// A recomputed value disagrees with what the caller asserted.
    Mismatch,
    /// Remote transaction-history lookup failed.
    ExternalServiceFailure,
    /// Network profile or application configuration is unusable.
    Configuration,
}

/// Custom error type for wallet operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Entropy length is not 16, 20, 24, 28 or 32 bytes.
    #[error("Invalid entropy length: {0} bytes")]
    InvalidEntropyLength(usize),

    /// Requested strength is not 128, 160, 192, 224 or 256 bits.
    #[error("Invalid entropy strength: {0} bits")]
    InvalidEntropyStrength(usize),

    /// The random source could not produce entropy.
    #[error("Entropy source failure: {0}")]
    EntropySourceFailure(String),

    /// Mnemonic phrase rejected.
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(MnemonicFault),

    /// Seed produced an unusable master key.
    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    /// Child derivation produced an out-of-range key.
    #[error("Invalid derivation: {0}")]
    InvalidDerivation(String),

    /// Supplied key bytes are malformed or not a valid scalar.
    #[error("Invalid key material: {0}")]
    InvalidKeyMaterial(String),

    /// Derivation path string could not be parsed.
    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    /// Base58Check trailing checksum does not match the payload.
    #[error("Checksum mismatch")]
    ChecksumMismatch,

    /// Character outside the Base58 alphabet.
    #[error("Invalid base58 character {0:?}")]
    InvalidCharacter(char),

    /// Version byte does not belong to the configured network.
    #[error("Invalid version byte: expected {expected:#04x}, found {found:#04x}")]
    InvalidVersion { expected: u32, found: u32 },

    /// Decoded payload has the wrong size.
    #[error("Invalid payload length: expected {expected}, found {found}")]
    InvalidPayloadLength { expected: usize, found: usize },

    /// Recomputed address differs from the one supplied.
    #[error("Address mismatch")]
    AddressMismatch,

    /// Caller cancelled the operation before it finished.
    #[error("Operation cancelled")]
    Cancelled,

    /// Remote service returned an error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Remote service did not answer in time.
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl WalletError {
    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            WalletError::InvalidEntropyLength(_)
            | WalletError::InvalidEntropyStrength(_)
            | WalletError::EntropySourceFailure(_)
            | WalletError::InvalidKeyMaterial(_)
            | WalletError::InvalidPath(_)
            | WalletError::InvalidCharacter(_)
            | WalletError::InvalidVersion { .. }
            | WalletError::InvalidPayloadLength { .. }
            | WalletError::Cancelled => ErrorKind::InputValidation,
            WalletError::InvalidMnemonic(MnemonicFault::Checksum) | WalletError::ChecksumMismatch => {
                ErrorKind::ChecksumFailure
            }
            WalletError::InvalidMnemonic(_) => ErrorKind::InputValidation,
            WalletError::InvalidSeed(_) | WalletError::InvalidDerivation(_) => {
                ErrorKind::CryptographicInvariantViolation
            }
            WalletError::AddressMismatch => ErrorKind::Mismatch,
            WalletError::ExternalService(_) | WalletError::Timeout(_) => {
                ErrorKind::ExternalServiceFailure
            }
            WalletError::ConfigError(_) => ErrorKind::Configuration,
        }
    }

    /// Derivation is deterministic, so only remote lookups are worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WalletError::ExternalService(_) | WalletError::Timeout(_))
    }
}

impl From<hex::FromHexError> for WalletError {
    fn from(err: hex::FromHexError) -> Self {
        WalletError::InvalidKeyMaterial(format!("malformed hex: {}", err))
    }
}

impl From<reqwest::Error> for WalletError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            WalletError::Timeout(err.to_string())
        } else {
            WalletError::ExternalService(err.to_string())
        }
    }
}

impl From<toml::de::Error> for WalletError {
    fn from(err: toml::de::Error) -> Self {
        WalletError::ConfigError(err.to_string())
    }
}
