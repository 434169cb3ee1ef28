pub mod bip32;
pub mod bip44;
pub mod config;
pub mod errors;
pub mod mnemonic;
pub mod wallet;

pub use bip32::{ChildNumber, ExtendedKey};
pub use bip44::{Bip44Path, DerivationPath};
pub use config::{AppConfig, NetworkParams};
pub use mnemonic::{Mnemonic, WordCount};
