//! JSON-facing results of the wallet operations.

use serde::Serialize;
use serde_json::Value;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Fresh wallet: phrase, exportable key and address of the first account.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedWallet {
    pub mnemonic: String,
    pub private_key: String,
    pub address: String,
}

#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct RecoveredWallet {
    pub private_key: String,
    pub address: String,
}

#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct AccountEntry {
    #[zeroize(skip)]
    pub index: u32,
    pub private_key: String,
    pub address: String,
}

#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
pub struct AccountList {
    pub mnemonic: String,
    pub accounts: Vec<AccountEntry>,
}

impl AccountList {
    pub fn addresses(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.address.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subaddress {
    pub sub_address: String,
}

/// Phrase built from a key prefix. It does not restore the original wallet.
#[derive(Clone, Serialize, Zeroize, ZeroizeOnDrop)]
#[serde(rename_all = "camelCase")]
pub struct ReverseLookup {
    pub mnemonic: String,
    #[zeroize(skip)]
    pub best_effort: bool,
}

/// Transactions for one address, or why they could not be fetched.
#[derive(Debug, Clone, Serialize)]
pub struct AddressHistory {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

const REDACTED: &str = "[REDACTED]";

impl std::fmt::Debug for GeneratedWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratedWallet")
            .field("mnemonic", &REDACTED)
            .field("private_key", &REDACTED)
            .field("address", &self.address)
            .finish()
    }
}

impl std::fmt::Debug for RecoveredWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveredWallet")
            .field("private_key", &REDACTED)
            .field("address", &self.address)
            .finish()
    }
}

impl std::fmt::Debug for AccountEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountEntry")
            .field("index", &self.index)
            .field("private_key", &REDACTED)
            .field("address", &self.address)
            .finish()
    }
}

impl std::fmt::Debug for AccountList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountList")
            .field("mnemonic", &REDACTED)
            .field("accounts", &self.accounts)
            .finish()
    }
}

impl std::fmt::Debug for ReverseLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReverseLookup")
            .field("mnemonic", &REDACTED)
            .field("best_effort", &self.best_effort)
            .finish()
    }
}
