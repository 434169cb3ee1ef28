//! Derivation paths.
//!
//! Path format: m/44'/coin_type'/account'/change/address_index
//! Both `'` and `h` mark a hardened level.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::bip32::ChildNumber;
use crate::core::errors::{Result, WalletError};

/// Ordered list of child numbers, starting below the master key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The empty path (`m`).
    pub fn master() -> Self {
        Self(Vec::new())
    }

    /// This path with one more level appended.
    pub fn child(&self, child: ChildNumber) -> Self {
        let mut levels = self.0.clone();
        levels.push(child);
        Self(levels)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChildNumber> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Raw 32-bit indices, hardened levels with the top bit set.
    pub fn to_raw(&self) -> Vec<u32> {
        self.0.iter().map(ChildNumber::to_raw).collect()
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(levels: Vec<ChildNumber>) -> Self {
        Self(levels)
    }
}

impl AsRef<[ChildNumber]> for DerivationPath {
    fn as_ref(&self) -> &[ChildNumber] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildNumber;
    type IntoIter = std::slice::Iter<'a, ChildNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.trim().split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => return Err(WalletError::InvalidPath(format!("'{}' must start with 'm'", s))),
        }

        parts
            .map(|part| {
                let (digits, hardened) = match part.strip_suffix(['\'', 'h', 'H']) {
                    Some(digits) => (digits, true),
                    None => (part, false),
                };
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(WalletError::InvalidPath(format!("invalid level '{}'", part)));
                }
                let index = digits
                    .parse::<u32>()
                    .map_err(|_| WalletError::InvalidPath(format!("index {} out of range", digits)))?;
                ChildNumber::new(index, hardened)
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl std::fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m")?;
        for child in &self.0 {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

impl Serialize for DerivationPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DerivationPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// BIP44 account prefix `m/44'/coin'/account'/change`; address indices
/// are appended below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bip44Path {
    /// Cryptocurrency type (0=BTC)
    pub coin_type: u32,
    /// Account index
    pub account: u32,
    /// External/internal chain (0=external, 1=internal change)
    pub change: u32,
}

impl Bip44Path {
    /// m/44'/0'/0'/0
    pub fn bitcoin() -> Self {
        Self {
            coin_type: 0,
            account: 0,
            change: 0,
        }
    }

    pub fn to_derivation_path(&self) -> Result<DerivationPath> {
        Ok(DerivationPath(vec![
            ChildNumber::hardened(44)?,
            ChildNumber::hardened(self.coin_type)?,
            ChildNumber::hardened(self.account)?,
            ChildNumber::normal(self.change)?,
        ]))
    }
}

impl std::fmt::Display for Bip44Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "m/44'/{}'/{}'/{}", self.coin_type, self.account, self.change)
    }
}
