use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use super::{AccountEntry, AccountList, RecoveredWallet, Wallet};
use crate::core::errors::{Result, WalletError};
use crate::core::mnemonic::Mnemonic;
use crate::crypto::hash::hash160;

impl Wallet {
    /// Key and address of the first account of an existing phrase.
    ///
    /// # Errors
    /// `InvalidMnemonic` if the phrase does not decode.
    pub fn recover(&self, phrase: &str) -> Result<RecoveredWallet> {
        let mnemonic = Mnemonic::parse(phrase)?;
        info!("Recovering {}-word wallet", mnemonic.word_count().words());

        let account = self.account_key(&mnemonic)?;
        let key = Self::address_key(&account, 0)?;
        Ok(RecoveredWallet {
            private_key: self.secret_of(&key)?,
            address: self.address_of(&key),
        })
    }

    /// The first `account_count` addresses under the account path.
    pub fn derive_account_list(&self, phrase: &str) -> Result<AccountList> {
        let mnemonic = Mnemonic::parse(phrase)?;
        let account = self.account_key(&mnemonic)?;

        let accounts = (0..self.account_count)
            .map(|index| -> Result<AccountEntry> {
                let key = Self::address_key(&account, index)?;
                Ok(AccountEntry {
                    index,
                    private_key: self.secret_of(&key)?,
                    address: self.address_of(&key),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!("Derived {} accounts", accounts.len());
        Ok(AccountList {
            mnemonic: mnemonic.phrase().to_string(),
            accounts,
        })
    }

    /// Exportable key for `address`, if it is one of the phrase's accounts.
    ///
    /// # Errors
    /// * `InvalidMnemonic` if the phrase does not decode
    /// * `AddressMismatch` when no account index produces `address`, including
    ///   addresses that are malformed or belong to another network
    pub fn get_private_key_for_address(&self, phrase: &str, address: &str) -> Result<String> {
        let mnemonic = Mnemonic::parse(phrase)?;
        let wanted = self.claimed_hash(address)?;
        let account = self.account_key(&mnemonic)?;

        for index in 0..self.account_count {
            let key = Self::address_key(&account, index)?;
            if bool::from(hash160(&key.public_key_bytes())[..].ct_eq(&wanted[..])) {
                debug!("Address {} found at index {}", address, index);
                return self.secret_of(&key);
            }
        }

        warn!("Address {} is not among the first {} accounts", address, self.account_count);
        Err(WalletError::AddressMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NetworkParams;
    use crate::core::errors::MnemonicFault;

    const ZERO_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    fn wallet() -> Wallet {
        Wallet::with_network(NetworkParams::custom()).unwrap()
    }

    #[test]
    fn test_recover_matches_generate() {
        let w = wallet();
        let generated = w.generate_from_entropy(&[0u8; 16]).unwrap();
        let recovered = w.recover(ZERO_12).unwrap();
        assert_eq!(recovered.address, generated.address);
        assert_eq!(recovered.private_key, generated.private_key);
    }

    #[test]
    fn test_recover_accepts_messy_input() {
        let messy = format!("  {}  ", ZERO_12.to_uppercase().replace(' ', "   "));
        assert_eq!(wallet().recover(&messy).unwrap().address, "BQHFt9n7GbZSveGuZwQoPod9c8m8NpY2AG");
    }

    #[test]
    fn test_recover_unknown_word() {
        let phrase = ZERO_12.replacen("abandon", "bitcoinz", 1);
        assert_eq!(
            wallet().recover(&phrase).unwrap_err(),
            WalletError::InvalidMnemonic(MnemonicFault::UnknownWord(0))
        );
    }

    #[test]
    fn test_account_list_vectors() {
        let list = wallet().derive_account_list(ZERO_12).unwrap();
        assert_eq!(list.accounts.len(), 10);
        assert_eq!(list.mnemonic, ZERO_12);
        assert_eq!(list.accounts[0].address, "BQHFt9n7GbZSveGuZwQoPod9c8m8NpY2AG");
        assert_eq!(list.accounts[1].address, "BECD1P7NnHEt7PGm93k7MQU1Ps15aw7mr1");
        assert_eq!(list.accounts[2].address, "BQpKh8tnL6qr4SNULLduSv2edUy76MJZpk");
        assert_eq!(
            list.accounts[1].private_key,
            "KzJgGiEeGUVWmPR97pVWDnCVraZvM2fnrCVrg2irV4353HciE6Un"
        );
        let indices: Vec<u32> = list.accounts.iter().map(|a| a.index).collect();
        assert_eq!(indices, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_private_key_for_address() {
        let w = wallet();
        let key = w.get_private_key_for_address(ZERO_12, "BQpKh8tnL6qr4SNULLduSv2edUy76MJZpk").unwrap();
        assert_eq!(key, "L4BL9ZGzuQJFoRqGfjsgHeYzD1C72y2VmJaY6sqdtaRkfxUFrJXu");
    }

    #[test]
    fn test_private_key_for_foreign_address() {
        // key 1 under the custom profile, not derivable from the phrase
        assert_eq!(
            wallet().get_private_key_for_address(ZERO_12, "BF8MAsLp7aSfb9g9qGSHwzDerit8nAZAJX"),
            Err(WalletError::AddressMismatch)
        );
        // right phrase, wrong network
        assert_eq!(
            wallet().get_private_key_for_address(ZERO_12, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"),
            Err(WalletError::AddressMismatch)
        );
    }

    #[test]
    fn test_private_key_for_malformed_address() {
        for bad in ["not-an-address", "", "BQHFt9n7GbZSveGuZwQoPod9c8m8NpY2AH"] {
            assert_eq!(
                wallet().get_private_key_for_address(ZERO_12, bad),
                Err(WalletError::AddressMismatch)
            );
        }
    }
}
