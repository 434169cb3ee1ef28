use subtle::ConstantTimeEq;
use tracing::{debug, info, warn};

use super::{ReverseLookup, Wallet};
use crate::core::bip32::ExtendedKey;
use crate::core::errors::{Result, WalletError};
use crate::core::mnemonic::entropy_to_mnemonic_truncated;
use crate::crypto::hash::hash160;
use crate::security::{redact_hex_bytes, secret_from_hex};

impl Wallet {
    /// Best-effort phrase for a private key that owns `address`.
    ///
    /// The phrase encodes the first 16 bytes of the key as entropy. A wallet
    /// cannot be rebuilt from one of its keys, so this phrase is NOT the one
    /// the key was derived from; the result is marked `best_effort`.
    ///
    /// # Errors
    /// * `InvalidKeyMaterial` for a malformed key
    /// * `AddressMismatch` if the key does not own `address`, or `address` is
    ///   not a valid address on this network
    pub fn reverse_mnemonic_lookup(&self, address: &str, private_key_hex: &str) -> Result<ReverseLookup> {
        let private_key = secret_from_hex(private_key_hex, "private key")?;
        debug!("Reverse lookup for {} with key {}", address, redact_hex_bytes(&private_key[..]));
        let key = ExtendedKey::from_private_key(&private_key[..], [0u8; 32])?;
        let claimed = self.claimed_hash(address)?;

        if !bool::from(hash160(&key.public_key_bytes())[..].ct_eq(&claimed[..])) {
            warn!("Reverse lookup rejected: key does not own {}", address);
            return Err(WalletError::AddressMismatch);
        }

        let mnemonic = entropy_to_mnemonic_truncated(&private_key[..])?;
        info!("Reverse lookup for {} produced a best-effort phrase", address);
        Ok(ReverseLookup {
            mnemonic: mnemonic.phrase().to_string(),
            best_effort: true,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NetworkParams;

    const LEAF_KEY: &str = "e284129cc0922579a535bbf4d1a3b25773090d28c909bc0fed73b5e0222cc372";
    const LEAF_ADDRESS: &str = "BQHFt9n7GbZSveGuZwQoPod9c8m8NpY2AG";

    fn wallet() -> Wallet {
        Wallet::with_network(NetworkParams::custom()).unwrap()
    }

    #[test]
    fn test_reverse_lookup_is_truncated_key() {
        let lookup = wallet().reverse_mnemonic_lookup(LEAF_ADDRESS, LEAF_KEY).unwrap();
        assert!(lookup.best_effort);
        assert_eq!(
            lookup.mnemonic,
            "tip calm poet license car rubber network resist visit minimum uncle quiz"
        );
    }

    #[test]
    fn test_reverse_lookup_does_not_restore_wallet() {
        let w = wallet();
        let lookup = w.reverse_mnemonic_lookup(LEAF_ADDRESS, LEAF_KEY).unwrap();
        assert_ne!(w.recover(&lookup.mnemonic).unwrap().address, LEAF_ADDRESS);
    }

    #[test]
    fn test_reverse_lookup_mismatch() {
        let other = "0000000000000000000000000000000000000000000000000000000000000001";
        assert_eq!(
            wallet().reverse_mnemonic_lookup(LEAF_ADDRESS, other).unwrap_err(),
            WalletError::AddressMismatch
        );
    }

    #[test]
    fn test_reverse_lookup_foreign_or_malformed_address() {
        for address in ["1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA", "not-an-address"] {
            assert_eq!(
                wallet().reverse_mnemonic_lookup(address, LEAF_KEY).unwrap_err(),
                WalletError::AddressMismatch
            );
        }
    }

    #[test]
    fn test_reverse_lookup_bad_key() {
        assert!(matches!(
            wallet().reverse_mnemonic_lookup(LEAF_ADDRESS, "1234"),
            Err(WalletError::InvalidKeyMaterial(_))
        ));
    }
}
