use rand_core::{CryptoRng, RngCore};
use tracing::info;
use zeroize::Zeroizing;

use super::{GeneratedWallet, Wallet};
use crate::core::errors::{Result, WalletError};
use crate::core::mnemonic::{Mnemonic, WordCount};

impl Wallet {
    /// New wallet from `bits` of fresh entropy drawn from `rng`
    /// (the configured default when `None`).
    ///
    /// # Errors
    /// `InvalidEntropyStrength` for an unsupported strength,
    /// `EntropySourceFailure` if `rng` cannot produce bytes.
    pub fn generate<R>(&self, rng: &mut R, bits: Option<usize>) -> Result<GeneratedWallet>
    where
        R: RngCore + CryptoRng,
    {
        let word_count = WordCount::from_entropy_bits(bits.unwrap_or(self.default_entropy_bits))?;
        let mut entropy = Zeroizing::new(vec![0u8; word_count.entropy_bytes()]);
        rng.try_fill_bytes(&mut entropy)
            .map_err(|e| WalletError::EntropySourceFailure(e.to_string()))?;
        self.generate_from_entropy(&entropy)
    }

    /// Same pipeline as [`Wallet::generate`] with caller-supplied entropy.
    pub fn generate_from_entropy(&self, entropy: &[u8]) -> Result<GeneratedWallet> {
        info!("Generating wallet from {} bits of entropy", entropy.len() * 8);

        let mnemonic = Mnemonic::from_entropy(entropy)?;
        let account = self.account_key(&mnemonic)?;
        let key = Self::address_key(&account, 0)?;

        let address = self.address_of(&key);
        info!("Generated wallet with address {}", address);
        Ok(GeneratedWallet {
            mnemonic: mnemonic.phrase().to_string(),
            private_key: self.secret_of(&key)?,
            address,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::NetworkParams;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_zero_entropy_golden_wallet() {
        let wallet = Wallet::with_network(NetworkParams::bitcoin()).unwrap();
        let generated = wallet.generate_from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(
            generated.mnemonic,
            "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about"
        );
        assert_eq!(generated.address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
        assert_eq!(generated.private_key, "L4p2b9VAf8k5aUahF1JCJUzZkgNEAqLfq8DDdQiyAprQAKSbu8hf");
    }

    #[test]
    fn test_custom_profile_address() {
        let wallet = Wallet::with_network(NetworkParams::custom()).unwrap();
        let generated = wallet.generate_from_entropy(&[0u8; 16]).unwrap();
        assert_eq!(generated.address, "BQHFt9n7GbZSveGuZwQoPod9c8m8NpY2AG");
    }

    #[test]
    fn test_generate_default_strength_is_18_words() {
        let wallet = Wallet::with_network(NetworkParams::custom()).unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let generated = wallet.generate(&mut rng, None).unwrap();
        assert_eq!(generated.mnemonic.split(' ').count(), 18);
        assert!(generated.address.starts_with('B'));
    }

    #[test]
    fn test_generate_is_reproducible_with_seeded_rng() {
        let wallet = Wallet::with_network(NetworkParams::custom()).unwrap();
        let a = wallet.generate(&mut StdRng::seed_from_u64(1), Some(256)).unwrap();
        let b = wallet.generate(&mut StdRng::seed_from_u64(1), Some(256)).unwrap();
        assert_eq!(a.mnemonic, b.mnemonic);
        assert_eq!(a.address, b.address);
        assert_eq!(a.mnemonic.split(' ').count(), 24);
    }

    #[test]
    fn test_generate_rejects_bad_strength() {
        let wallet = Wallet::with_network(NetworkParams::custom()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            wallet.generate(&mut rng, Some(100)).unwrap_err(),
            WalletError::InvalidEntropyStrength(100)
        );
    }

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, _dest: &mut [u8]) {}
        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> std::result::Result<(), rand_core::Error> {
            Err(rand_core::Error::new("entropy pool exhausted"))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn test_entropy_source_failure() {
        let wallet = Wallet::with_network(NetworkParams::custom()).unwrap();
        assert!(matches!(
            wallet.generate(&mut FailingRng, Some(128)),
            Err(WalletError::EntropySourceFailure(_))
        ));
    }
}
