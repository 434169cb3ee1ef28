//! Seed stretching (BIP39 phrase to 64-byte seed).
//!
//! PBKDF2-HMAC-SHA512 with the NFKD-normalized phrase as password and
//! `"mnemonic" || passphrase` as salt. This is the only intentionally slow
//! step of the pipeline, so it is also the only one that honours caller
//! cancellation.

use std::borrow::Cow;

use pbkdf2::pbkdf2_hmac;
use sha2::Sha512;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::errors::{Result, WalletError};
use crate::core::mnemonic::Mnemonic;

/// Iteration count fixed by BIP39.
pub const BIP39_ITERATIONS: u32 = 2048;

pub const SEED_LEN: usize = 64;

/// 64-byte seed, wiped on drop.
pub type Seed = Zeroizing<[u8; SEED_LEN]>;

const SALT_PREFIX: &str = "mnemonic";

fn normalize(text: &str) -> Cow<'_, str> {
    let mut cow = Cow::Borrowed(text);
    bip39::Mnemonic::normalize_utf8_cow(&mut cow);
    cow
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedStretcher {
    iterations: u32,
}

impl Default for SeedStretcher {
    fn default() -> Self {
        Self { iterations: BIP39_ITERATIONS }
    }
}

impl SeedStretcher {
    /// A stretcher with a non-standard iteration count. Seeds produced with
    /// anything other than [`BIP39_ITERATIONS`] are not portable.
    pub fn new(iterations: u32) -> Self {
        Self { iterations: iterations.max(1) }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Stretch a validated mnemonic.
    pub fn stretch(&self, mnemonic: &Mnemonic, passphrase: &str) -> Seed {
        self.stretch_phrase(mnemonic.phrase(), passphrase)
    }

    /// Stretch raw phrase text without validating it.
    pub fn stretch_phrase(&self, phrase: &str, passphrase: &str) -> Seed {
        debug!("Stretching seed with {} PBKDF2 iterations", self.iterations);

        let password = Zeroizing::new(normalize(phrase).into_owned());
        let mut salt = Zeroizing::new(String::with_capacity(SALT_PREFIX.len() + passphrase.len()));
        salt.push_str(SALT_PREFIX);
        salt.push_str(&normalize(passphrase));

        let mut seed = Zeroizing::new([0u8; SEED_LEN]);
        pbkdf2_hmac::<Sha512>(password.as_bytes(), salt.as_bytes(), self.iterations, &mut *seed);
        seed
    }

    /// Stretch on the blocking pool, giving up as soon as `cancel` fires.
    ///
    /// Cancellation only stops the wait. PBKDF2 cannot be interrupted, so
    /// the blocking task still runs to completion and its seed is dropped
    /// (and wiped) unseen.
    ///
    /// # Errors
    /// `Cancelled` when the token is triggered before the seed is ready.
    pub async fn stretch_cancellable(
        &self,
        mnemonic: &Mnemonic,
        passphrase: &str,
        cancel: &CancellationToken,
    ) -> Result<Seed> {
        if cancel.is_cancelled() {
            return Err(WalletError::Cancelled);
        }

        let stretcher = *self;
        let phrase = Zeroizing::new(mnemonic.phrase().to_string());
        let passphrase = Zeroizing::new(passphrase.to_string());
        let task =
            tokio::task::spawn_blocking(move || stretcher.stretch_phrase(&phrase, &passphrase));

        tokio::select! {
            _ = cancel.cancelled() => Err(WalletError::Cancelled),
            joined = task => joined
                .map_err(|e| WalletError::InvalidSeed(format!("seed stretching task failed: {}", e))),
        }
    }
}

/// Stretch with the standard iteration count.
pub fn stretch(mnemonic: &Mnemonic, passphrase: &str) -> Seed {
    SeedStretcher::default().stretch(mnemonic, passphrase)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_12: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_bip39_vector_no_passphrase() {
        let m = Mnemonic::parse(ZERO_12).unwrap();
        assert_eq!(
            hex::encode(*stretch(&m, "")),
            "5eb00bbddcf069084889a8ab9155568165f5c453ccb85e70811aaed6f6da5fc1\
             9a5ac40b389cd370d086206dec8aa6c43daea6690f20ad3d8d48b2d2ce9e38e4"
        );
    }

    #[test]
    fn test_bip39_vector_trezor_passphrase() {
        let m = Mnemonic::parse(ZERO_12).unwrap();
        assert_eq!(
            hex::encode(*stretch(&m, "TREZOR")),
            "c55257c360c07c72029aebc1b53c05ed0362ada38ead3e3e9efa3708e5349553\
             1f09a6987599d18264c1e1c92f2cf141630c7a3c4ab7c81b2f001698e7463b04"
        );
    }

    #[test]
    fn test_deterministic() {
        let m = Mnemonic::parse(ZERO_12).unwrap();
        assert_eq!(*stretch(&m, "pass"), *stretch(&m, "pass"));
        assert_ne!(*stretch(&m, "pass"), *stretch(&m, "Pass"));
    }

    #[test]
    fn test_matches_bip39_crate() {
        let m = Mnemonic::parse(ZERO_12).unwrap();
        let reference = bip39::Mnemonic::parse(ZERO_12).unwrap().to_seed("caf\u{e9}");
        // precomposed and decomposed forms normalize to the same salt
        assert_eq!(*stretch(&m, "caf\u{e9}"), reference);
        assert_eq!(*stretch(&m, "cafe\u{301}"), reference);
    }

    #[test]
    fn test_iterations_change_seed() {
        let m = Mnemonic::parse(ZERO_12).unwrap();
        let fast = SeedStretcher::new(1);
        assert_eq!(fast.iterations(), 1);
        assert_ne!(*fast.stretch(&m, ""), *stretch(&m, ""));
    }

    #[tokio::test]
    async fn test_cancellable_completes() {
        let m = Mnemonic::parse(ZERO_12).unwrap();
        let token = CancellationToken::new();
        let seed = SeedStretcher::default().stretch_cancellable(&m, "", &token).await.unwrap();
        assert_eq!(*seed, *stretch(&m, ""));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let m = Mnemonic::parse(ZERO_12).unwrap();
        let token = CancellationToken::new();
        token.cancel();
        let result = SeedStretcher::default().stretch_cancellable(&m, "", &token).await;
        assert_eq!(result.unwrap_err(), WalletError::Cancelled);
    }

    #[tokio::test]
    async fn test_cancelled_mid_stretch_returns_early() {
        let m = Mnemonic::parse(ZERO_12).unwrap();
        let token = CancellationToken::new();
        let trigger = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            trigger.cancel();
        });

        let slow = SeedStretcher::new(200_000);
        let result = tokio::time::timeout(
            std::time::Duration::from_secs(30),
            slow.stretch_cancellable(&m, "", &token),
        )
        .await
        .expect("cancellation should not wait for the stretch");
        assert_eq!(result.unwrap_err(), WalletError::Cancelled);
    }
}
