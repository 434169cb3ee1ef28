//! BIP39 mnemonic codec.
//!
//! Converts between raw entropy and a phrase drawn from the standard English
//! wordlist. The phrase carries `entropy_bits / 32` checksum bits taken from
//! the front of SHA-256(entropy); every 11 bits select one word.
//!
//! Randomness is not drawn here: callers supply the entropy.

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::core::errors::{MnemonicFault, Result, WalletError};
use crate::crypto::hash::sha256;

/// Bits encoded by one word.
const BITS_PER_WORD: usize = 11;

/// Prefix length used by [`entropy_to_mnemonic_truncated`].
pub const TRUNCATED_ENTROPY_LEN: usize = 16;

fn wordlist() -> &'static [&'static str; 2048] {
    bip39::Language::English.word_list()
}

fn word_index(word: &str) -> Option<u16> {
    // English list is sorted, so a binary search is exact.
    wordlist()
        .binary_search_by(|candidate| (*candidate).cmp(word))
        .ok()
        .map(|i| i as u16)
}

/// Supported phrase lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    /// 12 words (128-bit entropy)
    Twelve = 12,
    /// 15 words (160-bit entropy)
    Fifteen = 15,
    /// 18 words (192-bit entropy)
    Eighteen = 18,
    /// 21 words (224-bit entropy)
    TwentyOne = 21,
    /// 24 words (256-bit entropy)
    TwentyFour = 24,
}

impl WordCount {
    pub fn from_words(count: usize) -> Result<Self> {
        match count {
            12 => Ok(WordCount::Twelve),
            15 => Ok(WordCount::Fifteen),
            18 => Ok(WordCount::Eighteen),
            21 => Ok(WordCount::TwentyOne),
            24 => Ok(WordCount::TwentyFour),
            n => Err(WalletError::InvalidMnemonic(MnemonicFault::WordCount(n))),
        }
    }

    pub fn from_entropy_len(len: usize) -> Result<Self> {
        match len {
            16 => Ok(WordCount::Twelve),
            20 => Ok(WordCount::Fifteen),
            24 => Ok(WordCount::Eighteen),
            28 => Ok(WordCount::TwentyOne),
            32 => Ok(WordCount::TwentyFour),
            n => Err(WalletError::InvalidEntropyLength(n)),
        }
    }

    /// Maps an entropy strength in bits (128..=256, step 32).
    pub fn from_entropy_bits(bits: usize) -> Result<Self> {
        if bits % 8 != 0 {
            return Err(WalletError::InvalidEntropyStrength(bits));
        }
        Self::from_entropy_len(bits / 8).map_err(|_| WalletError::InvalidEntropyStrength(bits))
    }

    #[inline]
    pub const fn words(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn entropy_bytes(self) -> usize {
        self.words() * 4 / 3
    }

    #[inline]
    pub const fn checksum_bits(self) -> usize {
        self.entropy_bytes() / 4
    }
}

/// A checksummed BIP39 phrase.
///
/// The phrase is stored in canonical form (lowercase, single spaces) and is
/// wiped from memory on drop. `Debug` never prints it.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Mnemonic {
    phrase: String,
    #[zeroize(skip)]
    word_count: WordCount,
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mnemonic")
            .field("word_count", &self.word_count.words())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

impl Mnemonic {
    /// Encode entropy into a phrase.
    ///
    /// # Errors
    /// `InvalidEntropyLength` unless `entropy` is 16, 20, 24, 28 or 32 bytes.
    pub fn from_entropy(entropy: &[u8]) -> Result<Self> {
        let word_count = WordCount::from_entropy_len(entropy.len())?;
        let checksum = sha256(entropy)[0];

        let mut bits = Zeroizing::new(Vec::with_capacity(entropy.len() + 1));
        bits.extend_from_slice(entropy);
        bits.push(checksum);

        let words = wordlist();
        let phrase = (0..word_count.words())
            .map(|w| {
                let index = (0..BITS_PER_WORD)
                    .fold(0usize, |acc, b| (acc << 1) | bit_at(&bits, w * BITS_PER_WORD + b));
                words[index]
            })
            .collect::<Vec<_>>()
            .join(" ");

        Ok(Self { phrase, word_count })
    }

    /// Parse and fully validate a phrase: word count, wordlist membership and
    /// checksum. Whitespace is collapsed and words are matched case-insensitively.
    pub fn parse(phrase: &str) -> Result<Self> {
        let (entropy, word_count) = decode_words(phrase)?;
        drop(entropy);
        let canonical = phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Self { phrase: canonical, word_count })
    }

    /// Recover the entropy this phrase encodes.
    pub fn to_entropy(&self) -> Result<Zeroizing<Vec<u8>>> {
        decode(&self.phrase)
    }

    /// Whether `phrase` is a valid mnemonic.
    pub fn validate(phrase: &str) -> bool {
        decode_words(phrase).is_ok()
    }

    /// Canonical phrase text. Handle with care: this is the wallet secret.
    #[inline]
    pub fn phrase(&self) -> &str {
        &self.phrase
    }

    #[inline]
    pub fn word_count(&self) -> WordCount {
        self.word_count
    }

    pub fn words(&self) -> Vec<&str> {
        self.phrase.split(' ').collect()
    }

    pub fn strength_bits(&self) -> usize {
        self.word_count.entropy_bytes() * 8
    }
}

/// Encode `entropy` as a phrase. See [`Mnemonic::from_entropy`].
pub fn encode(entropy: &[u8]) -> Result<Mnemonic> {
    Mnemonic::from_entropy(entropy)
}

/// Decode a phrase back to its entropy.
///
/// # Errors
/// `InvalidMnemonic` for a bad word count, an unknown word or a checksum
/// mismatch.
pub fn decode(phrase: &str) -> Result<Zeroizing<Vec<u8>>> {
    decode_words(phrase).map(|(entropy, _)| entropy)
}

/// Best-effort phrase for arbitrary key material.
///
/// Takes the first [`TRUNCATED_ENTROPY_LEN`] bytes of `key_material` as
/// 128-bit entropy and encodes them. This is NOT an inverse of wallet
/// generation: the entropy behind a wallet is not recoverable from any key
/// derived from it, so the phrase returned here generally does not restore
/// the wallet the key came from.
pub fn entropy_to_mnemonic_truncated(key_material: &[u8]) -> Result<Mnemonic> {
    if key_material.len() < TRUNCATED_ENTROPY_LEN {
        return Err(WalletError::InvalidKeyMaterial(format!(
            "need at least {} bytes, got {}",
            TRUNCATED_ENTROPY_LEN,
            key_material.len()
        )));
    }
    Mnemonic::from_entropy(&key_material[..TRUNCATED_ENTROPY_LEN])
}

#[inline]
fn bit_at(data: &[u8], i: usize) -> usize {
    ((data[i / 8] >> (7 - i % 8)) & 1) as usize
}

fn decode_words(phrase: &str) -> Result<(Zeroizing<Vec<u8>>, WordCount)> {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let word_count = WordCount::from_words(words.len())?;

    let total_bits = word_count.words() * BITS_PER_WORD;
    let mut bits = Zeroizing::new(vec![0u8; (total_bits + 7) / 8]);
    for (pos, word) in words.iter().enumerate() {
        let lowered = Zeroizing::new(word.to_lowercase());
        let index = word_index(&lowered)
            .ok_or(WalletError::InvalidMnemonic(MnemonicFault::UnknownWord(pos)))?;
        for b in 0..BITS_PER_WORD {
            if (index >> (BITS_PER_WORD - 1 - b)) & 1 == 1 {
                let i = pos * BITS_PER_WORD + b;
                bits[i / 8] |= 1 << (7 - i % 8);
            }
        }
    }

    let entropy_len = word_count.entropy_bytes();
    let shift = 8 - word_count.checksum_bits();
    let embedded = bits[entropy_len] >> shift;
    let entropy = Zeroizing::new(bits[..entropy_len].to_vec());
    let expected = sha256(&entropy)[0] >> shift;
    if embedded != expected {
        return Err(WalletError::InvalidMnemonic(MnemonicFault::Checksum));
    }

    Ok((entropy, word_count))
}
