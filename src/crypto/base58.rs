//! Base58Check codec.
//!
//! Payloads (version byte followed by data) are suffixed with the first four
//! bytes of their double SHA-256 and rendered in the Bitcoin Base58 alphabet,
//! which leaves out `0`, `O`, `I` and `l`.

use subtle::ConstantTimeEq;

use crate::core::errors::{Result, WalletError};
use crate::crypto::hash::sha256d;

const ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const CHECKSUM_LEN: usize = 4;

fn checksum(payload: &[u8]) -> [u8; CHECKSUM_LEN] {
    let digest = sha256d(payload);
    [digest[0], digest[1], digest[2], digest[3]]
}

/// Encode `payload` with a trailing 4-byte checksum.
pub fn check_encode(payload: &[u8]) -> String {
    let mut data = Vec::with_capacity(payload.len() + CHECKSUM_LEN);
    data.extend_from_slice(payload);
    data.extend_from_slice(&checksum(payload));
    bs58::encode(data).with_alphabet(bs58::Alphabet::BITCOIN).into_string()
}

/// Decode a Base58Check string and return the payload without its checksum.
///
/// # Errors
/// * `InvalidCharacter` for any symbol outside the alphabet
/// * `InvalidPayloadLength` when the input is too short to hold a checksum
/// * `ChecksumMismatch` when the trailing 4 bytes do not match the payload
pub fn check_decode(input: &str) -> Result<Vec<u8>> {
    if let Some(bad) = input.chars().find(|c| !ALPHABET.contains(*c)) {
        return Err(WalletError::InvalidCharacter(bad));
    }

    let mut data = bs58::decode(input)
        .with_alphabet(bs58::Alphabet::BITCOIN)
        .into_vec()
        .map_err(|e| match e {
            bs58::decode::Error::InvalidCharacter { character, .. } => {
                WalletError::InvalidCharacter(character)
            }
            _ => WalletError::InvalidCharacter('\u{fffd}'),
        })?;

    if data.len() < CHECKSUM_LEN + 1 {
        return Err(WalletError::InvalidPayloadLength {
            expected: CHECKSUM_LEN + 1,
            found: data.len(),
        });
    }

    let split = data.len() - CHECKSUM_LEN;
    let expected = checksum(&data[..split]);
    if !bool::from(expected[..].ct_eq(&data[split..])) {
        return Err(WalletError::ChecksumMismatch);
    }

    data.truncate(split);
    Ok(data)
}
