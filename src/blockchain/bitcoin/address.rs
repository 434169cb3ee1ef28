//! Pubkey-hash addresses and secret-key (WIF) encoding.
//!
//! Both are Base58Check strings whose first payload byte comes from the
//! network profile:
//! - address: pub_key_hash || Hash160(compressed pubkey)
//! - secret:  wif || privkey || 0x01 (the marker is omitted for uncompressed keys)

use k256::{FieldBytes, SecretKey};
use tracing::debug;
use zeroize::Zeroizing;

use crate::core::config::NetworkParams;
use crate::core::errors::{Result, WalletError};
use crate::crypto::base58;
use crate::crypto::hash::hash160;

const ADDRESS_PAYLOAD_LEN: usize = 21;
const SECRET_PAYLOAD_LEN: usize = 33;
const COMPRESSED_SECRET_PAYLOAD_LEN: usize = 34;
const COMPRESSION_MARKER: u8 = 0x01;

/// Address for a compressed public key under `params`.
pub fn to_address(public_key: &[u8; 33], params: &NetworkParams) -> String {
    to_address_with_version(public_key, params.pub_key_hash)
}

pub fn to_address_with_version(public_key: &[u8; 33], version: u8) -> String {
    let mut payload = Vec::with_capacity(ADDRESS_PAYLOAD_LEN);
    payload.push(version);
    payload.extend_from_slice(&hash160(public_key));
    let address = base58::check_encode(&payload);
    debug!("Encoded address {}", address);
    address
}

/// The 20-byte public key hash inside `address`.
///
/// # Errors
/// Base58Check errors, `InvalidPayloadLength`, or `InvalidVersion` when the
/// address belongs to another network.
pub fn decode_address(address: &str, params: &NetworkParams) -> Result<[u8; 20]> {
    let payload = base58::check_decode(address.trim())?;
    if payload.len() != ADDRESS_PAYLOAD_LEN {
        return Err(WalletError::InvalidPayloadLength {
            expected: ADDRESS_PAYLOAD_LEN,
            found: payload.len(),
        });
    }
    if payload[0] != params.pub_key_hash {
        return Err(WalletError::InvalidVersion {
            expected: params.pub_key_hash as u32,
            found: payload[0] as u32,
        });
    }
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&payload[1..]);
    Ok(hash)
}

/// Exportable encoding of a private key.
pub fn to_secret_encoding(private_key: &[u8; 32], params: &NetworkParams, compressed: bool) -> String {
    let mut payload = Zeroizing::new(Vec::with_capacity(COMPRESSED_SECRET_PAYLOAD_LEN));
    payload.push(params.wif);
    payload.extend_from_slice(private_key);
    if compressed {
        payload.push(COMPRESSION_MARKER);
    }
    base58::check_encode(&payload)
}

/// A private key recovered from its exportable encoding.
pub struct DecodedSecret {
    pub private_key: Zeroizing<[u8; 32]>,
    /// Whether the key is meant for a compressed public key.
    pub compressed: bool,
}

impl std::fmt::Debug for DecodedSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedSecret")
            .field("private_key", &"[REDACTED]")
            .field("compressed", &self.compressed)
            .finish()
    }
}

/// Reverse of [`to_secret_encoding`]. Accepts both compressed and
/// uncompressed forms.
///
/// # Errors
/// * Base58Check errors (`ChecksumMismatch`, `InvalidCharacter`)
/// * `InvalidVersion` if the version byte is not the profile's `wif`
/// * `InvalidPayloadLength` for anything but 33 or 34 payload bytes
/// * `InvalidKeyMaterial` for a bad compression marker or scalar
pub fn from_secret_encoding(encoded: &str, params: &NetworkParams) -> Result<DecodedSecret> {
    let payload = Zeroizing::new(base58::check_decode(encoded.trim())?);
    if payload[0] != params.wif {
        return Err(WalletError::InvalidVersion {
            expected: params.wif as u32,
            found: payload[0] as u32,
        });
    }

    let compressed = match payload.len() {
        SECRET_PAYLOAD_LEN => false,
        COMPRESSED_SECRET_PAYLOAD_LEN if payload[33] == COMPRESSION_MARKER => true,
        COMPRESSED_SECRET_PAYLOAD_LEN => {
            return Err(WalletError::InvalidKeyMaterial(format!(
                "unknown compression marker {:#04x}",
                payload[33]
            )));
        }
        found => {
            return Err(WalletError::InvalidPayloadLength {
                expected: COMPRESSED_SECRET_PAYLOAD_LEN,
                found,
            });
        }
    };

    SecretKey::from_bytes(FieldBytes::from_slice(&payload[1..33])).map_err(|_| {
        WalletError::InvalidKeyMaterial("private key is not a valid secp256k1 scalar".into())
    })?;

    let mut private_key = Zeroizing::new([0u8; 32]);
    private_key.copy_from_slice(&payload[1..33]);
    Ok(DecodedSecret { private_key, compressed })
}
