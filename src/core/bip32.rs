//! BIP32 extended key tree.
//!
//! Derivation is a fold over a path: every child is an independent value
//! computed from its parent, and nothing keeps a reference back up the tree.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, NonZeroScalar, ProjectivePoint, PublicKey, Scalar, SecretKey};
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::core::bip44::DerivationPath;
use crate::core::config::NetworkParams;
use crate::core::errors::{Result, WalletError};
use crate::crypto::base58;
use crate::crypto::hash::{hash160, hmac_sha512};

/// First hardened child index.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// Size of a serialized extended key (before Base58Check).
pub const SERIALIZED_LEN: usize = 78;

const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

const MIN_SEED_LEN: usize = 16;
const MAX_SEED_LEN: usize = 64;

/// One level of a derivation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildNumber {
    index: u32,
    hardened: bool,
}

impl ChildNumber {
    /// # Errors
    /// `InvalidPath` if `index` does not fit in 31 bits.
    pub fn new(index: u32, hardened: bool) -> Result<Self> {
        if index >= HARDENED_OFFSET {
            return Err(WalletError::InvalidPath(format!("child index {} out of range", index)));
        }
        Ok(Self { index, hardened })
    }

    pub fn normal(index: u32) -> Result<Self> {
        Self::new(index, false)
    }

    pub fn hardened(index: u32) -> Result<Self> {
        Self::new(index, true)
    }

    /// Decode the raw 32-bit form, where the top bit marks hardening.
    pub fn from_raw(raw: u32) -> Self {
        Self {
            index: raw & !HARDENED_OFFSET,
            hardened: raw & HARDENED_OFFSET != 0,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    pub fn to_raw(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl std::fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

#[derive(Clone)]
enum KeyMaterial {
    Private(SecretKey),
    Public(PublicKey),
}

/// A private or public key together with its chain code and position.
#[derive(Clone)]
pub struct ExtendedKey {
    key: KeyMaterial,
    chain_code: Zeroizing<[u8; 32]>,
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: ChildNumber,
}

impl std::fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ExtendedKey");
        match &self.key {
            KeyMaterial::Private(_) => s.field("private_key", &"[REDACTED]"),
            KeyMaterial::Public(_) => s.field("public_key", &hex::encode(self.public_key_bytes())),
        };
        s.field("depth", &self.depth)
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint))
            .field("child_number", &self.child_number.to_string())
            .finish()
    }
}

impl PartialEq for ExtendedKey {
    fn eq(&self, other: &Self) -> bool {
        let same_key = match (&self.key, &other.key) {
            (KeyMaterial::Private(a), KeyMaterial::Private(b)) => {
                bool::from(a.to_bytes().as_slice().ct_eq(b.to_bytes().as_slice()))
            }
            (KeyMaterial::Public(a), KeyMaterial::Public(b)) => a == b,
            _ => false,
        };
        same_key
            && bool::from(self.chain_code[..].ct_eq(&other.chain_code[..]))
            && self.depth == other.depth
            && self.parent_fingerprint == other.parent_fingerprint
            && self.child_number == other.child_number
    }
}

impl Eq for ExtendedKey {}

fn split_hmac(output: &[u8; 64]) -> (&FieldBytes, Zeroizing<[u8; 32]>) {
    let mut chain_code = Zeroizing::new([0u8; 32]);
    chain_code.copy_from_slice(&output[32..]);
    (FieldBytes::from_slice(&output[..32]), chain_code)
}

impl ExtendedKey {
    /// Master key for `seed`.
    ///
    /// # Errors
    /// `InvalidSeed` when the seed is not 16..=64 bytes or yields a key that
    /// is zero or not below the curve order.
    pub fn master_from_seed(seed: &[u8]) -> Result<Self> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(WalletError::InvalidSeed(format!(
                "seed must be {}..={} bytes, got {}",
                MIN_SEED_LEN,
                MAX_SEED_LEN,
                seed.len()
            )));
        }

        let output = Zeroizing::new(hmac_sha512(MASTER_HMAC_KEY, seed)?);
        let (key_bytes, chain_code) = split_hmac(&output);
        let secret = SecretKey::from_bytes(key_bytes)
            .map_err(|_| WalletError::InvalidSeed("master key out of range".into()))?;

        Ok(Self {
            key: KeyMaterial::Private(secret),
            chain_code,
            depth: 0,
            parent_fingerprint: [0; 4],
            child_number: ChildNumber::from_raw(0),
        })
    }

    /// Root a tree at a bare private key.
    ///
    /// # Errors
    /// `InvalidKeyMaterial` unless `key` is exactly 32 bytes holding a
    /// non-zero scalar below the curve order.
    pub fn from_private_key(key: &[u8], chain_code: [u8; 32]) -> Result<Self> {
        if key.len() != 32 {
            return Err(WalletError::InvalidKeyMaterial(format!(
                "private key must be 32 bytes, got {}",
                key.len()
            )));
        }
        let secret = SecretKey::from_bytes(FieldBytes::from_slice(key)).map_err(|_| {
            WalletError::InvalidKeyMaterial("private key is not a valid secp256k1 scalar".into())
        })?;

        Ok(Self {
            key: KeyMaterial::Private(secret),
            chain_code: Zeroizing::new(chain_code),
            depth: 0,
            parent_fingerprint: [0; 4],
            child_number: ChildNumber::from_raw(0),
        })
    }

    /// Derive one child.
    ///
    /// # Errors
    /// * `InvalidPath` if `index` does not fit in 31 bits
    /// * `InvalidDerivation` for hardened derivation from a public key, or
    ///   when the tweak is not below the curve order or the child key is zero
    pub fn derive_child(&self, index: u32, hardened: bool) -> Result<Self> {
        self.derive(ChildNumber::new(index, hardened)?)
    }

    pub fn derive(&self, child: ChildNumber) -> Result<Self> {
        let depth = self
            .depth
            .checked_add(1)
            .ok_or_else(|| WalletError::InvalidDerivation("maximum depth reached".into()))?;

        let mut data = Zeroizing::new(Vec::with_capacity(37));
        if child.is_hardened() {
            match &self.key {
                KeyMaterial::Private(secret) => {
                    data.push(0x00);
                    data.extend_from_slice(&secret.to_bytes());
                }
                KeyMaterial::Public(_) => {
                    return Err(WalletError::InvalidDerivation(
                        "hardened child requires a private parent".into(),
                    ));
                }
            }
        } else {
            data.extend_from_slice(&self.public_key_bytes());
        }
        data.extend_from_slice(&child.to_raw().to_be_bytes());

        let output = Zeroizing::new(hmac_sha512(&self.chain_code[..], &data)?);
        let (tweak_bytes, chain_code) = split_hmac(&output);
        let tweak: Scalar = Option::from(Scalar::from_repr(*tweak_bytes))
            .ok_or_else(|| WalletError::InvalidDerivation("tweak exceeds curve order".into()))?;

        let key = match &self.key {
            KeyMaterial::Private(secret) => {
                let sum = tweak + *secret.to_nonzero_scalar();
                let scalar: NonZeroScalar = Option::from(NonZeroScalar::new(sum))
                    .ok_or_else(|| WalletError::InvalidDerivation("derived key is zero".into()))?;
                KeyMaterial::Private(SecretKey::from(scalar))
            }
            KeyMaterial::Public(public) => {
                let point = ProjectivePoint::GENERATOR * tweak + public.to_projective();
                let public = PublicKey::from_affine(point.to_affine()).map_err(|_| {
                    WalletError::InvalidDerivation("derived point is at infinity".into())
                })?;
                KeyMaterial::Public(public)
            }
        };

        Ok(Self {
            key,
            chain_code,
            depth,
            parent_fingerprint: self.fingerprint(),
            child_number: child,
        })
    }

    /// Walk `path` from this key, stopping at the first failing level.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self> {
        path.iter().try_fold(self.clone(), |key, child| key.derive(*child))
    }

    /// The neutered key: same chain code and position, public key only.
    pub fn to_public(&self) -> Self {
        Self {
            key: KeyMaterial::Public(self.public_key()),
            chain_code: self.chain_code.clone(),
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self.key, KeyMaterial::Private(_))
    }

    pub fn public_key(&self) -> PublicKey {
        match &self.key {
            KeyMaterial::Private(secret) => secret.public_key(),
            KeyMaterial::Public(public) => public.clone(),
        }
    }

    /// SEC1 compressed public key.
    pub fn public_key_bytes(&self) -> [u8; 33] {
        let point = self.public_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// Big-endian private scalar, or `None` for a public key.
    pub fn private_key_bytes(&self) -> Option<Zeroizing<[u8; 32]>> {
        match &self.key {
            KeyMaterial::Private(secret) => {
                let mut out = Zeroizing::new([0u8; 32]);
                out.copy_from_slice(&secret.to_bytes());
                Some(out)
            }
            KeyMaterial::Public(_) => None,
        }
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.chain_code
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.parent_fingerprint
    }

    pub fn child_number(&self) -> ChildNumber {
        self.child_number
    }

    /// Hash160 of the compressed public key.
    pub fn identifier(&self) -> [u8; 20] {
        hash160(&self.public_key_bytes())
    }

    pub fn fingerprint(&self) -> [u8; 4] {
        let id = self.identifier();
        [id[0], id[1], id[2], id[3]]
    }

    /// xprv/xpub string using the profile's BIP32 version prefixes.
    pub fn to_base58(&self, params: &NetworkParams) -> String {
        let mut data = Zeroizing::new(Vec::with_capacity(SERIALIZED_LEN));
        let version = if self.is_private() { params.bip32_private } else { params.bip32_public };
        data.extend_from_slice(&version.to_be_bytes());
        data.push(self.depth);
        data.extend_from_slice(&self.parent_fingerprint);
        data.extend_from_slice(&self.child_number.to_raw().to_be_bytes());
        data.extend_from_slice(&self.chain_code[..]);
        match &self.key {
            KeyMaterial::Private(secret) => {
                data.push(0x00);
                data.extend_from_slice(&secret.to_bytes());
            }
            KeyMaterial::Public(_) => data.extend_from_slice(&self.public_key_bytes()),
        }
        base58::check_encode(&data)
    }

    /// Parse an xprv/xpub string produced under `params`.
    ///
    /// # Errors
    /// Base58Check errors, `InvalidPayloadLength`, `InvalidVersion` for a
    /// prefix from another profile, and `InvalidKeyMaterial` for a bad key or
    /// an inconsistent depth-0 header.
    pub fn from_base58(encoded: &str, params: &NetworkParams) -> Result<Self> {
        let data = Zeroizing::new(base58::check_decode(encoded)?);
        if data.len() != SERIALIZED_LEN {
            return Err(WalletError::InvalidPayloadLength {
                expected: SERIALIZED_LEN,
                found: data.len(),
            });
        }

        let version = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
        let depth = data[4];
        let parent_fingerprint = [data[5], data[6], data[7], data[8]];
        let child_number =
            ChildNumber::from_raw(u32::from_be_bytes([data[9], data[10], data[11], data[12]]));
        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(&data[13..45]);

        if depth == 0 && (parent_fingerprint != [0; 4] || child_number.to_raw() != 0) {
            return Err(WalletError::InvalidKeyMaterial(
                "master key with non-zero parent fingerprint or index".into(),
            ));
        }

        let key = if version == params.bip32_private {
            if data[45] != 0x00 {
                return Err(WalletError::InvalidKeyMaterial("private key prefix must be 0x00".into()));
            }
            let secret = SecretKey::from_bytes(FieldBytes::from_slice(&data[46..])).map_err(|_| {
                WalletError::InvalidKeyMaterial("private key is not a valid secp256k1 scalar".into())
            })?;
            KeyMaterial::Private(secret)
        } else if version == params.bip32_public {
            let public = PublicKey::from_sec1_bytes(&data[45..])
                .map_err(|_| WalletError::InvalidKeyMaterial("invalid public key point".into()))?;
            KeyMaterial::Public(public)
        } else {
            return Err(WalletError::InvalidVersion { expected: params.bip32_public, found: version });
        };

        Ok(Self { key, chain_code, depth, parent_fingerprint, child_number })
    }
}
