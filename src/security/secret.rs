//! Secret buffers that are zeroized on drop, and parsing into them.
use zeroize::Zeroizing;

use crate::core::errors::{Result, WalletError};

/// Common alias for secret byte buffers which will be zeroed when dropped.
pub type SecretVec = Zeroizing<Vec<u8>>;

/// Fixed-size secret (private key, chain code).
pub type Secret32 = Zeroizing<[u8; 32]>;

/// Parse 32 bytes of hex (optional `0x` prefix) straight into a zeroizing
/// buffer. `what` names the value in the error message.
pub fn secret_from_hex(input: &str, what: &str) -> Result<Secret32> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let bytes: SecretVec = Zeroizing::new(hex::decode(digits)?);
    if bytes.len() != 32 {
        return Err(WalletError::InvalidKeyMaterial(format!(
            "{} must be 32 bytes, got {}",
            what,
            bytes.len()
        )));
    }
    let mut out = Zeroizing::new([0u8; 32]);
    out.copy_from_slice(&bytes);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_from_hex() {
        let key = secret_from_hex(&format!("0x{}", "11".repeat(32)), "key").unwrap();
        assert_eq!(*key, [0x11; 32]);
        assert_eq!(*secret_from_hex(&format!(" {} ", "ab".repeat(32)), "key").unwrap(), [0xab; 32]);
    }

    #[test]
    fn test_secret_from_hex_errors_name_the_value() {
        let err = secret_from_hex("abcd", "chain code").unwrap_err();
        assert_eq!(err.to_string(), "Invalid key material: chain code must be 32 bytes, got 2");
        assert!(matches!(secret_from_hex("zz", "key"), Err(WalletError::InvalidKeyMaterial(_))));
    }
}
