use tracing::{debug, info};

use super::{Subaddress, Wallet};
use crate::core::bip32::ExtendedKey;
use crate::core::errors::Result;
use crate::security::{redact_hex_bytes, secret_from_hex};

impl Wallet {
    /// Address two non-hardened levels (`0/0`) below a bare private key.
    ///
    /// `chain_code_hex` defaults to 32 zero bytes, which is what a bare key
    /// carries when it is lifted into the tree.
    ///
    /// # Errors
    /// `InvalidKeyMaterial` unless the key is 32 bytes of hex holding a valid
    /// scalar (and the chain code, if given, is 32 bytes of hex).
    pub fn derive_subaddress(
        &self,
        private_key_hex: &str,
        chain_code_hex: Option<&str>,
    ) -> Result<Subaddress> {
        let private_key = secret_from_hex(private_key_hex, "private key")?;
        let chain_code = match chain_code_hex {
            Some(code) => *secret_from_hex(code, "chain code")?,
            None => [0u8; 32],
        };

        debug!("Deriving subaddress below key {}", redact_hex_bytes(&private_key[..]));
        let parent = ExtendedKey::from_private_key(&private_key[..], chain_code)?;
        let child = parent.derive_child(0, false)?.derive_child(0, false)?;

        let sub_address = self.address_of(&child);
        info!("Derived subaddress {}", sub_address);
        Ok(Subaddress { sub_address })
    }
}
