//! Bitcoin-style encodings
//!
//! - Legacy (P2PKH) address
//! - WIF secret key

pub mod address;

pub use address::{
    decode_address, from_secret_encoding, to_address, to_secret_encoding, DecodedSecret,
};
