pub mod base58;
pub mod hash;
pub mod kdf;

pub use self::kdf::{Seed, SeedStretcher};
