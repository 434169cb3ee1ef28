//! Secret handling helpers
//!
//! Zeroizing buffers for key material and redaction for anything that
//! might otherwise reach a log line.

pub mod redaction;
pub mod secret;

pub use redaction::{redact_body, redact_hex_bytes, redact_phrase};
pub use secret::{secret_from_hex, Secret32, SecretVec};
