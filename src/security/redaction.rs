// Simple helpers to avoid accidental printing of secrets in logs.
use std::env;

const DEV_PRINT_SECRETS: &str = "DEV_PRINT_SECRETS";

fn dev_print_secrets() -> bool {
    env::var(DEV_PRINT_SECRETS).ok().as_deref() == Some("1")
}

/// Redact a text body unless DEV_PRINT_SECRETS=1 is set in the environment.
/// By default this returns a short placeholder containing only the length.
pub fn redact_body(s: &str) -> String {
    if dev_print_secrets() {
        return s.to_string();
    }
    format!("<redacted len={}>", s.len())
}

/// Redact a phrase, keeping only its word count.
pub fn redact_phrase(phrase: &str) -> String {
    if dev_print_secrets() {
        return phrase.to_string();
    }
    format!("<redacted words={}>", phrase.split_whitespace().count())
}

/// Redact hex-serializable bytes unless DEV_PRINT_SECRETS=1 is set.
pub fn redact_hex_bytes(bytes: &[u8]) -> String {
    if dev_print_secrets() {
        return format!("0x{}", hex::encode(bytes));
    }
    format!("<redacted hex len={}>", bytes.len())
}
