//! Configuration loading from files and the environment.

use std::io::Write;

use hd_wallet_core::core::config::{
    AppConfig, NetworkParams, CONFIG_PATH_ENV, EXPLORER_URL_ENV, NETWORK_ENV,
};
use hd_wallet_core::{ErrorKind, Wallet};
use serial_test::serial;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn clear_env() {
    std::env::remove_var(CONFIG_PATH_ENV);
    std::env::remove_var(NETWORK_ENV);
    std::env::remove_var(EXPLORER_URL_ENV);
}

#[test]
fn load_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
[derivation]
account_count = 4

[explorer]
base_url = "http://localhost:3000"
"#,
    );

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.derivation.account_count, 4);
    assert_eq!(config.derivation.account_path, "m/44'/0'/0'/0");
    assert_eq!(config.explorer.base_url, "http://localhost:3000");
    assert_eq!(config.seed.pbkdf2_iterations, 2048);
    assert_eq!(config.network, NetworkParams::custom());
}

#[test]
fn load_full_network_section() {
    let file = write_config(
        r#"
[network]
name = "bitcoin"
message_prefix = "\u0018Bitcoin Signed Message:\n"
bech32_hrp = "bc"
bip32_public = 0x0488B21E
bip32_private = 0x0488ADE4
pub_key_hash = 0
script_hash = 5
wif = 0x80
"#,
    );

    let config = AppConfig::load(file.path()).unwrap();
    assert_eq!(config.network.pub_key_hash, 0);
    let wallet = Wallet::new(&config).unwrap();
    let recovered = wallet
        .recover("abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about")
        .unwrap();
    assert_eq!(recovered.address, "1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA");
}

#[test]
fn load_rejects_bad_values() {
    for contents in [
        "[derivation]\naccount_count = 0\n",
        "[derivation]\naccount_path = \"m/44'/x\"\n",
        "[derivation]\ndefault_entropy_bits = 100\n",
        "[seed]\npbkdf2_iterations = 0\n",
        "not toml at all [",
    ] {
        let file = write_config(contents);
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::Configuration | ErrorKind::InputValidation),
            "unexpected error for {:?}: {}",
            contents,
            err
        );
    }
}

#[test]
fn load_missing_file_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load(dir.path().join("absent.toml")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
}

#[test]
#[serial]
fn from_env_without_variables_is_default() {
    clear_env();
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.network, NetworkParams::custom());
    assert_eq!(config.derivation.account_count, 10);
}

#[test]
#[serial]
fn from_env_applies_overrides() {
    clear_env();
    let file = write_config("[derivation]\naccount_count = 2\n");
    std::env::set_var(CONFIG_PATH_ENV, file.path());
    std::env::set_var(NETWORK_ENV, "testnet");
    std::env::set_var(EXPLORER_URL_ENV, "http://127.0.0.1:9999");

    let config = AppConfig::from_env();
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.derivation.account_count, 2);
    assert_eq!(config.network, NetworkParams::testnet());
    assert_eq!(config.explorer.base_url, "http://127.0.0.1:9999");
}

#[test]
#[serial]
fn from_env_missing_file_falls_back() {
    clear_env();
    std::env::set_var(CONFIG_PATH_ENV, "/nonexistent/hd-wallet.toml");
    let config = AppConfig::from_env();
    clear_env();
    assert_eq!(config.unwrap().derivation.account_count, 10);
}

#[test]
#[serial]
fn from_env_unknown_network_is_error() {
    clear_env();
    std::env::set_var(NETWORK_ENV, "dogecoin");
    let result = AppConfig::from_env();
    clear_env();
    assert_eq!(result.unwrap_err().kind(), ErrorKind::Configuration);
}
