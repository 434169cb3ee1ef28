//! Derivation pipeline benchmarks.
//!
//! Seed stretching dominates every wallet operation; path derivation and
//! encoding should stay well under a millisecond.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use hd_wallet_core::core::bip32::ExtendedKey;
use hd_wallet_core::core::bip44::DerivationPath;
use hd_wallet_core::core::config::NetworkParams;
use hd_wallet_core::core::mnemonic::Mnemonic;
use hd_wallet_core::core::wallet::Wallet;
use hd_wallet_core::crypto::kdf::SeedStretcher;

const PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

fn bench_seed_stretch(c: &mut Criterion) {
    let mnemonic = Mnemonic::parse(PHRASE).expect("valid phrase");
    let stretcher = SeedStretcher::default();

    c.bench_function("stretch_seed_2048", |b| {
        b.iter(|| stretcher.stretch(black_box(&mnemonic), black_box("")))
    });
}

fn bench_path_derivation(c: &mut Criterion) {
    let mnemonic = Mnemonic::parse(PHRASE).expect("valid phrase");
    let seed = SeedStretcher::default().stretch(&mnemonic, "");
    let master = ExtendedKey::master_from_seed(&seed[..]).expect("master key");
    let path: DerivationPath = "m/44'/0'/0'/0/0".parse().expect("valid path");

    c.bench_function("derive_bip44_leaf", |b| {
        b.iter(|| master.derive_path(black_box(&path)).expect("derive failed"))
    });
}

fn bench_account_list(c: &mut Criterion) {
    let wallet = Wallet::with_network(NetworkParams::custom()).expect("default wallet");

    c.bench_function("derive_account_list", |b| {
        b.iter(|| wallet.derive_account_list(black_box(PHRASE)).expect("derive failed"))
    });
}

criterion_group!(benches, bench_seed_stretch, bench_path_derivation, bench_account_list);
criterion_main!(benches);
