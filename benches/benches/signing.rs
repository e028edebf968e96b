use criterion::{black_box, criterion_group, criterion_main, Criterion};
use settla_crypto::{Ed25519Provider, Keypair, SigningProvider};
use settla_types::{Address, Transaction, U256};

fn bench_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("ed25519_provider");
    let provider = Ed25519Provider::new();
    let keypair = Keypair::from_seed(&[7u8; 32]);
    let tx = Transaction::new(0, Address::from_bytes([2u8; 20]), U256::from(1000u64), 21_000, U256::ONE);
    let message = tx.signing_hash(1337);
    let signature = provider.sign(message.as_bytes(), &keypair);

    group.bench_function("sign", |b| {
        b.iter(|| black_box(provider.sign(black_box(message.as_bytes()), &keypair)))
    });

    group.bench_function("recover_address", |b| {
        b.iter(|| black_box(provider.recover_address(&signature, message.as_bytes())))
    });

    group.bench_function("signing_hash", |b| {
        b.iter(|| black_box(tx.signing_hash(black_box(1337))))
    });

    group.finish();
}

criterion_group!(benches, bench_signing);
criterion_main!(benches);
