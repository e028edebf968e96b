use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use settla_core::{AccountLedger, Settlement};
use settla_crypto::{Ed25519Provider, Keypair};
use settla_types::{Address, GenesisConfig, U256};

fn funded_genesis(keys: &[Keypair]) -> GenesisConfig {
    keys.iter().fold(GenesisConfig::devnet(), |g, k| {
        g.with_alloc(k.address(), U256::from(1_000_000_000u64))
    })
}

fn bench_apply_transfer(c: &mut Criterion) {
    let mut group = c.benchmark_group("ledger");

    group.bench_function("apply_1k_transfers", |b| {
        b.iter_batched(
            || {
                let genesis = (0..100u8).fold(GenesisConfig::devnet(), |g, i| {
                    g.with_alloc(Address::from_bytes([i; 20]), U256::from(1_000_000u64))
                });
                AccountLedger::from_genesis(&genesis).unwrap()
            },
            |ledger| {
                for i in 0..1000u32 {
                    let from = Address::from_bytes([(i % 100) as u8; 20]);
                    let to = Address::from_bytes([((i + 1) % 100) as u8; 20]);
                    let _ = ledger.apply_transfer(&from, &to, U256::ONE, U256::ONE);
                }
                black_box(ledger.total_supply());
            },
            BatchSize::SmallInput,
        )
    });

    group.bench_function("snapshot_under_writes", |b| {
        let genesis = (0..200u8).fold(GenesisConfig::devnet(), |g, i| {
            g.with_alloc(Address::from_bytes([i; 20]), U256::from(1_000_000u64))
        });
        let ledger = AccountLedger::from_genesis(&genesis).unwrap();
        b.iter(|| {
            let snapshot = ledger.snapshot();
            let _ = ledger.apply_transfer(
                &Address::from_bytes([1; 20]),
                &Address::from_bytes([2; 20]),
                U256::ONE,
                U256::ZERO,
            );
            black_box(snapshot.len())
        })
    });

    group.finish();
}

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("settlement");
    let keys: Vec<Keypair> = (0..8u8).map(|i| Keypair::from_seed(&[i + 1; 32])).collect();

    group.bench_function("submit_and_commit_100", |b| {
        b.iter_batched(
            || Settlement::new(&funded_genesis(&keys), Ed25519Provider).unwrap(),
            |settlement| {
                for i in 0..100 {
                    let from = &keys[i % keys.len()];
                    let to = keys[(i + 1) % keys.len()].address();
                    settlement.submit_transaction(from, to, U256::ONE, 21_000, U256::ONE);
                }
                black_box(settlement.commit_block());
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_apply_transfer, bench_submit);
criterion_main!(benches);
