//! End-to-end settlement scenarios.

use settla_core::{AccountReader, CoreError, Settlement};
use settla_crypto::{Ed25519Provider, Keypair, SigningProvider};
use settla_types::{
    Address, GenesisConfig, RejectReason, SignedTransaction, Transaction, MIN_TRANSFER_GAS, U256,
};
use std::sync::Arc;

const CHAIN_ID: u64 = 1337;
const GENESIS_BALANCE: u64 = 10_000_000;

fn u(v: u64) -> U256 {
    U256::from(v)
}

fn two_clients() -> (Settlement, Keypair, Keypair) {
    let a = Keypair::from_seed(&[0xA1; 32]);
    let b = Keypair::from_seed(&[0xB2; 32]);
    let genesis = GenesisConfig::new(CHAIN_ID)
        .with_alloc(a.address(), u(GENESIS_BALANCE))
        .with_alloc(b.address(), u(GENESIS_BALANCE));
    (Settlement::new(&genesis, Ed25519Provider).unwrap(), a, b)
}

fn sign(keypair: &Keypair, tx: Transaction, chain_id: u64) -> SignedTransaction {
    let signature = Ed25519Provider.sign(tx.signing_hash(chain_id).as_bytes(), keypair);
    SignedTransaction::new(tx, signature)
}

#[test]
fn test_scenario_a_then_b() {
    let (settlement, a, b) = two_clients();

    // A -> B 1000
    let receipt = settlement.submit_transaction(&a, b.address(), u(1000), 21_000, U256::ONE);
    assert!(receipt.is_applied());
    assert_eq!(receipt.gas_used, MIN_TRANSFER_GAS);
    assert_eq!(receipt.total_cost, u(21_000));
    settlement.commit_block();

    assert_eq!(settlement.current_balance(&a.address()), u(9_978_000));
    assert_eq!(settlement.current_balance(&b.address()), u(10_001_000));
    assert_eq!(settlement.query_nonce(&a.address()), 1);

    // B -> A 2000
    let receipt = settlement.submit_transaction(&b, a.address(), u(2000), 21_000, U256::ONE);
    assert!(receipt.is_applied());
    settlement.commit_block();

    assert_eq!(settlement.current_balance(&b.address()), u(9_978_000));
    assert_eq!(settlement.current_balance(&a.address()), u(9_980_000));
    assert_eq!(settlement.query_nonce(&b.address()), 1);
    assert_eq!(settlement.query_nonce(&a.address()), 1);

    assert_eq!(settlement.fees_burned(), u(42_000));
    assert_eq!(settlement.total_supply(), u(2 * GENESIS_BALANCE - 42_000));
}

#[test]
fn test_scenario_c_insufficient_funds() {
    let poor = Keypair::from_seed(&[0xC3; 32]);
    let genesis = GenesisConfig::new(CHAIN_ID).with_alloc(poor.address(), u(100));
    let settlement = Settlement::new(&genesis, Ed25519Provider).unwrap();
    let recipient = Address::from_bytes([7u8; 20]);

    let receipt = settlement.submit_transaction(&poor, recipient, u(50), 21_000, U256::ONE);
    assert_eq!(
        receipt.reject_reason(),
        Some(&RejectReason::InsufficientFunds {
            required: u(21_050),
            available: u(100),
        })
    );
    assert_eq!(settlement.current_balance(&poor.address()), u(100));
    assert_eq!(settlement.current_balance(&recipient), U256::ZERO);
    assert_eq!(settlement.query_nonce(&poor.address()), 0);
    assert_eq!(settlement.staged_len(), 0);
}

#[test]
fn test_scenario_d_stale_nonce() {
    let (settlement, a, b) = two_clients();
    assert!(settlement
        .submit_transaction(&a, b.address(), u(1), 21_000, U256::ONE)
        .is_applied());

    let balance_before = settlement.current_balance(&a.address());
    let stale = sign(
        &a,
        Transaction::new(0, b.address(), u(1), 21_000, U256::ONE),
        CHAIN_ID,
    );
    let receipt = settlement.submit(&stale);

    assert_eq!(
        receipt.reject_reason(),
        Some(&RejectReason::NonceMismatch { expected: 1, got: 0 })
    );
    assert_eq!(settlement.current_balance(&a.address()), balance_before);
    assert_eq!(settlement.query_nonce(&a.address()), 1);
}

#[test]
fn test_historical_balance_query() {
    let (settlement, a, b) = two_clients();

    settlement.submit_transaction(&a, b.address(), u(1000), 21_000, U256::ONE);
    settlement.commit_block();
    settlement.submit_transaction(&b, a.address(), u(2000), 21_000, U256::ONE);
    settlement.commit_block();

    assert_eq!(settlement.query_balance(&a.address(), 0), Ok(u(9_978_000)));
    assert_eq!(settlement.query_balance(&a.address(), 1), Ok(u(9_980_000)));
    assert_eq!(
        settlement.query_balance(&a.address(), 5),
        Err(CoreError::BlockNotFound(5))
    );
    assert_eq!(settlement.chain().current_index(), Some(1));
}

#[test]
fn test_block_is_not_a_live_alias() {
    let (settlement, a, b) = two_clients();
    let block = settlement.commit_block();

    settlement.submit_transaction(&a, b.address(), u(1000), 21_000, U256::ONE);

    assert_eq!(block.balance(&a.address()), u(GENESIS_BALANCE));
    assert_eq!(block.nonce(&a.address()), 0);
    assert_eq!(settlement.query_balance(&a.address(), 0), Ok(u(GENESIS_BALANCE)));
}

#[test]
fn test_empty_commit_advances_index() {
    let (settlement, _, _) = two_clients();
    assert_eq!(settlement.chain().current_index(), None);

    let first = settlement.commit_block();
    let second = settlement.commit_block();
    assert_eq!(first.index(), 0);
    assert_eq!(second.index(), 1);
    assert_eq!(second.tx_count(), 0);
    assert_eq!(first.header.state_root, second.header.state_root);
}

#[test]
fn test_rejected_transactions_stay_out_of_blocks() {
    let (settlement, a, b) = two_clients();

    settlement.submit_transaction(&a, b.address(), u(1), 20_000, U256::ONE);
    settlement.submit_transaction(&a, b.address(), u(1), 21_000, U256::ONE);
    let block = settlement.commit_block();

    assert_eq!(block.tx_count(), 1);
    assert_eq!(block.transactions[0].0.tx.gas_limit, 21_000);
}

#[test]
fn test_replay_across_blocks() {
    let (settlement, a, b) = two_clients();
    let stx = sign(
        &a,
        Transaction::new(0, b.address(), u(500), 21_000, U256::ONE),
        CHAIN_ID,
    );

    assert!(settlement.submit(&stx).is_applied());
    settlement.commit_block();
    assert!(matches!(
        settlement.submit(&stx).reject_reason(),
        Some(RejectReason::NonceMismatch { .. })
    ));
    assert_eq!(settlement.current_balance(&b.address()), u(GENESIS_BALANCE + 500));
}

#[test]
fn test_signature_for_other_chain_is_rejected() {
    let (settlement, a, b) = two_clients();
    let stx = sign(
        &a,
        Transaction::new(0, b.address(), u(500), 21_000, U256::ONE),
        CHAIN_ID + 1,
    );

    let receipt = settlement.submit(&stx);
    assert_eq!(receipt.reject_reason(), Some(&RejectReason::InvalidSignature));
    assert_eq!(receipt.sender, None);
    assert_eq!(settlement.current_balance(&a.address()), u(GENESIS_BALANCE));
}

#[test]
fn test_zero_gas_price_is_free() {
    let (settlement, a, b) = two_clients();
    let receipt = settlement.submit_transaction(&a, b.address(), u(10), 21_000, U256::ZERO);

    assert!(receipt.is_applied());
    assert_eq!(receipt.total_cost, U256::ZERO);
    assert_eq!(settlement.total_supply(), settlement.genesis_supply());
}

#[test]
fn test_gas_limit_above_minimum_only_charges_used_gas() {
    let (settlement, a, b) = two_clients();
    let receipt = settlement.submit_transaction(&a, b.address(), u(1000), 50_000, U256::ONE);

    assert!(receipt.is_applied());
    assert_eq!(receipt.total_cost, u(21_000));
    assert_eq!(settlement.current_balance(&a.address()), u(9_978_000));
}

#[test]
fn test_duplicate_genesis_rejected() {
    let a = Keypair::from_seed(&[1u8; 32]);
    let genesis = GenesisConfig::new(CHAIN_ID)
        .with_alloc(a.address(), u(1))
        .with_alloc(a.address(), u(1));
    assert!(matches!(
        Settlement::new(&genesis, Ed25519Provider),
        Err(CoreError::Genesis(_))
    ));
}

#[test]
fn test_concurrent_same_nonce_applies_once() {
    let (settlement, a, b) = two_clients();
    let settlement = Arc::new(settlement);
    let stx = sign(
        &a,
        Transaction::new(0, b.address(), u(1000), 21_000, U256::ONE),
        CHAIN_ID,
    );

    let applied: usize = std::thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| settlement.submit(&stx).is_applied()))
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum()
    });

    assert_eq!(applied, 1);
    assert_eq!(settlement.query_nonce(&a.address()), 1);
    assert_eq!(settlement.current_balance(&a.address()), u(9_978_000));
}

#[test]
fn test_concurrent_senders_conserve_value() {
    let senders: Vec<Keypair> = (0..6u8).map(|i| Keypair::from_seed(&[i + 10; 32])).collect();
    let genesis = senders.iter().fold(GenesisConfig::new(CHAIN_ID), |g, k| {
        g.with_alloc(k.address(), u(GENESIS_BALANCE))
    });
    let settlement = Settlement::new(&genesis, Ed25519Provider).unwrap();

    std::thread::scope(|s| {
        for (i, sender) in senders.iter().enumerate() {
            let recipient = senders[(i + 1) % senders.len()].address();
            let settlement = &settlement;
            s.spawn(move || {
                for _ in 0..10 {
                    let receipt =
                        settlement.submit_transaction(sender, recipient, u(7), 21_000, U256::ONE);
                    assert!(receipt.is_applied());
                }
            });
        }
        // Commits race with submissions.
        s.spawn(|| {
            for _ in 0..5 {
                settlement.commit_block();
            }
        });
    });
    settlement.commit_block();

    for sender in &senders {
        assert_eq!(settlement.query_nonce(&sender.address()), 10);
    }
    assert_eq!(settlement.fees_burned(), u(60 * 21_000));
    assert_eq!(
        settlement.total_supply().checked_add(&settlement.fees_burned()),
        Some(settlement.genesis_supply())
    );

    let chain = settlement.chain();
    assert!(chain.verify_links());
    let committed: usize = (0..chain.len() as u64)
        .filter_map(|i| chain.block(i))
        .map(|b| b.tx_count())
        .sum();
    assert_eq!(committed, 60);

    // The final snapshot agrees with the live ledger.
    let latest = chain.latest().unwrap();
    for sender in &senders {
        assert_eq!(
            latest.snapshot.balance(&sender.address()),
            settlement.current_balance(&sender.address())
        );
    }
    assert_eq!(
        latest.header.cumulative_fees_burned,
        settlement.fees_burned()
    );
}

#[test]
fn test_blocks_keep_sender_nonce_order() {
    let (settlement, a, b) = two_clients();
    for _ in 0..5 {
        settlement.submit_transaction(&a, b.address(), u(1), 21_000, U256::ONE);
    }
    let block = settlement.commit_block();

    let nonces: Vec<u64> = block.transactions.iter().map(|(stx, _)| stx.tx.nonce).collect();
    assert_eq!(nonces, vec![0, 1, 2, 3, 4]);
    assert_eq!(block.nonce(&a.address()), 5);
    assert_eq!(settlement.ledger().nonce(&a.address()), 5);
}
