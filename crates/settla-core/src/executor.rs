//! Execution engine: validate then apply, one sender at a time.

use crate::ledger::{AccountLedger, AccountReader};
use crate::validator::TransactionValidator;
use dashmap::DashMap;
use parking_lot::Mutex;
use settla_crypto::SigningProvider;
use settla_types::{
    Address, RejectReason, SignedTransaction, TransactionReceipt, MIN_TRANSFER_GAS, U256,
};
use std::sync::Arc;

/// Applies signed transfers to a shared ledger.
///
/// Everything done on behalf of one sender (nonce read, validation, apply)
/// happens while holding that sender's lock. Different senders only meet in
/// the ledger's write section.
pub struct ExecutionEngine<P> {
    validator: TransactionValidator<P>,
    ledger: Arc<AccountLedger>,
    sender_locks: DashMap<Address, Arc<Mutex<()>>>,
}

impl<P: SigningProvider> ExecutionEngine<P> {
    pub fn new(ledger: Arc<AccountLedger>, provider: P, chain_id: u64) -> Self {
        Self {
            validator: TransactionValidator::new(provider, chain_id),
            ledger,
            sender_locks: DashMap::new(),
        }
    }

    pub fn ledger(&self) -> &Arc<AccountLedger> {
        &self.ledger
    }

    pub fn validator(&self) -> &TransactionValidator<P> {
        &self.validator
    }

    pub fn chain_id(&self) -> u64 {
        self.validator.chain_id()
    }

    /// Validate and apply `stx`.
    pub fn submit(&self, stx: &SignedTransaction) -> TransactionReceipt {
        self.submit_with(stx, |_, _| {})
    }

    /// Like [`submit`](Self::submit), calling `on_applied` for an applied
    /// transaction while the sender lock is still held.
    pub fn submit_with<F>(&self, stx: &SignedTransaction, on_applied: F) -> TransactionReceipt
    where
        F: FnOnce(&SignedTransaction, &TransactionReceipt),
    {
        let sender = match self.validator.recover_sender(stx) {
            Ok(sender) => sender,
            Err(reason) => {
                tracing::warn!(tx = %stx.hash(), %reason, "Transaction rejected");
                return TransactionReceipt::rejected(stx.hash(), None, reason);
            }
        };

        let lock = self.sender_lock(&sender);
        let guard = lock.lock();
        let receipt = self.execute(stx, sender, on_applied);
        drop(guard);

        if !receipt.is_applied() {
            self.release_sender_lock(&sender, lock);
        }
        receipt
    }

    /// Read `sender`'s next nonce, build a transaction with it and submit it,
    /// all under the sender lock so concurrent callers never race for a nonce.
    pub fn submit_next<B, F>(
        &self,
        sender: Address,
        build: B,
        on_applied: F,
    ) -> (SignedTransaction, TransactionReceipt)
    where
        B: FnOnce(u64) -> SignedTransaction,
        F: FnOnce(&SignedTransaction, &TransactionReceipt),
    {
        let lock = self.sender_lock(&sender);
        let guard = lock.lock();

        let stx = build(self.ledger.nonce(&sender));
        match self.validator.recover_sender(&stx) {
            Ok(recovered) if recovered == sender => {
                let receipt = self.execute(&stx, sender, on_applied);
                drop(guard);
                if !receipt.is_applied() {
                    self.release_sender_lock(&sender, lock);
                }
                (stx, receipt)
            }
            _ => {
                // Signed by someone else (or not at all): take the normal path.
                drop(guard);
                self.release_sender_lock(&sender, lock);
                let receipt = self.submit_with(&stx, on_applied);
                (stx, receipt)
            }
        }
    }

    /// Number of senders holding a lock entry.
    ///
    /// Entries for rejected submissions are released once no other caller
    /// is waiting on them, so unfunded signers do not accumulate here.
    pub fn known_senders(&self) -> usize {
        self.sender_locks.len()
    }

    fn sender_lock(&self, sender: &Address) -> Arc<Mutex<()>> {
        // Clone out of the map so no shard lock is held while we block.
        self.sender_locks
            .entry(*sender)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone()
    }

    /// Drop the map entry for `sender` if `lock` is its only other holder.
    /// Must be called after the guard on `lock` is released.
    fn release_sender_lock(&self, sender: &Address, lock: Arc<Mutex<()>>) {
        // The check runs under the shard lock, so no caller can clone the
        // entry between the count and the removal.
        self.sender_locks.remove_if(sender, |_, held| {
            Arc::ptr_eq(held, &lock) && Arc::strong_count(held) == 2
        });
    }

    /// Caller holds the lock for `sender`.
    fn execute<F>(&self, stx: &SignedTransaction, sender: Address, on_applied: F) -> TransactionReceipt
    where
        F: FnOnce(&SignedTransaction, &TransactionReceipt),
    {
        let tx_hash = stx.hash();
        let tx = &stx.tx;

        let validated = match self.validator.validate_from(&*self.ledger, tx, sender) {
            Ok(validated) => validated,
            Err(reason) => {
                tracing::warn!(tx = %tx_hash, %sender, %reason, "Transaction rejected");
                return TransactionReceipt::rejected(tx_hash, Some(sender), reason);
            }
        };
        let sender = validated.sender;
        tracing::debug!(
            tx = %tx_hash,
            %sender,
            nonce = tx.nonce,
            max_charge = %validated.max_charge,
            "Transaction validated"
        );

        let gas_used = MIN_TRANSFER_GAS;
        let result = tx
            .gas_price
            .checked_mul(&U256::from(gas_used))
            .ok_or(RejectReason::Overflow)
            .and_then(|fee| {
                self.ledger
                    .apply_transfer(&sender, &tx.to, tx.value, fee)
                    .map(|()| fee)
            });

        match result {
            Ok(total_cost) => {
                tracing::info!(
                    tx = %tx_hash,
                    from = %sender,
                    to = %tx.to,
                    value = %tx.value,
                    fee = %total_cost,
                    "Transfer applied"
                );
                let receipt = TransactionReceipt::applied(tx_hash, sender, gas_used, total_cost);
                on_applied(stx, &receipt);
                receipt
            }
            Err(reason) => {
                tracing::warn!(tx = %tx_hash, %sender, %reason, "Transfer failed at apply");
                TransactionReceipt::rejected(tx_hash, Some(sender), reason)
            }
        }
    }
}
