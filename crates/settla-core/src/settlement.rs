//! Settlement facade.
//!
//! Wires ledger, execution engine and block committer together. Applied
//! transactions are staged until [`Settlement::commit_block`] seals them.

use crate::chain::{Block, BlockCommitter};
use crate::error::CoreError;
use crate::executor::ExecutionEngine;
use crate::ledger::{AccountLedger, AccountReader};
use parking_lot::{Mutex, RwLock};
use settla_crypto::{Ed25519Provider, SigningProvider};
use settla_types::{
    Address, GenesisConfig, SignedTransaction, Transaction, TransactionReceipt, U256,
};
use std::sync::Arc;

type Staged = Vec<(SignedTransaction, TransactionReceipt)>;

/// Settlement engine.
pub struct Settlement<P = Ed25519Provider> {
    engine: ExecutionEngine<P>,
    ledger: Arc<AccountLedger>,
    chain: BlockCommitter,
    staged: Mutex<Staged>,
    fees_burned: Mutex<U256>,
    genesis_supply: U256,
    /// Submissions hold it shared; commits hold it exclusively so a block's
    /// snapshot always matches its transactions.
    commit_gate: RwLock<()>,
}

impl<P: SigningProvider> Settlement<P> {
    /// Build a settlement engine from genesis.
    pub fn new(genesis: &GenesisConfig, provider: P) -> Result<Self, CoreError> {
        let ledger = Arc::new(AccountLedger::from_genesis(genesis)?);
        let genesis_supply = genesis.total_supply()?;

        tracing::info!(
            chain_id = genesis.chain_id,
            accounts = genesis.alloc.len(),
            supply = %genesis_supply,
            "Settlement engine initialized"
        );

        Ok(Self {
            engine: ExecutionEngine::new(Arc::clone(&ledger), provider, genesis.chain_id),
            ledger,
            chain: BlockCommitter::new(),
            staged: Mutex::new(Vec::new()),
            fees_burned: Mutex::new(U256::ZERO),
            genesis_supply,
            commit_gate: RwLock::new(()),
        })
    }

    pub fn chain_id(&self) -> u64 {
        self.engine.chain_id()
    }

    /// Sign a transfer with the sender's next nonce and submit it.
    pub fn submit_transaction(
        &self,
        keypair: &P::Keypair,
        recipient: Address,
        value: U256,
        gas_limit: u64,
        gas_price: U256,
    ) -> TransactionReceipt {
        let _gate = self.commit_gate.read();
        let provider = self.engine.validator().provider();
        let chain_id = self.chain_id();
        let sender = provider.address(keypair);

        let (_, receipt) = self.engine.submit_next(
            sender,
            |nonce| {
                let tx = Transaction::new(nonce, recipient, value, gas_limit, gas_price);
                let signature = provider.sign(tx.signing_hash(chain_id).as_bytes(), keypair);
                SignedTransaction::new(tx, signature)
            },
            |stx, receipt| self.stage(stx, receipt),
        );
        receipt
    }

    /// Submit an already signed transaction.
    pub fn submit(&self, stx: &SignedTransaction) -> TransactionReceipt {
        let _gate = self.commit_gate.read();
        self.engine
            .submit_with(stx, |stx, receipt| self.stage(stx, receipt))
    }

    /// Seal everything staged so far into a new block.
    pub fn commit_block(&self) -> Arc<Block> {
        let _gate = self.commit_gate.write();
        let batch = std::mem::take(&mut *self.staged.lock());
        self.chain.commit(batch, self.ledger.snapshot())
    }

    /// Balance of `address` as of block `block_index`.
    pub fn query_balance(&self, address: &Address, block_index: u64) -> Result<U256, CoreError> {
        self.chain.balance_at(address, block_index)
    }

    /// Next nonce for `address`, including staged transactions.
    pub fn query_nonce(&self, address: &Address) -> u64 {
        self.ledger.nonce(address)
    }

    /// Live balance, including staged transactions.
    pub fn current_balance(&self, address: &Address) -> U256 {
        self.ledger.balance(address)
    }

    pub fn total_supply(&self) -> U256 {
        self.ledger.total_supply()
    }

    /// Sum of all gas fees charged so far.
    pub fn fees_burned(&self) -> U256 {
        *self.fees_burned.lock()
    }

    pub fn genesis_supply(&self) -> U256 {
        self.genesis_supply
    }

    /// Applied transactions waiting for the next block.
    pub fn staged_len(&self) -> usize {
        self.staged.lock().len()
    }

    pub fn chain(&self) -> &BlockCommitter {
        &self.chain
    }

    pub fn ledger(&self) -> &AccountLedger {
        &self.ledger
    }

    // Runs under the sender lock, so one sender's transactions are staged in
    // nonce order.
    fn stage(&self, stx: &SignedTransaction, receipt: &TransactionReceipt) {
        {
            let mut burned = self.fees_burned.lock();
            *burned = burned
                .checked_add(&receipt.total_cost)
                .unwrap_or_else(|| panic!("fees burned exceed U256::MAX"));
        }
        self.staged.lock().push((stx.clone(), receipt.clone()));
    }
}
