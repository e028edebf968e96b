//! Block chain: an append-only list of committed blocks.

use crate::error::CoreError;
use crate::ledger::{AccountReader, LedgerSnapshot};
use parking_lot::RwLock;
use settla_types::{Address, BlockHeader, Hash, SignedTransaction, TransactionReceipt, U256};
use std::sync::Arc;

/// A committed block. Never modified after commit.
#[derive(Debug, Clone)]
pub struct Block {
    pub header: BlockHeader,
    /// Applied transactions in execution order
    pub transactions: Vec<(SignedTransaction, TransactionReceipt)>,
    /// Ledger state right after this block's transactions
    pub snapshot: LedgerSnapshot,
}

impl Block {
    pub fn hash(&self) -> Hash {
        self.header.compute_hash()
    }

    pub fn index(&self) -> u64 {
        self.header.index
    }

    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn balance(&self, address: &Address) -> U256 {
        self.snapshot.balance(address)
    }

    pub fn nonce(&self, address: &Address) -> u64 {
        self.snapshot.nonce(address)
    }
}

/// Commits batches into blocks and answers queries against past blocks.
#[derive(Debug, Default)]
pub struct BlockCommitter {
    blocks: RwLock<Vec<Arc<Block>>>,
}

impl BlockCommitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seal `batch` on top of the current head.
    ///
    /// Rejected receipts in `batch` are dropped. An empty batch still
    /// produces a block.
    pub fn commit(
        &self,
        batch: Vec<(SignedTransaction, TransactionReceipt)>,
        snapshot: LedgerSnapshot,
    ) -> Arc<Block> {
        let transactions: Vec<_> = batch
            .into_iter()
            .filter(|(_, receipt)| receipt.is_applied())
            .collect();

        let mut blocks = self.blocks.write();
        let (index, parent_hash, cumulative_before) = match blocks.last() {
            Some(parent) => (
                parent.index() + 1,
                parent.hash(),
                parent.header.cumulative_fees_burned,
            ),
            None => (0, Hash::ZERO, U256::ZERO),
        };

        let fees_burned = sum_fees(&transactions);
        let tx_hashes: Vec<Hash> = transactions.iter().map(|(_, r)| r.tx_hash).collect();

        let header = BlockHeader {
            index,
            parent_hash,
            state_root: snapshot.state_root(),
            transactions_root: BlockHeader::transactions_root_of(&tx_hashes),
            tx_count: u32::try_from(transactions.len())
                .unwrap_or_else(|_| panic!("block {} exceeds u32::MAX transactions", index)),
            gas_used: transactions.iter().map(|(_, r)| r.gas_used).sum(),
            fees_burned,
            cumulative_fees_burned: cumulative_before
                .checked_add(&fees_burned)
                .unwrap_or_else(|| panic!("cumulative fees exceed U256::MAX at block {}", index)),
        };

        let block = Arc::new(Block {
            header,
            transactions,
            snapshot,
        });
        blocks.push(Arc::clone(&block));

        tracing::info!(
            index,
            hash = %block.hash(),
            txs = block.tx_count(),
            fees_burned = %block.header.fees_burned,
            "Block committed"
        );

        block
    }

    pub fn block(&self, index: u64) -> Option<Arc<Block>> {
        let i = usize::try_from(index).ok()?;
        self.blocks.read().get(i).cloned()
    }

    pub fn latest(&self) -> Option<Arc<Block>> {
        self.blocks.read().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Index of the newest block, `None` before the first commit.
    pub fn current_index(&self) -> Option<u64> {
        self.latest().map(|b| b.index())
    }

    /// Balance of `address` as of block `index`. No fallback to the head.
    pub fn balance_at(&self, address: &Address, index: u64) -> Result<U256, CoreError> {
        self.block(index)
            .map(|b| b.balance(address))
            .ok_or(CoreError::BlockNotFound(index))
    }

    pub fn nonce_at(&self, address: &Address, index: u64) -> Result<u64, CoreError> {
        self.block(index)
            .map(|b| b.nonce(address))
            .ok_or(CoreError::BlockNotFound(index))
    }

    /// Check parent links and cumulative fee totals across the whole chain.
    pub fn verify_links(&self) -> bool {
        let blocks = self.blocks.read();
        let mut parent_hash = Hash::ZERO;
        let mut cumulative = U256::ZERO;

        for (i, block) in blocks.iter().enumerate() {
            if block.index() != i as u64 || block.header.parent_hash != parent_hash {
                return false;
            }
            cumulative = match cumulative.checked_add(&block.header.fees_burned) {
                Some(total) if total == block.header.cumulative_fees_burned => total,
                _ => return false,
            };
            parent_hash = block.hash();
        }
        true
    }
}

fn sum_fees(transactions: &[(SignedTransaction, TransactionReceipt)]) -> U256 {
    transactions
        .iter()
        .try_fold(U256::ZERO, |acc, (_, r)| acc.checked_add(&r.total_cost))
        .unwrap_or_else(|| panic!("block fees exceed U256::MAX"))
}
