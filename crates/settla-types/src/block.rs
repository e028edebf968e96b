use crate::hash::Hash;
use crate::u256::U256;
use std::fmt;

/// Block header: position in the chain plus commitments to its contents.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct BlockHeader {
    /// Block index (height), monotonic from 0
    pub index: u64,
    /// Hash of the previous header (`Hash::ZERO` for block 0)
    pub parent_hash: Hash,
    /// Digest of the post-apply account snapshot
    pub state_root: Hash,
    /// Digest of the included transaction hashes, in order
    pub transactions_root: Hash,
    /// Number of included transactions
    pub tx_count: u32,
    /// Total gas used by the included transactions
    pub gas_used: u64,
    /// Fees removed from circulation by this block
    pub fees_burned: U256,
    /// Fees removed from circulation by this block and all before it
    pub cumulative_fees_burned: U256,
}

impl BlockHeader {
    pub fn compute_hash(&self) -> Hash {
        let mut data = Vec::with_capacity(8 + 32 * 3 + 4 + 8 + 32 * 2);
        data.extend_from_slice(&self.index.to_le_bytes());
        data.extend_from_slice(self.parent_hash.as_bytes());
        data.extend_from_slice(self.state_root.as_bytes());
        data.extend_from_slice(self.transactions_root.as_bytes());
        data.extend_from_slice(&self.tx_count.to_le_bytes());
        data.extend_from_slice(&self.gas_used.to_le_bytes());
        data.extend_from_slice(&self.fees_burned.to_le_bytes());
        data.extend_from_slice(&self.cumulative_fees_burned.to_le_bytes());
        Hash::compute(&data)
    }

    /// Ordered digest of transaction hashes. Empty blocks get `Hash::ZERO`.
    pub fn transactions_root_of(tx_hashes: &[Hash]) -> Hash {
        if tx_hashes.is_empty() {
            return Hash::ZERO;
        }
        let parts: Vec<&[u8]> = tx_hashes.iter().map(|h| h.as_ref()).collect();
        Hash::compute_multi(&parts)
    }
}

impl fmt::Display for BlockHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block {{ index: {}, hash: {}, txs: {}, gas_used: {} }}",
            self.index,
            self.compute_hash(),
            self.tx_count,
            self.gas_used
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_hash_deterministic() {
        let header = BlockHeader {
            index: 1,
            parent_hash: Hash::compute(b"parent"),
            ..Default::default()
        };
        assert!(!header.compute_hash().is_zero());
        assert_eq!(header.compute_hash(), header.clone().compute_hash());
        assert_ne!(header.compute_hash(), BlockHeader::default().compute_hash());
    }

    #[test]
    fn test_header_hash_binds_fees() {
        let a = BlockHeader::default();
        let mut b = a.clone();
        b.fees_burned = U256::from(21_000u64);
        assert_ne!(a.compute_hash(), b.compute_hash());
    }

    #[test]
    fn test_transactions_root() {
        assert!(BlockHeader::transactions_root_of(&[]).is_zero());

        let h1 = Hash::compute(b"tx1");
        let h2 = Hash::compute(b"tx2");
        let forward = BlockHeader::transactions_root_of(&[h1, h2]);
        let reverse = BlockHeader::transactions_root_of(&[h2, h1]);
        assert!(!forward.is_zero());
        assert_ne!(forward, reverse);
    }
}
