use crate::address::Address;
use crate::hash::Hash;
use crate::u256::U256;
use std::fmt;

/// Gas consumed by a plain value transfer. Also the minimum gas limit a
/// transaction must carry.
pub const MIN_TRANSFER_GAS: u64 = 21_000;

/// Domain tag prepended to the signed payload.
const SIGNING_DOMAIN: &[u8] = b"settla-tx-v1";

/// Unsigned transfer request.
///
/// There is no sender field: the sender is whoever produced the signature
/// in [`SignedTransaction`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// Sender's nonce (must equal the sender's current ledger nonce)
    pub nonce: u64,
    /// Recipient address
    pub to: Address,
    /// Value to transfer
    pub value: U256,
    /// Maximum gas units this transaction may consume
    pub gas_limit: u64,
    /// Price paid per unit of gas
    pub gas_price: U256,
}

impl Transaction {
    pub fn new(nonce: u64, to: Address, value: U256, gas_limit: u64, gas_price: U256) -> Self {
        Self {
            nonce,
            to,
            value,
            gas_limit,
            gas_price,
        }
    }

    /// `value + gas_limit * gas_price`, or `None` if that overflows.
    pub fn max_charge(&self) -> Option<U256> {
        self.gas_price
            .checked_mul(&U256::from(self.gas_limit))
            .and_then(|gas| gas.checked_add(&self.value))
    }

    /// Chain-independent field encoding.
    pub fn encode(&self) -> Vec<u8> {
        let mut data = Vec::with_capacity(8 + 20 + 32 + 8 + 32);
        data.extend_from_slice(&self.nonce.to_le_bytes());
        data.extend_from_slice(self.to.as_bytes());
        data.extend_from_slice(&self.value.to_le_bytes());
        data.extend_from_slice(&self.gas_limit.to_le_bytes());
        data.extend_from_slice(&self.gas_price.to_le_bytes());
        data
    }

    /// Canonical message a sender signs for `chain_id`.
    pub fn signing_hash(&self, chain_id: u64) -> Hash {
        Hash::compute_multi(&[SIGNING_DOMAIN, &chain_id.to_le_bytes()[..], &self.encode()[..]])
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Transaction {{ nonce: {}, to: {}, value: {}, gas: {} @ {} }}",
            self.nonce, self.to, self.value, self.gas_limit, self.gas_price
        )
    }
}

/// Transaction with an opaque signature attached.
///
/// The signature format belongs to the signing provider; the core only hands
/// it back to the provider for sender recovery.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedTransaction {
    pub tx: Transaction,
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    pub fn new(tx: Transaction, signature: Vec<u8>) -> Self {
        Self { tx, signature }
    }

    /// Transaction hash, covering the fields and the signature.
    pub fn hash(&self) -> Hash {
        Hash::compute_multi(&[&self.tx.encode()[..], &self.signature[..]])
    }
}
