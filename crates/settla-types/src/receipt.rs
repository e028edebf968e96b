use crate::address::Address;
use crate::hash::Hash;
use crate::u256::U256;
use std::fmt;
use thiserror::Error;

/// Why a transaction was not applied.
///
/// These are expected outcomes for malformed or stale input, reported in the
/// receipt rather than raised as faults.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RejectReason {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Gas limit too low: minimum {minimum}, got {got}")]
    GasLimitTooLow { minimum: u64, got: u64 },

    #[error("Nonce mismatch: expected {expected}, got {got}")]
    NonceMismatch { expected: u64, got: u64 },

    #[error("Arithmetic overflow computing transaction cost")]
    Overflow,

    #[error("Insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: U256, available: U256 },
}

/// Outcome recorded in a receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReceiptStatus {
    Applied,
    Rejected(RejectReason),
}

/// Outcome record of one submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Hash of the submitted transaction
    pub tx_hash: Hash,
    /// Recovered sender, `None` if the signature could not be recovered
    pub sender: Option<Address>,
    pub status: ReceiptStatus,
    /// Gas charged (0 when rejected)
    pub gas_used: u64,
    /// `gas_used * gas_price` removed from the sender (0 when rejected)
    pub total_cost: U256,
}

impl TransactionReceipt {
    pub fn applied(tx_hash: Hash, sender: Address, gas_used: u64, total_cost: U256) -> Self {
        Self {
            tx_hash,
            sender: Some(sender),
            status: ReceiptStatus::Applied,
            gas_used,
            total_cost,
        }
    }

    pub fn rejected(tx_hash: Hash, sender: Option<Address>, reason: RejectReason) -> Self {
        Self {
            tx_hash,
            sender,
            status: ReceiptStatus::Rejected(reason),
            gas_used: 0,
            total_cost: U256::ZERO,
        }
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.status, ReceiptStatus::Applied)
    }

    pub fn reject_reason(&self) -> Option<&RejectReason> {
        match &self.status {
            ReceiptStatus::Applied => None,
            ReceiptStatus::Rejected(reason) => Some(reason),
        }
    }
}

impl fmt::Display for TransactionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            ReceiptStatus::Applied => write!(
                f,
                "Receipt {{ tx: {}, status: applied, gas_used: {}, cost: {} }}",
                self.tx_hash, self.gas_used, self.total_cost
            ),
            ReceiptStatus::Rejected(reason) => write!(
                f,
                "Receipt {{ tx: {}, status: rejected ({}) }}",
                self.tx_hash, reason
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applied_receipt() {
        let sender = Address::from_bytes([1u8; 20]);
        let receipt =
            TransactionReceipt::applied(Hash::compute(b"tx"), sender, 21_000, U256::from(21_000u64));

        assert!(receipt.is_applied());
        assert_eq!(receipt.sender, Some(sender));
        assert!(receipt.reject_reason().is_none());
    }

    #[test]
    fn test_rejected_receipt_charges_nothing() {
        let receipt = TransactionReceipt::rejected(
            Hash::compute(b"tx"),
            None,
            RejectReason::InvalidSignature,
        );

        assert!(!receipt.is_applied());
        assert_eq!(receipt.gas_used, 0);
        assert_eq!(receipt.total_cost, U256::ZERO);
        assert_eq!(receipt.reject_reason(), Some(&RejectReason::InvalidSignature));
    }

    #[test]
    fn test_reject_reason_display() {
        let reason = RejectReason::NonceMismatch { expected: 1, got: 0 };
        assert_eq!(reason.to_string(), "Nonce mismatch: expected 1, got 0");

        let reason = RejectReason::InsufficientFunds {
            required: U256::from(21_050u64),
            available: U256::from(100u64),
        };
        assert_eq!(
            reason.to_string(),
            "Insufficient funds: required 21050, available 100"
        );
    }
}
