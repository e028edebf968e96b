//! Transaction validation.
//!
//! Checks run in a fixed order and stop at the first failure:
//! signature, gas limit, nonce, cost overflow, balance. Nothing here writes
//! to the ledger.

use crate::ledger::AccountReader;
use settla_crypto::SigningProvider;
use settla_types::{Address, RejectReason, SignedTransaction, Transaction, MIN_TRANSFER_GAS, U256};

/// A transaction that passed every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedTransfer {
    /// Sender recovered from the signature
    pub sender: Address,
    /// `value + gas_limit * gas_price`
    pub max_charge: U256,
}

/// Why a transaction was turned away, and by whom if that is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub sender: Option<Address>,
    pub reason: RejectReason,
}

impl Rejection {
    fn new(sender: Option<Address>, reason: RejectReason) -> Self {
        Self { sender, reason }
    }
}

/// Stateless transaction validator bound to one chain id.
#[derive(Debug, Clone)]
pub struct TransactionValidator<P> {
    provider: P,
    chain_id: u64,
}

impl<P: SigningProvider> TransactionValidator<P> {
    pub fn new(provider: P, chain_id: u64) -> Self {
        Self { provider, chain_id }
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Run every check against `ledger`.
    pub fn validate<R: AccountReader + ?Sized>(
        &self,
        ledger: &R,
        stx: &SignedTransaction,
    ) -> Result<ValidatedTransfer, Rejection> {
        let sender = self
            .recover_sender(stx)
            .map_err(|reason| Rejection::new(None, reason))?;
        self.validate_from(ledger, &stx.tx, sender)
            .map_err(|reason| Rejection::new(Some(sender), reason))
    }

    /// Recover the sender address for this chain.
    pub fn recover_sender(&self, stx: &SignedTransaction) -> Result<Address, RejectReason> {
        let message = stx.tx.signing_hash(self.chain_id);
        match self.provider.recover_address(&stx.signature, message.as_bytes()) {
            Ok(sender) if !sender.is_zero() => Ok(sender),
            Ok(_) => Err(RejectReason::InvalidSignature),
            Err(e) => {
                tracing::debug!(error = %e, tx = %stx.hash(), "Signature recovery failed");
                Err(RejectReason::InvalidSignature)
            }
        }
    }

    /// Checks that follow sender recovery.
    pub fn validate_from<R: AccountReader + ?Sized>(
        &self,
        ledger: &R,
        tx: &Transaction,
        sender: Address,
    ) -> Result<ValidatedTransfer, RejectReason> {
        validate_gas_limit(tx)?;
        validate_nonce(tx, ledger.nonce(&sender))?;
        let max_charge = tx.max_charge().ok_or(RejectReason::Overflow)?;
        validate_balance(max_charge, ledger.balance(&sender))?;

        Ok(ValidatedTransfer { sender, max_charge })
    }
}

fn validate_gas_limit(tx: &Transaction) -> Result<(), RejectReason> {
    if tx.gas_limit < MIN_TRANSFER_GAS {
        return Err(RejectReason::GasLimitTooLow {
            minimum: MIN_TRANSFER_GAS,
            got: tx.gas_limit,
        });
    }
    Ok(())
}

/// Only the exact next nonce is accepted; there is no queueing of future ones.
fn validate_nonce(tx: &Transaction, expected: u64) -> Result<(), RejectReason> {
    if tx.nonce != expected {
        return Err(RejectReason::NonceMismatch {
            expected,
            got: tx.nonce,
        });
    }
    Ok(())
}

fn validate_balance(required: U256, available: U256) -> Result<(), RejectReason> {
    if available < required {
        return Err(RejectReason::InsufficientFunds {
            required,
            available,
        });
    }
    Ok(())
}
