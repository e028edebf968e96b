//! Account ledger.
//!
//! The ledger is the only place account state changes. Accounts live in a
//! copy-on-write map behind one `RwLock`, so a snapshot is an `Arc` clone and
//! stays frozen while the live map keeps moving.

use crate::error::CoreError;
use parking_lot::RwLock;
use settla_types::{Account, Address, GenesisConfig, Hash, RejectReason, U256};
use std::collections::HashMap;
use std::sync::Arc;

type AccountMap = HashMap<Address, Account>;

/// Read-only access to account state.
pub trait AccountReader {
    /// Account for `address`; unknown addresses read as the empty account.
    fn account(&self, address: &Address) -> Account;

    fn balance(&self, address: &Address) -> U256 {
        self.account(address).balance
    }

    fn nonce(&self, address: &Address) -> u64 {
        self.account(address).nonce
    }
}

/// Point-in-time view of the ledger.
#[derive(Clone, Debug, Default)]
pub struct LedgerSnapshot {
    accounts: Arc<AccountMap>,
}

impl LedgerSnapshot {
    /// Number of accounts that exist in this view.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Accounts sorted by address.
    pub fn accounts(&self) -> Vec<(Address, Account)> {
        let mut entries: Vec<_> = self.accounts.iter().map(|(a, acc)| (*a, *acc)).collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Digest over every account in address order.
    pub fn state_root(&self) -> Hash {
        let mut data = Vec::with_capacity(self.accounts.len() * (20 + 32 + 8));
        for (address, account) in self.accounts() {
            data.extend_from_slice(address.as_bytes());
            data.extend_from_slice(&account.balance.to_le_bytes());
            data.extend_from_slice(&account.nonce.to_le_bytes());
        }
        Hash::compute(&data)
    }

    pub fn total_supply(&self) -> U256 {
        sum_balances(&self.accounts)
    }
}

impl AccountReader for LedgerSnapshot {
    fn account(&self, address: &Address) -> Account {
        self.accounts.get(address).copied().unwrap_or_default()
    }
}

/// Live account ledger.
#[derive(Debug, Default)]
pub struct AccountLedger {
    accounts: RwLock<Arc<AccountMap>>,
}

impl AccountLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger funded by a genesis allocation.
    pub fn from_genesis(genesis: &GenesisConfig) -> Result<Self, CoreError> {
        genesis.validate()?;

        let accounts: AccountMap = genesis
            .alloc
            .iter()
            .map(|entry| (entry.address, Account::new(entry.balance)))
            .collect();

        tracing::debug!(
            chain_id = genesis.chain_id,
            accounts = accounts.len(),
            "Ledger initialized from genesis"
        );

        Ok(Self {
            accounts: RwLock::new(Arc::new(accounts)),
        })
    }

    pub fn len(&self) -> usize {
        self.accounts.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.read().is_empty()
    }

    /// Freeze the current state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        LedgerSnapshot {
            accounts: Arc::clone(&*self.accounts.read()),
        }
    }

    /// Sum of all balances.
    pub fn total_supply(&self) -> U256 {
        sum_balances(&self.accounts.read())
    }

    /// Debit `value + fee` from `sender`, credit `value` to `recipient` and
    /// bump the sender's nonce, all under one write lock.
    ///
    /// Nothing is written unless every step succeeds.
    pub fn apply_transfer(
        &self,
        sender: &Address,
        recipient: &Address,
        value: U256,
        fee: U256,
    ) -> Result<(), RejectReason> {
        let mut guard = self.accounts.write();

        let debit = value.checked_add(&fee).ok_or(RejectReason::Overflow)?;
        let before = guard.get(sender).copied().unwrap_or_default();

        let debited = before
            .balance
            .checked_sub(&debit)
            .ok_or(RejectReason::InsufficientFunds {
                required: debit,
                available: before.balance,
            })?;
        let nonce = before.nonce.checked_add(1).ok_or(RejectReason::Overflow)?;

        let sender_after = Account {
            nonce,
            balance: if sender == recipient {
                debited.checked_add(&value).ok_or(RejectReason::Overflow)?
            } else {
                debited
            },
        };

        let recipient_after = if sender == recipient {
            None
        } else {
            let mut account = guard.get(recipient).copied().unwrap_or_default();
            account.balance = account
                .balance
                .checked_add(&value)
                .ok_or(RejectReason::Overflow)?;
            Some(account)
        };

        let accounts = Arc::make_mut(&mut *guard);
        accounts.insert(*sender, sender_after);
        if let Some(account) = recipient_after {
            accounts.insert(*recipient, account);
        }

        assert!(
            sender_after.nonce > before.nonce,
            "nonce of {} did not increase ({} -> {})",
            sender,
            before.nonce,
            sender_after.nonce
        );

        Ok(())
    }
}

impl AccountReader for AccountLedger {
    fn account(&self, address: &Address) -> Account {
        self.accounts.read().get(address).copied().unwrap_or_default()
    }
}

fn sum_balances(accounts: &AccountMap) -> U256 {
    accounts
        .values()
        .try_fold(U256::ZERO, |acc, account| acc.checked_add(&account.balance))
        .unwrap_or_else(|| panic!("ledger supply exceeds U256::MAX"))
}
