use crate::u256::U256;

/// Account state held by the ledger.
///
/// An address the ledger has never seen behaves exactly like
/// `Account::default()`: zero balance, nonce 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Account {
    /// Number of transfers applied from this account
    pub nonce: u64,
    /// Spendable balance
    pub balance: U256,
}

impl Account {
    pub fn new(balance: U256) -> Self {
        Self { nonce: 0, balance }
    }
}
