use crate::address::Address;
use crate::error::TypesError;
use crate::u256::U256;
use std::collections::HashSet;

/// Genesis configuration: the chain id transactions are signed for, and the
/// pre-funded accounts the ledger starts from.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenesisConfig {
    pub chain_id: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub alloc: Vec<GenesisAlloc>,
}

/// Genesis allocation entry
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GenesisAlloc {
    pub address: Address,
    pub balance: U256,
}

impl GenesisConfig {
    /// Chain id used by the local simulation
    pub const DEVNET_CHAIN_ID: u64 = 1337;

    pub fn new(chain_id: u64) -> Self {
        Self {
            chain_id,
            alloc: Vec::new(),
        }
    }

    pub fn devnet() -> Self {
        Self::new(Self::DEVNET_CHAIN_ID)
    }

    pub fn add_alloc(&mut self, address: Address, balance: U256) {
        self.alloc.push(GenesisAlloc { address, balance });
    }

    /// Builder-style [`add_alloc`](Self::add_alloc).
    pub fn with_alloc(mut self, address: Address, balance: U256) -> Self {
        self.add_alloc(address, balance);
        self
    }

    /// Reject duplicate addresses and allocations whose sum overflows.
    pub fn validate(&self) -> Result<(), TypesError> {
        let mut seen = HashSet::with_capacity(self.alloc.len());
        for entry in &self.alloc {
            if !seen.insert(entry.address) {
                return Err(TypesError::DuplicateAllocation(entry.address.to_string()));
            }
        }
        self.total_supply().map(|_| ())
    }

    /// Sum of all allocated balances.
    pub fn total_supply(&self) -> Result<U256, TypesError> {
        self.alloc.iter().try_fold(U256::ZERO, |acc, entry| {
            acc.checked_add(&entry.balance).ok_or(TypesError::U256Overflow)
        })
    }
}

impl Default for GenesisConfig {
    fn default() -> Self {
        Self::devnet()
    }
}
