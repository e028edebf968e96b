//! Two-client transfer simulation.
//!
//! Clients A and B start with the same genesis balance. A pays B, then B
//! pays A, on one ledger, with a block committed after each transfer.

use crate::config::SimulationConfig;
use dialoguer::Input;
use settla_core::Settlement;
use settla_crypto::{Ed25519Provider, Keypair};
use settla_types::{GenesisConfig, RejectReason, Transaction, TransactionReceipt, MIN_TRANSFER_GAS, U256};
use std::collections::VecDeque;

/// Amount and gas limit for one leg of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRequest {
    pub amount: U256,
    pub gas_limit: u64,
}

/// Where transfer parameters come from.
pub trait TransferSource {
    fn next_transfer(&mut self, leg: &Leg) -> anyhow::Result<TransferRequest>;
}

/// Parameters fixed up front (command-line flags).
#[derive(Debug, Default)]
pub struct FixedTransfers(VecDeque<TransferRequest>);

impl FixedTransfers {
    pub fn new(requests: impl IntoIterator<Item = TransferRequest>) -> Self {
        Self(requests.into_iter().collect())
    }
}

impl TransferSource for FixedTransfers {
    fn next_transfer(&mut self, leg: &Leg) -> anyhow::Result<TransferRequest> {
        self.0
            .pop_front()
            .ok_or_else(|| anyhow::anyhow!("No transfer parameters for {} -> {}", leg.from, leg.to))
    }
}

/// Parameters read from the terminal.
#[derive(Debug, Default)]
pub struct PromptTransfers;

impl TransferSource for PromptTransfers {
    fn next_transfer(&mut self, leg: &Leg) -> anyhow::Result<TransferRequest> {
        let amount = Input::<U256>::new()
            .with_prompt(format!("Transfer amount ({} -> {})", leg.from, leg.to))
            .interact_text()?;
        let gas_limit = Input::<u64>::new()
            .with_prompt(format!("Gas limit [minimum {}]", MIN_TRANSFER_GAS))
            .default(MIN_TRANSFER_GAS)
            .interact_text()?;
        Ok(TransferRequest { amount, gas_limit })
    }
}

/// Direction of one transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub from: &'static str,
    pub to: &'static str,
}

pub const A_TO_B: Leg = Leg { from: "A", to: "B" };
pub const B_TO_A: Leg = Leg { from: "B", to: "A" };

/// Result of one leg.
#[derive(Debug, Clone)]
pub enum LegOutcome {
    /// Applied and committed in `block_index`.
    Committed {
        tx: Transaction,
        receipt: TransactionReceipt,
        block_index: u64,
        balance_a: U256,
        balance_b: U256,
    },
    Rejected(RejectReason),
}

/// The simulated network: one settlement engine and two clients.
pub struct Simulation {
    settlement: Settlement,
    client_a: Keypair,
    client_b: Keypair,
    gas_price: U256,
}

impl Simulation {
    pub fn new(config: &SimulationConfig, client_a: Keypair, client_b: Keypair) -> anyhow::Result<Self> {
        config.validate()?;

        let genesis = GenesisConfig::new(config.chain_id)
            .with_alloc(client_a.address(), config.genesis_balance)
            .with_alloc(client_b.address(), config.genesis_balance);
        let settlement = Settlement::new(&genesis, Ed25519Provider::new())?;

        Ok(Self {
            settlement,
            client_a,
            client_b,
            gas_price: config.gas_price,
        })
    }

    /// Two freshly generated clients.
    pub fn generate(config: &SimulationConfig) -> anyhow::Result<Self> {
        Self::new(config, Keypair::generate(), Keypair::generate())
    }

    pub fn client_a(&self) -> &Keypair {
        &self.client_a
    }

    pub fn client_b(&self) -> &Keypair {
        &self.client_b
    }

    pub fn settlement(&self) -> &Settlement {
        &self.settlement
    }

    pub fn balances(&self) -> (U256, U256) {
        (
            self.settlement.current_balance(&self.client_a.address()),
            self.settlement.current_balance(&self.client_b.address()),
        )
    }

    /// Submit one leg and commit a block if it applied.
    pub fn transfer(&self, leg: &Leg, request: TransferRequest) -> anyhow::Result<LegOutcome> {
        let (sender, recipient) = if leg == &A_TO_B {
            (&self.client_a, &self.client_b)
        } else {
            (&self.client_b, &self.client_a)
        };

        let receipt = self.settlement.submit_transaction(
            sender,
            recipient.address(),
            request.amount,
            request.gas_limit,
            self.gas_price,
        );
        if let Some(reason) = receipt.reject_reason() {
            return Ok(LegOutcome::Rejected(reason.clone()));
        }

        let block = self.settlement.commit_block();
        let tx = block
            .transactions
            .iter()
            .find(|(_, r)| r.tx_hash == receipt.tx_hash)
            .map(|(stx, _)| stx.tx.clone())
            .ok_or_else(|| anyhow::anyhow!("Block {} is missing transaction {}", block.index(), receipt.tx_hash))?;

        Ok(LegOutcome::Committed {
            tx,
            receipt,
            block_index: block.index(),
            balance_a: self.settlement.query_balance(&self.client_a.address(), block.index())?,
            balance_b: self.settlement.query_balance(&self.client_b.address(), block.index())?,
        })
    }
}
