//! CLI command definitions and dispatch.

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use settla_types::U256;
use std::path::{Path, PathBuf};

use crate::config::{SimulationConfig, DEFAULT_CONFIG_FILE};
use crate::output::*;
use crate::simulate::{
    FixedTransfers, LegOutcome, PromptTransfers, Simulation, TransferRequest, TransferSource,
    A_TO_B, B_TO_A,
};

/// Main CLI.
#[derive(Parser, Debug)]
#[command(name = "settla")]
#[command(about = "Settla - deterministic transaction settlement")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Config file (defaults to ./settla.toml when present)
    #[arg(short, long, global = true, env = "SETTLA_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `settla_core=debug`
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the two-client transfer simulation
    Simulate(SimulateArgs),

    /// Configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Amount A sends to B
    #[arg(long = "amount-1", default_value = "1000")]
    pub amount_1: U256,

    /// Gas limit of the first transfer
    #[arg(long = "gas-limit-1", default_value_t = 21_000)]
    pub gas_limit_1: u64,

    /// Amount B sends back to A
    #[arg(long = "amount-2", default_value = "2000")]
    pub amount_2: U256,

    /// Gas limit of the second transfer
    #[arg(long = "gas-limit-2", default_value_t = 21_000)]
    pub gas_limit_2: u64,

    /// Prompt for amounts and gas limits instead of using flags
    #[arg(short, long)]
    pub interactive: bool,

    /// Starting balance of each client
    #[arg(long)]
    pub genesis_balance: Option<U256>,

    /// Price per unit of gas
    #[arg(long)]
    pub gas_price: Option<U256>,

    /// Chain id bound into signatures
    #[arg(long)]
    pub chain_id: Option<u64>,
}

/// Config commands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default config file
    Init {
        /// Target path
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

impl Cli {
    /// Load the config file and apply global flag overrides.
    pub fn load_config(&self) -> anyhow::Result<SimulationConfig> {
        let mut config = SimulationConfig::load(self.config.as_deref())?;
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if self.json_logs {
            config.json_logs = true;
        }
        Ok(config)
    }
}

impl SimulateArgs {
    fn apply(&self, config: &mut SimulationConfig) {
        if let Some(balance) = self.genesis_balance {
            config.genesis_balance = balance;
        }
        if let Some(price) = self.gas_price {
            config.gas_price = price;
        }
        if let Some(chain_id) = self.chain_id {
            config.chain_id = chain_id;
        }
    }

    fn transfer_source(&self) -> Box<dyn TransferSource> {
        if self.interactive {
            Box::new(PromptTransfers)
        } else {
            Box::new(FixedTransfers::new([
                TransferRequest {
                    amount: self.amount_1,
                    gas_limit: self.gas_limit_1,
                },
                TransferRequest {
                    amount: self.amount_2,
                    gas_limit: self.gas_limit_2,
                },
            ]))
        }
    }
}

/// Execute a command.
pub fn execute(cmd: Commands, mut config: SimulationConfig) -> anyhow::Result<()> {
    match cmd {
        Commands::Simulate(args) => {
            args.apply(&mut config);
            execute_simulate(&args, &config)
        }
        Commands::Config(cmd) => execute_config(cmd, &config),
    }
}

fn execute_simulate(args: &SimulateArgs, config: &SimulationConfig) -> anyhow::Result<()> {
    let sim = Simulation::generate(config)?;
    let mut source = args.transfer_source();

    println!("{}", "INITIAL CLIENTS".bold());
    let (balance_a, balance_b) = sim.balances();
    print_client("A", &balance_a, &sim.client_a().address());
    println!();
    print_client("B", &balance_b, &sim.client_b().address());
    println!("{}", SEPARATOR);

    for leg in [A_TO_B, B_TO_A] {
        let request = source.next_transfer(&leg)?;
        match sim.transfer(&leg, request)? {
            LegOutcome::Committed {
                tx,
                receipt,
                block_index,
                balance_a,
                balance_b,
            } => {
                print_transfer(leg.from, leg.to, &tx, &receipt);
                print_info(&format!("Committed in block {}", block_index));
                print_balance("A", &balance_a);
                print_balance("B", &balance_b);
                println!("{}", SEPARATOR);
                println!();
            }
            LegOutcome::Rejected(reason) => {
                print_error(&format!("Transfer {} -> {} rejected: {}", leg.from, leg.to, reason));
                return Ok(());
            }
        }
    }

    let settlement = sim.settlement();
    print_success(&format!(
        "Simulation finished: {} blocks, {} burned in fees",
        settlement.chain().len(),
        settlement.fees_burned()
    ));
    Ok(())
}

fn execute_config(cmd: ConfigCommands, config: &SimulationConfig) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Init { path, force } => {
            init_config(&path, force)?;
            print_success(&format!("Wrote default config to {}", path.display()));
            Ok(())
        }
        ConfigCommands::Show => {
            print!("{}", toml::to_string_pretty(config)?);
            Ok(())
        }
    }
}

/// Write the default config to `path`.
pub fn init_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
    }
    SimulationConfig::default().to_file(path)
}
