//! Output formatting utilities.

use colored::Colorize;
use settla_types::{Address, Transaction, TransactionReceipt, U256};

pub const SEPARATOR: &str = "- - - - - - - - - - -";

/// Shorten a long string to `head...tail`.
pub fn format_short(s: &str) -> String {
    if s.len() > 20 {
        format!("{}...{}", &s[..12], &s[s.len() - 6..])
    } else {
        s.to_string()
    }
}

/// `value + (gas * price) = total`, or `overflow` when the total does not fit.
pub fn format_cost(tx: &Transaction) -> String {
    let total = tx
        .max_charge()
        .map(|c| c.to_string())
        .unwrap_or_else(|| "overflow".to_string());
    format!("{} + ({} * {}) = {}", tx.value, tx.gas_limit, tx.gas_price, total)
}

/// Balance line, right-aligned to ten columns.
pub fn format_balance(client: &str, balance: &U256) -> String {
    format!("BALANCE CLIENT {} : {:>10}", client, balance)
}

pub fn print_success(msg: &str) {
    println!("{}", format!("✓ {}", msg).green());
}

pub fn print_error(msg: &str) {
    eprintln!("{}", format!("✗ {}", msg).red());
}

pub fn print_info(msg: &str) {
    println!("{}", format!("ℹ {}", msg).blue());
}

pub fn print_balance(client: &str, balance: &U256) {
    println!("{}", format_balance(client, balance).bold());
}

pub fn print_client(client: &str, balance: &U256, address: &Address) {
    print_balance(client, balance);
    println!("Address {}: {}", client, address.to_string().bright_cyan());
}

/// Print an applied transfer the way it landed in its block.
pub fn print_transfer(from: &str, to: &str, tx: &Transaction, receipt: &TransactionReceipt) {
    println!("{} - - - {} - - - > {}", from, tx.value.to_string().bright_green(), to);
    println!();
    println!("Amount: {}", tx.value);
    println!("GasPrice: {}", tx.gas_price);
    println!("Gas: {}", tx.gas_limit);
    println!("Cost: {}", format_cost(tx));
    println!("Gas used: {} (fee {})", receipt.gas_used, receipt.total_cost);
    println!("To (address): {}", tx.to);
    println!("Tx hash: {}", format_short(&receipt.tx_hash.to_string()).dimmed());
    println!();
}
