use colored::Colorize;

use crate::network::Network;

/// Format a token amount with its symbol, in color
pub fn format_tokens(amount: f64, network: Network) -> String {
    format!("{:.4} {}", amount, network.symbol()).yellow().to_string()
}

/// Format a fiat value with its currency code
pub fn format_fiat(value: f64, currency: &str) -> String {
    format!("{:.2} {}", value, currency.to_uppercase())
}

/// Format address truncated for display
pub fn format_address(address: &str) -> String {
    if address.chars().count() <= 12 {
        address.to_string()
    } else {
        let chars: Vec<char> = address.chars().collect();
        let head: String = chars[..6].iter().collect();
        let tail: String = chars[chars.len() - 6..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

/// Print a formatted table border
pub fn print_table_border(width: usize) {
    println!("{}", "=".repeat(width));
}

/// Print a table row with columns
pub fn print_table_row(columns: &[&str], widths: &[usize]) {
    let mut row = String::new();
    for (i, col) in columns.iter().enumerate() {
        if i < widths.len() {
            row.push_str(&format!("{:<width$}  ", col, width = widths[i]));
        }
    }
    println!("{}", row.trim_end());
}
