pub mod commands;
pub mod prompt;

pub use commands::{non_blank, Cli, Commands};
