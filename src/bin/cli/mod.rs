//! CLI module organization for the plugdex binary:
//! - args: argument structures and enums
//! - commands: command execution logic
//! - output: console formatting and display functions

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used items for convenience
pub use args::*;
pub use commands::*;
