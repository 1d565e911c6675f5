//! `op-cli` subcommands.

pub mod check;
pub mod env;
