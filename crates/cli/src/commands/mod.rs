//! CLI subcommands.

pub mod migrate;
pub mod preview;
pub mod status;
