//! Subcommands of the `flappy-td` binary

pub mod export;
pub mod inspect;
pub mod train;
