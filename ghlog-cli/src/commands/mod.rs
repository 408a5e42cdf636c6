//! One module per `ghlog` subcommand.

pub mod ci;
pub mod log;
