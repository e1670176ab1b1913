//! # flowreg Terminal
//!
//! Command-line frontend for the registry console. Arguments are parsed with
//! clap, configuration is resolved from file, environment and flags, and
//! each command is dispatched to a handler that drives `flowreg-app`.

#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod handlers;
pub mod output;

pub use cli::Cli;
pub use handlers::{execute, HandlerContext};
