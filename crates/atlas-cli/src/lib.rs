//! Atlas CLI library.
//!
//! This crate provides the command-line views over the Atlas backend.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::Config;
