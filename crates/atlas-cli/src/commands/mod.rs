//! CLI subcommand implementations.

pub mod carry_over;
pub mod focus;
pub mod habits;
pub mod score;
pub mod util;
