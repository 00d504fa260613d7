//! Command-line interface module.

mod args;
pub mod clean;
pub mod generate;

pub use args::{Cli, CleanArgs, Commands, GenerateArgs};
