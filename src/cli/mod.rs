//! CLI command handlers

pub mod commands;

pub use commands::{info, list, progress, resolve, run, FormulaOpts};
