//! Logsum CLI library
//!
//! This library provides the command-line interface for summing the bytes
//! transferred in Common Log Format access logs.

pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod progress;

pub use error::{CliError, CliResult};
