//! CLI module for proget-contracts
//!
//! Subcommands:
//! - `validate`: check API key or package consumer payloads
//! - `normalize`: print API key payloads in canonical form

pub mod input;
pub mod normalize;
pub mod validate;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Validate payloads exchanged with the ProGet API key and scan endpoints
#[derive(Parser)]
#[command(name = "proget-contracts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one record or a JSON array of records
    Validate(validate::ValidateArgs),

    /// Print API key records with canonical tokens
    Normalize(normalize::NormalizeArgs),
}

/// Load configuration and install logging; falls back to defaults when the
/// configuration cannot be read.
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    logging::init_logging(&config.logging);

    if let Err(e) = loaded {
        warn!("Falling back to default configuration: {}", e);
    }

    config
}
