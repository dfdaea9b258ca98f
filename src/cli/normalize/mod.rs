//! Normalize command - rewrites API key records with canonical tokens

use clap::Args;
use tracing::info;

use super::input::{parse_records, read_input};
use crate::domain::ApiKeyInfo;

#[derive(Debug, Clone, Args)]
pub struct NormalizeArgs {
    /// JSON file holding one API key record or an array of them; `-` reads stdin
    pub path: String,
}

/// Run the normalize command
pub async fn run(args: NormalizeArgs) -> anyhow::Result<()> {
    super::bootstrap();
    println!("{}", execute(&args).await?);
    Ok(())
}

/// Normalize the input, keeping its object-or-array shape
pub async fn execute(args: &NormalizeArgs) -> anyhow::Result<String> {
    let text = read_input(&args.path).await?;
    let records = parse_records::<ApiKeyInfo>(&text)?;

    let normalized: Vec<ApiKeyInfo> = records.items.iter().map(ApiKeyInfo::normalized).collect();
    info!(records = normalized.len(), "Normalized API key records");

    let rendered = if records.is_batch {
        serde_json::to_string_pretty(&normalized)?
    } else {
        serde_json::to_string_pretty(&normalized[0])?
    };

    Ok(rendered)
}
