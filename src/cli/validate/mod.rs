//! Validate command - checks records and reports every violation

use std::fmt::Write as _;

use clap::{Args, ValueEnum};
use tracing::{info, warn};

use super::input::{parse_records, read_input};
use crate::config::{AppConfig, ValidationConfig};
use crate::domain::{
    ApiKeyInfo, BatchReport, PackageConsumer, RecordPurpose, validate_batch,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RecordKind {
    /// ApiKeyInfo payloads
    ApiKey,
    /// PackageConsumer payloads
    PackageConsumer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PurposeArg {
    Create,
    Response,
}

impl From<PurposeArg> for RecordPurpose {
    fn from(arg: PurposeArg) -> Self {
        match arg {
            PurposeArg::Create => Self::Create,
            PurposeArg::Response => Self::Response,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Args)]
pub struct ValidateArgs {
    /// Kind of record in the input
    #[arg(value_enum)]
    pub kind: RecordKind,

    /// JSON file holding one record or an array of records; `-` reads stdin
    pub path: String,

    /// Whether API key records are create requests or server responses
    #[arg(long, value_enum)]
    pub purpose: Option<PurposeArg>,

    /// The server hashes API keys, so `key` must never be set
    #[arg(long)]
    pub key_hashing: bool,

    /// Require package consumer URLs to be well-formed
    #[arg(long)]
    pub strict_urls: bool,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ValidateArgs {
    /// Configured validation modes with command-line flags applied on top
    fn validation_config(&self, config: &AppConfig) -> ValidationConfig {
        let mut validation = config.validation.clone();
        if let Some(purpose) = self.purpose {
            validation.purpose = purpose.into();
        }
        validation.key_hashing |= self.key_hashing;
        validation.strict_urls |= self.strict_urls;
        validation
    }
}

/// Run the validate command
pub async fn run(args: ValidateArgs) -> anyhow::Result<()> {
    let config = super::bootstrap();
    let (report, rendered) = execute(&args, &config).await?;

    println!("{}", rendered);

    if report.is_clean() {
        Ok(())
    } else {
        anyhow::bail!(
            "{} of {} record(s) failed validation",
            report.invalid(),
            report.total
        )
    }
}

/// Validate the input described by `args` and render the report
pub async fn execute(
    args: &ValidateArgs,
    config: &AppConfig,
) -> anyhow::Result<(BatchReport, String)> {
    let text = read_input(&args.path).await?;
    let validation = args.validation_config(config);

    let report = match args.kind {
        RecordKind::ApiKey => {
            let records = parse_records::<ApiKeyInfo>(&text)?;
            validate_batch(&validation.api_key_validator(), &records.items)
        }
        RecordKind::PackageConsumer => {
            let records = parse_records::<PackageConsumer>(&text)?;
            validate_batch(&validation.package_consumer_validator(), &records.items)
        }
    };

    if report.is_clean() {
        info!(kind = ?args.kind, total = report.total, "All records valid");
    } else {
        warn!(
            kind = ?args.kind,
            total = report.total,
            invalid = report.invalid(),
            "Records failed validation"
        );
    }

    let rendered = match args.format {
        OutputFormat::Text => render_text(&report),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };

    Ok((report, rendered))
}

fn render_text(report: &BatchReport) -> String {
    let mut out = String::new();

    for entry in &report.entries {
        for violation in &entry.violations {
            let _ = writeln!(out, "#{}: {}", entry.index, violation);
        }
    }

    if report.is_clean() {
        let _ = write!(out, "{} record(s) valid", report.total);
    } else {
        let _ = write!(
            out,
            "{} of {} record(s) failed validation",
            report.invalid(),
            report.total
        );
    }

    out
}
