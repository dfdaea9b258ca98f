//! Package consumer validation

use serde::Deserialize;
use tracing::trace;
use url::Url;

use super::entity::PackageConsumer;
use crate::domain::violation::{Validator, Violation, into_result};

/// How strictly the optional `url` field is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrlStrictness {
    /// `url` is free text
    #[default]
    Lenient,
    /// `url` must parse as an absolute URL
    Strict,
}

impl From<bool> for UrlStrictness {
    fn from(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PackageConsumerValidator {
    url_strictness: UrlStrictness,
}

impl PackageConsumerValidator {
    pub fn new(url_strictness: UrlStrictness) -> Self {
        Self { url_strictness }
    }

    pub fn url_strictness(&self) -> UrlStrictness {
        self.url_strictness
    }

    pub fn violations(&self, record: &PackageConsumer) -> Vec<Violation> {
        let mut violations = Vec::new();

        if record.name().trim().is_empty() {
            violations.push(Violation::missing("name"));
        }
        if record.version().trim().is_empty() {
            violations.push(Violation::missing("version"));
        }

        if self.url_strictness == UrlStrictness::Strict {
            if let Some(raw) = record.url() {
                if let Err(e) = Url::parse(raw) {
                    violations.push(Violation::invalid_format("url", raw, e.to_string()));
                }
            }
        }

        trace!(consumer = %record, violations = violations.len(), "Validated package consumer");

        violations
    }
}

impl Validator for PackageConsumerValidator {
    type Record = PackageConsumer;

    fn validate(&self, record: &PackageConsumer) -> Result<(), Vec<Violation>> {
        into_result(self.violations(record))
    }
}
