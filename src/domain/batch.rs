//! Validation over many records at once

use serde::Serialize;
use tracing::debug;

use super::violation::{Validator, Violation};

/// Violations found in one record of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchEntry {
    /// Position of the record in the input
    pub index: usize,
    pub violations: Vec<Violation>,
}

/// Outcome of validating a batch; only failing records get an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub total: usize,
    pub valid: usize,
    pub entries: Vec<BatchEntry>,
}

impl BatchReport {
    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn invalid(&self) -> usize {
        self.total - self.valid
    }

    /// Violations for the record at `index`, if it failed
    pub fn violations_for(&self, index: usize) -> Option<&[Violation]> {
        self.entries
            .iter()
            .find(|e| e.index == index)
            .map(|e| e.violations.as_slice())
    }
}

/// Validate each record independently, keeping its input position
pub fn validate_batch<V: Validator>(validator: &V, records: &[V::Record]) -> BatchReport {
    let entries: Vec<BatchEntry> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| {
            validator
                .validate(record)
                .err()
                .map(|violations| BatchEntry { index, violations })
        })
        .collect();

    let report = BatchReport {
        total: records.len(),
        valid: records.len() - entries.len(),
        entries,
    };

    debug!(
        total = report.total,
        valid = report.valid,
        invalid = report.invalid(),
        "Batch validation finished"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::api_key::{ApiKeyInfo, ApiKeyValidator};
    use crate::domain::package_consumer::{PackageConsumer, PackageConsumerValidator};

    #[test]
    fn test_empty_batch_is_clean() {
        let records: Vec<PackageConsumer> = Vec::new();
        let report = validate_batch(&PackageConsumerValidator::default(), &records);
        assert!(report.is_clean());
        assert_eq!(report.total, 0);
        assert_eq!(report.valid, 0);
    }

    #[test]
    fn test_entries_keep_input_index() {
        let records = vec![
            PackageConsumer::new("lodash", "4.17.21"),
            PackageConsumer::new("", "1.0"),
            PackageConsumer::new("react", "18.2.0"),
            PackageConsumer::new("left-pad", ""),
        ];

        let report = validate_batch(&PackageConsumerValidator::default(), &records);

        assert_eq!(report.total, 4);
        assert_eq!(report.valid, 2);
        assert_eq!(report.invalid(), 2);
        assert_eq!(
            report.entries,
            vec![
                BatchEntry {
                    index: 1,
                    violations: vec![Violation::missing("name")],
                },
                BatchEntry {
                    index: 3,
                    violations: vec![Violation::missing("version")],
                },
            ]
        );
        assert_eq!(report.violations_for(0), None);
        assert_eq!(
            report.violations_for(3),
            Some(&[Violation::missing("version")][..])
        );
    }

    #[test]
    fn test_api_key_batch() {
        let records = vec![
            ApiKeyInfo::system(["feeds"]),
            ApiKeyInfo::system(["full-control", "feeds"]),
            ApiKeyInfo::personal("alice"),
        ];

        let report = validate_batch(&ApiKeyValidator::default(), &records);

        assert!(!report.is_clean());
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].index, 1);
    }

    #[test]
    fn test_report_serializes() {
        let records = vec![PackageConsumer::new("", "1.0")];
        let report = validate_batch(&PackageConsumerValidator::default(), &records);

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            serde_json::json!({
                "total": 1,
                "valid": 0,
                "entries": [
                    { "index": 0, "violations": [{ "kind": "missingField", "field": "name" }] }
                ]
            })
        );
    }
}
