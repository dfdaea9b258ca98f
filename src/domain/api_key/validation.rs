//! API key record validation
//!
//! Which optional fields must be set, and which must stay empty, depends on
//! the key type:
//!
//! | type     | systemApis | packagePermissions | feed / feedGroup          | user     |
//! |----------|------------|--------------------|---------------------------|----------|
//! | system   | required   | absent             | absent                    | absent   |
//! | feed     | absent     | required           | optional, at most one set | absent   |
//! | personal | absent     | absent             | absent                    | required |

use serde::Deserialize;
use tracing::trace;

use super::entity::ApiKeyInfo;
use super::tokens::{
    ApiKeyBodyLogging, ApiKeyType, FULL_CONTROL, PackagePermission, is_system_api_token,
};
use crate::domain::violation::{Validator, Violation, into_result};

/// Whether the record is a create request or a server response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordPurpose {
    /// Outgoing create request; `id` must be absent
    #[default]
    Create,
    /// Record returned by the server; `id` must be present
    Response,
}

/// Server-side cryptographic hashing of key text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyHashing {
    /// `key` may never be set or returned
    Enabled,
    /// `key` is optional
    #[default]
    Disabled,
}

impl From<bool> for KeyHashing {
    fn from(enabled: bool) -> Self {
        if enabled { Self::Enabled } else { Self::Disabled }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ApiKeyValidationOptions {
    pub purpose: RecordPurpose,
    pub key_hashing: KeyHashing,
}

/// Validates [`ApiKeyInfo`] records against the type-conditional field rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiKeyValidator {
    options: ApiKeyValidationOptions,
}

impl ApiKeyValidator {
    pub fn new(options: ApiKeyValidationOptions) -> Self {
        Self { options }
    }

    pub fn with_purpose(mut self, purpose: RecordPurpose) -> Self {
        self.options.purpose = purpose;
        self
    }

    pub fn with_key_hashing(mut self, key_hashing: KeyHashing) -> Self {
        self.options.key_hashing = key_hashing;
        self
    }

    pub fn options(&self) -> ApiKeyValidationOptions {
        self.options
    }

    /// Collect every violation in `record`, in a stable order
    pub fn violations(&self, record: &ApiKeyInfo) -> Vec<Violation> {
        let mut violations = Vec::new();

        let key_type = check_key_type(record, &mut violations);
        check_logging(record, &mut violations);
        self.check_lifecycle_fields(record, &mut violations);
        check_system_api_tokens(record, &mut violations);
        check_package_permission_tokens(record, &mut violations);

        match key_type {
            Some(ApiKeyType::System) => check_system_key(record, &mut violations),
            Some(ApiKeyType::Feed) => check_feed_key(record, &mut violations),
            Some(ApiKeyType::Personal) => check_personal_key(record, &mut violations),
            None => {}
        }

        trace!(
            key_type = ?key_type,
            violations = violations.len(),
            "Validated API key record"
        );

        violations
    }

    fn check_lifecycle_fields(&self, record: &ApiKeyInfo, violations: &mut Vec<Violation>) {
        match (self.options.purpose, record.id) {
            (RecordPurpose::Create, Some(_)) => violations.push(Violation::unexpected("id")),
            (RecordPurpose::Response, None) => violations.push(Violation::missing("id")),
            _ => {}
        }

        if self.options.key_hashing == KeyHashing::Enabled && record.key.is_some() {
            violations.push(Violation::unexpected("key"));
        }
    }
}

impl Validator for ApiKeyValidator {
    type Record = ApiKeyInfo;

    fn validate(&self, record: &ApiKeyInfo) -> Result<(), Vec<Violation>> {
        into_result(self.violations(record))
    }
}

fn check_key_type(record: &ApiKeyInfo, violations: &mut Vec<Violation>) -> Option<ApiKeyType> {
    let raw = match record.key_type.as_deref() {
        Some(raw) => raw,
        None => {
            violations.push(Violation::missing("type"));
            return None;
        }
    };

    match raw.parse::<ApiKeyType>() {
        Ok(key_type) => Some(key_type),
        Err(_) => {
            violations.push(Violation::unrecognized("type", raw));
            None
        }
    }
}

fn check_logging(record: &ApiKeyInfo, violations: &mut Vec<Violation>) {
    match record.logging.as_deref() {
        None => violations.push(Violation::missing("logging")),
        Some(raw) if raw.parse::<ApiKeyBodyLogging>().is_err() => {
            violations.push(Violation::unrecognized("logging", raw));
        }
        Some(_) => {}
    }
}

fn check_system_api_tokens(record: &ApiKeyInfo, violations: &mut Vec<Violation>) {
    let Some(apis) = record.system_apis.as_deref() else {
        return;
    };

    for token in apis.iter().filter(|t| !is_system_api_token(t)) {
        violations.push(Violation::unrecognized("systemApis", token.as_str()));
    }

    let has_full_control = apis.iter().any(|t| t == FULL_CONTROL);
    let has_other = apis.iter().any(|t| t != FULL_CONTROL);
    if has_full_control && has_other {
        violations.push(Violation::invalid_combination("systemApis"));
    }
}

fn check_package_permission_tokens(record: &ApiKeyInfo, violations: &mut Vec<Violation>) {
    let Some(permissions) = record.package_permissions.as_deref() else {
        return;
    };

    for token in permissions
        .iter()
        .filter(|t| t.parse::<PackagePermission>().is_err())
    {
        violations.push(Violation::unrecognized("packagePermissions", token.as_str()));
    }
}

fn check_system_key(record: &ApiKeyInfo, violations: &mut Vec<Violation>) {
    require_tokens("systemApis", &record.system_apis, violations);
    forbid("packagePermissions", record.package_permissions.is_some(), violations);
    forbid("feed", record.feed.is_some(), violations);
    forbid("feedGroup", record.feed_group.is_some(), violations);
    forbid("user", record.user.is_some(), violations);
}

fn check_feed_key(record: &ApiKeyInfo, violations: &mut Vec<Violation>) {
    forbid("systemApis", record.system_apis.is_some(), violations);
    require_tokens("packagePermissions", &record.package_permissions, violations);
    if record.feed.is_some() && record.feed_group.is_some() {
        violations.push(Violation::conflicting("feed", "feedGroup"));
    }
    forbid("user", record.user.is_some(), violations);
}

fn check_personal_key(record: &ApiKeyInfo, violations: &mut Vec<Violation>) {
    forbid("systemApis", record.system_apis.is_some(), violations);
    forbid("packagePermissions", record.package_permissions.is_some(), violations);
    forbid("feed", record.feed.is_some(), violations);
    forbid("feedGroup", record.feed_group.is_some(), violations);
    if record.user.as_deref().is_none_or(|u| u.trim().is_empty()) {
        violations.push(Violation::missing("user"));
    }
}

fn require_tokens(field: &str, tokens: &Option<Vec<String>>, violations: &mut Vec<Violation>) {
    if tokens.as_ref().is_none_or(Vec::is_empty) {
        violations.push(Violation::missing(field));
    }
}

fn forbid(field: &str, populated: bool, violations: &mut Vec<Violation>) {
    if populated {
        violations.push(Violation::unexpected(field));
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn validate(record: &ApiKeyInfo) -> Result<(), Vec<Violation>> {
        ApiKeyValidator::default().validate(record)
    }

    fn from_json(json: &str) -> ApiKeyInfo {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_system_key_with_feeds_is_valid() {
        let record = from_json(r#"{"type": "system", "systemApis": ["feeds"], "logging": "none"}"#);
        assert_eq!(validate(&record), Ok(()));
    }

    #[test]
    fn test_full_control_cannot_be_combined() {
        let record = from_json(
            r#"{"type": "system", "systemApis": ["full-control", "feeds"], "logging": "none"}"#,
        );
        assert_eq!(
            validate(&record),
            Err(vec![Violation::invalid_combination("systemApis")])
        );
    }

    #[test]
    fn test_full_control_alone_is_valid() {
        assert_eq!(validate(&ApiKeyInfo::system(["full-control"])), Ok(()));
        assert_eq!(
            validate(&ApiKeyInfo::system(["full-control", "full-control"])),
            Ok(())
        );
    }

    #[test]
    fn test_limited_system_apis_combination_is_valid() {
        assert_eq!(
            validate(&ApiKeyInfo::system(["feeds", "sca", "sbom-upload"])),
            Ok(())
        );
    }

    #[test]
    fn test_feed_and_feed_group_conflict() {
        let record = from_json(
            r#"{"type": "feed", "packagePermissions": ["view"], "feed": "nuget", "feedGroup": "internal", "logging": "none"}"#,
        );
        assert_eq!(
            validate(&record),
            Err(vec![Violation::conflicting("feed", "feedGroup")])
        );
    }

    #[test]
    fn test_personal_key_requires_user() {
        let record = from_json(r#"{"type": "personal", "logging": "none"}"#);
        assert_eq!(validate(&record), Err(vec![Violation::missing("user")]));
    }

    #[test]
    fn test_personal_key_blank_user_is_missing() {
        assert_eq!(
            validate(&ApiKeyInfo::personal("  ")),
            Err(vec![Violation::missing("user")])
        );
    }

    #[test]
    fn test_system_key_requires_non_empty_apis() {
        let record = ApiKeyInfo::new(ApiKeyType::System, ApiKeyBodyLogging::None);
        assert_eq!(validate(&record), Err(vec![Violation::missing("systemApis")]));

        let empty = ApiKeyInfo::system(std::iter::empty());
        assert_eq!(validate(&empty), Err(vec![Violation::missing("systemApis")]));
    }

    #[test]
    fn test_system_key_rejects_feed_fields() {
        let record = ApiKeyInfo::system(["sca"])
            .with_package_permissions(["view"])
            .with_feed("nuget")
            .with_feed_group("internal")
            .with_user("alice");

        assert_eq!(
            validate(&record),
            Err(vec![
                Violation::unexpected("packagePermissions"),
                Violation::unexpected("feed"),
                Violation::unexpected("feedGroup"),
                Violation::unexpected("user"),
            ])
        );
    }

    #[test]
    fn test_explicitly_empty_forbidden_set_is_still_unexpected() {
        let record = ApiKeyInfo::system(["sca"]).with_package_permissions(std::iter::empty());
        assert_eq!(
            validate(&record),
            Err(vec![Violation::unexpected("packagePermissions")])
        );
    }

    #[test]
    fn test_feed_key_scoping_options() {
        assert_eq!(validate(&ApiKeyInfo::feed_key(["view", "add"])), Ok(()));
        assert_eq!(
            validate(&ApiKeyInfo::feed_key(["view"]).with_feed("nuget")),
            Ok(())
        );
        assert_eq!(
            validate(&ApiKeyInfo::feed_key(["promote"]).with_feed_group("internal")),
            Ok(())
        );
    }

    #[test]
    fn test_feed_key_rules() {
        let record = ApiKeyInfo::new(ApiKeyType::Feed, ApiKeyBodyLogging::Both)
            .with_system_apis(["feeds"])
            .with_user("alice");

        assert_eq!(
            validate(&record),
            Err(vec![
                Violation::unexpected("systemApis"),
                Violation::missing("packagePermissions"),
                Violation::unexpected("user"),
            ])
        );
    }

    #[test]
    fn test_personal_key_rejects_scoping_fields() {
        let record = ApiKeyInfo::personal("alice")
            .with_system_apis(["feeds"])
            .with_package_permissions(["view"])
            .with_feed("nuget")
            .with_feed_group("internal");

        assert_eq!(
            validate(&record),
            Err(vec![
                Violation::unexpected("systemApis"),
                Violation::unexpected("packagePermissions"),
                Violation::unexpected("feed"),
                Violation::unexpected("feedGroup"),
            ])
        );
    }

    #[test]
    fn test_unrecognized_tokens() {
        let record = ApiKeyInfo::feed_key(["view", "admin", "publish"]);
        assert_eq!(
            validate(&record),
            Err(vec![
                Violation::unrecognized("packagePermissions", "admin"),
                Violation::unrecognized("packagePermissions", "publish"),
            ])
        );

        let record = ApiKeyInfo::system(["feeds", "Feeds"]);
        assert_eq!(
            validate(&record),
            Err(vec![Violation::unrecognized("systemApis", "Feeds")])
        );
    }

    #[test]
    fn test_missing_and_unknown_type_and_logging() {
        let record = from_json(r#"{"systemApis": ["feeds"]}"#);
        assert_eq!(
            validate(&record),
            Err(vec![Violation::missing("type"), Violation::missing("logging")])
        );

        let record = from_json(r#"{"type": "robot", "logging": "verbose", "user": "alice"}"#);
        assert_eq!(
            validate(&record),
            Err(vec![
                Violation::unrecognized("type", "robot"),
                Violation::unrecognized("logging", "verbose"),
            ])
        );
    }

    #[test]
    fn test_type_and_logging_are_case_insensitive() {
        let record = from_json(r#"{"type": "System", "systemApis": ["sca"], "logging": "Both"}"#);
        assert_eq!(validate(&record), Ok(()));
    }

    #[test]
    fn test_create_rejects_id() {
        let record = ApiKeyInfo::personal("alice").with_id(1000);
        assert_eq!(validate(&record), Err(vec![Violation::unexpected("id")]));
    }

    #[test]
    fn test_response_requires_id() {
        let validator = ApiKeyValidator::default().with_purpose(RecordPurpose::Response);

        assert_eq!(
            validator.validate(&ApiKeyInfo::personal("alice")),
            Err(vec![Violation::missing("id")])
        );
        assert_eq!(
            validator.validate(&ApiKeyInfo::personal("alice").with_id(1000)),
            Ok(())
        );
    }

    #[test]
    fn test_key_hashing_mode() {
        let record = ApiKeyInfo::personal("alice").with_key("s3cr3t");

        assert_eq!(validate(&record), Ok(()));

        let hashing = ApiKeyValidator::default().with_key_hashing(KeyHashing::Enabled);
        assert_eq!(
            hashing.validate(&record),
            Err(vec![Violation::unexpected("key")])
        );
        assert_eq!(hashing.validate(&ApiKeyInfo::personal("alice")), Ok(()));
    }

    #[test]
    fn test_key_hashing_from_bool() {
        assert_eq!(KeyHashing::from(true), KeyHashing::Enabled);
        assert_eq!(KeyHashing::from(false), KeyHashing::Disabled);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let record = ApiKeyInfo::personal("")
            .with_id(5)
            .with_feed("nuget")
            .with_feed_group("internal");
        let validator = ApiKeyValidator::default();

        assert_eq!(validator.validate(&record), validator.validate(&record));
    }

    #[test]
    fn test_violation_set_independent_of_token_order() {
        let a = ApiKeyInfo::system(["feeds", "bogus", "full-control", "other"]);
        let b = ApiKeyInfo::system(["other", "full-control", "bogus", "feeds"]);

        let set = |r: &ApiKeyInfo| -> HashSet<Violation> {
            validate(r).unwrap_err().into_iter().collect()
        };

        assert_eq!(set(&a), set(&b));
        assert_eq!(set(&a).len(), 3);
    }

    #[test]
    fn test_normalization_preserves_verdict() {
        let records = [
            ApiKeyInfo::system(["sca", "feeds", "sca"]),
            ApiKeyInfo::system(["full-control", "sca"]),
            ApiKeyInfo::feed_key(["view", "junk"]).with_feed("a").with_feed_group("b"),
            ApiKeyInfo::personal(""),
        ];

        for record in records {
            assert_eq!(
                validate(&record).is_ok(),
                validate(&record.normalized()).is_ok()
            );
        }
    }

    // System: valid iff systemApis non-empty and every other scoping field null
    #[test]
    fn test_system_validity_property() {
        for has_apis in [false, true] {
            for populated in 0u8..16 {
                let mut record = ApiKeyInfo::new(ApiKeyType::System, ApiKeyBodyLogging::None);
                if has_apis {
                    record = record.with_system_apis(["feeds"]);
                }
                if populated & 1 != 0 {
                    record = record.with_package_permissions(["view"]);
                }
                if populated & 2 != 0 {
                    record = record.with_feed("nuget");
                }
                if populated & 4 != 0 {
                    record = record.with_feed_group("internal");
                }
                if populated & 8 != 0 {
                    record = record.with_user("alice");
                }

                let expected = has_apis && populated == 0;
                assert_eq!(validate(&record).is_ok(), expected, "{:?}", record);
            }
        }
    }

    // Feed: valid iff permissions non-empty, systemApis/user null, at most one of feed/feedGroup
    #[test]
    fn test_feed_validity_property() {
        for has_permissions in [false, true] {
            for populated in 0u8..16 {
                let mut record = ApiKeyInfo::new(ApiKeyType::Feed, ApiKeyBodyLogging::None);
                if has_permissions {
                    record = record.with_package_permissions(["view", "add"]);
                }
                if populated & 1 != 0 {
                    record = record.with_system_apis(["feeds"]);
                }
                if populated & 2 != 0 {
                    record = record.with_user("alice");
                }
                if populated & 4 != 0 {
                    record = record.with_feed("nuget");
                }
                if populated & 8 != 0 {
                    record = record.with_feed_group("internal");
                }

                let expected = has_permissions && populated & 3 == 0 && populated & 12 != 12;
                assert_eq!(validate(&record).is_ok(), expected, "{:?}", record);
            }
        }
    }

    // Personal: valid iff user set and every scoping field null
    #[test]
    fn test_personal_validity_property() {
        for has_user in [false, true] {
            for populated in 0u8..16 {
                let mut record = ApiKeyInfo::new(ApiKeyType::Personal, ApiKeyBodyLogging::None);
                if has_user {
                    record = record.with_user("alice");
                }
                if populated & 1 != 0 {
                    record = record.with_system_apis(["feeds"]);
                }
                if populated & 2 != 0 {
                    record = record.with_package_permissions(["view"]);
                }
                if populated & 4 != 0 {
                    record = record.with_feed("nuget");
                }
                if populated & 8 != 0 {
                    record = record.with_feed_group("internal");
                }

                let expected = has_user && populated == 0;
                assert_eq!(validate(&record).is_ok(), expected, "{:?}", record);
            }
        }
    }
}
