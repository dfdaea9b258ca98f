//! API key wire record exchanged with the feed server

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, de};

use super::tokens::{
    ApiKeyBodyLogging, ApiKeyType, FULL_CONTROL, PackagePermission, SystemApi,
};

/// JSON object used by the create and list API key endpoints.
///
/// `type` and `logging` stay raw strings so that a missing or unknown token
/// surfaces as a violation instead of a deserialization failure. Use
/// [`ApiKeyInfo::key_type`] and [`ApiKeyInfo::body_logging`] for the parsed
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyInfo {
    /// Server-assigned identifier; used when deleting a key and never set on create
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,

    /// Key text. Generated by the server when omitted on create, and always
    /// absent when the server hashes keys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// `["full-control"]` or any combination of `feeds`, `sca`, `sbom-upload`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_apis: Option<Vec<String>>,

    /// Any combination of `view`, `add`, `promote`, `delete`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package_permissions: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feed_group: Option<String>,

    /// Accepts RFC 3339, an ISO date-time without offset, or a bare date;
    /// offset-less values are read as UTC
    #[serde(
        default,
        deserialize_with = "deserialize_expiration",
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<String>,

    /// Subject of a personal key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl ApiKeyInfo {
    /// Start a create request for the given key type
    pub fn new(key_type: ApiKeyType, logging: ApiKeyBodyLogging) -> Self {
        Self {
            key_type: Some(key_type.as_str().to_string()),
            logging: Some(logging.as_str().to_string()),
            ..Default::default()
        }
    }

    /// Convenience constructor for a system key
    pub fn system<'a>(apis: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(ApiKeyType::System, ApiKeyBodyLogging::None).with_system_apis(apis)
    }

    /// Convenience constructor for a feed key
    pub fn feed_key<'a>(permissions: impl IntoIterator<Item = &'a str>) -> Self {
        Self::new(ApiKeyType::Feed, ApiKeyBodyLogging::None).with_package_permissions(permissions)
    }

    /// Convenience constructor for a personal key
    pub fn personal(user: impl Into<String>) -> Self {
        Self::new(ApiKeyType::Personal, ApiKeyBodyLogging::None).with_user(user)
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_system_apis<'a>(mut self, apis: impl IntoIterator<Item = &'a str>) -> Self {
        self.system_apis = Some(apis.into_iter().map(str::to_string).collect());
        self
    }

    pub fn with_package_permissions<'a>(
        mut self,
        permissions: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        self.package_permissions = Some(permissions.into_iter().map(str::to_string).collect());
        self
    }

    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = Some(feed.into());
        self
    }

    pub fn with_feed_group(mut self, feed_group: impl Into<String>) -> Self {
        self.feed_group = Some(feed_group.into());
        self
    }

    pub fn with_expiration(mut self, expiration: DateTime<Utc>) -> Self {
        self.expiration = Some(expiration);
        self
    }

    pub fn with_logging(mut self, logging: ApiKeyBodyLogging) -> Self {
        self.logging = Some(logging.as_str().to_string());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Parsed key type, `None` when absent or unrecognized
    pub fn key_type(&self) -> Option<ApiKeyType> {
        self.key_type.as_deref().and_then(|t| t.parse().ok())
    }

    /// Parsed logging mode, `None` when absent or unrecognized
    pub fn body_logging(&self) -> Option<ApiKeyBodyLogging> {
        self.logging.as_deref().and_then(|l| l.parse().ok())
    }

    /// Label shown in key lists; falls back to `(ID=<id>)` like the server does
    pub fn display_label(&self) -> String {
        match (&self.display_name, self.id) {
            (Some(name), _) if !name.trim().is_empty() => name.clone(),
            (_, Some(id)) => format!("(ID={})", id),
            _ => "(new key)".to_string(),
        }
    }

    /// Whether the key has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expiration.is_some_and(|exp| exp <= now)
    }

    /// Copy with canonical `type`/`logging` tokens and de-duplicated,
    /// canonically ordered token sets. Unrecognized tokens are kept in
    /// first-seen order after the recognized ones.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();

        if let Some(key_type) = self.key_type() {
            normalized.key_type = Some(key_type.as_str().to_string());
        }
        if let Some(logging) = self.body_logging() {
            normalized.logging = Some(logging.as_str().to_string());
        }

        normalized.system_apis = self.system_apis.as_deref().map(|apis| {
            let known = std::iter::once(FULL_CONTROL)
                .chain(SystemApi::ALL.into_iter().map(|api| api.as_str()));
            canonical_token_order(apis, known)
        });
        normalized.package_permissions = self.package_permissions.as_deref().map(|perms| {
            canonical_token_order(
                perms,
                PackagePermission::ALL.into_iter().map(|p| p.as_str()),
            )
        });

        normalized
    }
}

fn canonical_token_order<'a>(
    tokens: &[String],
    known: impl Iterator<Item = &'a str>,
) -> Vec<String> {
    let known: Vec<&str> = known.collect();
    let mut ordered: Vec<String> = known
        .iter()
        .filter(|k| tokens.iter().any(|t| t == *k))
        .map(|k| k.to_string())
        .collect();

    for token in tokens {
        if !known.contains(&token.as_str()) && !ordered.contains(token) {
            ordered.push(token.clone());
        }
    }

    ordered
}

fn deserialize_expiration<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer)?
        .map(|raw| {
            parse_timestamp(&raw)
                .ok_or_else(|| de::Error::custom(format!("invalid expiration timestamp '{}'", raw)))
        })
        .transpose()
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
