//! Typed API key credential
//!
//! [`ApiKeyCredential`] is what a validated [`ApiKeyInfo`] turns into: each
//! key type carries exactly the fields that are legal for it, so the
//! type-conditional rules hold by construction.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};

use super::entity::ApiKeyInfo;
use super::tokens::{ApiKeyBodyLogging, ApiKeyType, FULL_CONTROL, PackagePermission, SystemApi};
use super::validation::ApiKeyValidator;
use crate::domain::violation::Violation;

/// System APIs granted to a system key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemApis {
    FullControl,
    Limited(BTreeSet<SystemApi>),
}

impl SystemApis {
    pub fn allows(&self, api: SystemApi) -> bool {
        match self {
            Self::FullControl => true,
            Self::Limited(apis) => apis.contains(&api),
        }
    }

    fn to_tokens(&self) -> Vec<String> {
        match self {
            Self::FullControl => vec![FULL_CONTROL.to_string()],
            Self::Limited(apis) => apis.iter().map(|a| a.as_str().to_string()).collect(),
        }
    }
}

/// Feeds a feed key applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedTarget {
    AllFeeds,
    Feed(String),
    FeedGroup(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiKeyScope {
    System {
        apis: SystemApis,
    },
    Feed {
        permissions: BTreeSet<PackagePermission>,
        target: FeedTarget,
    },
    Personal {
        user: String,
    },
}

impl ApiKeyScope {
    pub fn key_type(&self) -> ApiKeyType {
        match self {
            Self::System { .. } => ApiKeyType::System,
            Self::Feed { .. } => ApiKeyType::Feed,
            Self::Personal { .. } => ApiKeyType::Personal,
        }
    }
}

/// API key whose scope invariants are enforced by its type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyCredential {
    pub id: Option<i64>,
    pub key: Option<String>,
    pub display_name: Option<String>,
    pub description: Option<String>,
    pub scope: ApiKeyScope,
    pub expiration: Option<DateTime<Utc>>,
    pub logging: ApiKeyBodyLogging,
}

impl ApiKeyCredential {
    /// Validate `info` and convert it into a typed credential.
    ///
    /// Returns every violation found when the record is not well-formed.
    pub fn from_info(
        info: &ApiKeyInfo,
        validator: &ApiKeyValidator,
    ) -> Result<Self, Vec<Violation>> {
        let violations = validator.violations(info);
        if !violations.is_empty() {
            return Err(violations);
        }

        // A clean validation guarantees both parse.
        let key_type = info
            .key_type()
            .ok_or_else(|| vec![Violation::missing("type")])?;
        let logging = info
            .body_logging()
            .ok_or_else(|| vec![Violation::missing("logging")])?;

        let scope = match key_type {
            ApiKeyType::System => ApiKeyScope::System {
                apis: parse_system_apis(info.system_apis.as_deref().unwrap_or_default()),
            },
            ApiKeyType::Feed => ApiKeyScope::Feed {
                permissions: info
                    .package_permissions
                    .iter()
                    .flatten()
                    .filter_map(|p| p.parse().ok())
                    .collect(),
                target: match (&info.feed, &info.feed_group) {
                    (Some(feed), _) => FeedTarget::Feed(feed.clone()),
                    (None, Some(group)) => FeedTarget::FeedGroup(group.clone()),
                    (None, None) => FeedTarget::AllFeeds,
                },
            },
            ApiKeyType::Personal => ApiKeyScope::Personal {
                user: info.user.clone().unwrap_or_default(),
            },
        };

        Ok(Self {
            id: info.id,
            key: info.key.clone(),
            display_name: info.display_name.clone(),
            description: info.description.clone(),
            scope,
            expiration: info.expiration,
            logging,
        })
    }

    pub fn key_type(&self) -> ApiKeyType {
        self.scope.key_type()
    }
}

fn parse_system_apis(tokens: &[String]) -> SystemApis {
    if tokens.iter().any(|t| t == FULL_CONTROL) {
        SystemApis::FullControl
    } else {
        SystemApis::Limited(tokens.iter().filter_map(|t| t.parse().ok()).collect())
    }
}

impl From<ApiKeyCredential> for ApiKeyInfo {
    fn from(credential: ApiKeyCredential) -> Self {
        let mut info = ApiKeyInfo::new(credential.key_type(), credential.logging);
        info.id = credential.id;
        info.key = credential.key;
        info.display_name = credential.display_name;
        info.description = credential.description;
        info.expiration = credential.expiration;

        match credential.scope {
            ApiKeyScope::System { apis } => {
                info.system_apis = Some(apis.to_tokens());
            }
            ApiKeyScope::Feed {
                permissions,
                target,
            } => {
                info.package_permissions = Some(
                    permissions
                        .iter()
                        .map(|p| p.as_str().to_string())
                        .collect(),
                );
                match target {
                    FeedTarget::AllFeeds => {}
                    FeedTarget::Feed(feed) => info.feed = Some(feed),
                    FeedTarget::FeedGroup(group) => info.feed_group = Some(group),
                }
            }
            ApiKeyScope::Personal { user } => {
                info.user = Some(user);
            }
        }

        info
    }
}
