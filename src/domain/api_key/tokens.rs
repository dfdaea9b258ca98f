//! Enumerated tokens used by API key records

use std::fmt;
use std::str::FromStr;

/// Token that failed to parse into one of the known enumerations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownToken(pub String);

impl fmt::Display for UnknownToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown token '{}'", self.0)
    }
}

impl std::error::Error for UnknownToken {}

/// Purpose an API key is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiKeyType {
    /// Access to system-level APIs
    System,
    /// Access to packages in one feed, one feed group, or all feeds
    Feed,
    /// Acts on behalf of a single user
    Personal,
}

impl ApiKeyType {
    pub const ALL: [Self; 3] = [Self::System, Self::Feed, Self::Personal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Feed => "feed",
            Self::Personal => "personal",
        }
    }
}

impl FromStr for ApiKeyType {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

impl fmt::Display for ApiKeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request/response body logging for calls made with a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiKeyBodyLogging {
    #[default]
    None,
    Requests,
    Responses,
    Both,
}

impl ApiKeyBodyLogging {
    pub const ALL: [Self; 4] = [Self::None, Self::Requests, Self::Responses, Self::Both];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Requests => "requests",
            Self::Responses => "responses",
            Self::Both => "both",
        }
    }
}

impl FromStr for ApiKeyBodyLogging {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

impl fmt::Display for ApiKeyBodyLogging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Token granting every system API; never combined with others
pub const FULL_CONTROL: &str = "full-control";

/// System API a limited system key may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SystemApi {
    Feeds,
    Sca,
    SbomUpload,
}

impl SystemApi {
    pub const ALL: [Self; 3] = [Self::Feeds, Self::Sca, Self::SbomUpload];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feeds => "feeds",
            Self::Sca => "sca",
            Self::SbomUpload => "sbom-upload",
        }
    }
}

impl FromStr for SystemApi {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|api| api.as_str() == s)
            .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

/// Permission a feed key holds on packages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PackagePermission {
    View,
    Add,
    Promote,
    Delete,
}

impl PackagePermission {
    pub const ALL: [Self; 4] = [Self::View, Self::Add, Self::Promote, Self::Delete];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Add => "add",
            Self::Promote => "promote",
            Self::Delete => "delete",
        }
    }
}

impl FromStr for PackagePermission {
    type Err = UnknownToken;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownToken(s.to_string()))
    }
}

/// Whether `token` may appear in `systemApis`
pub fn is_system_api_token(token: &str) -> bool {
    token == FULL_CONTROL || token.parse::<SystemApi>().is_ok()
}
