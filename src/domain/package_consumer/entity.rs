//! Package consumer value object

use std::fmt;

use serde::{Deserialize, Serialize};

/// The package (name, group, version) that consumes a dependency, along with
/// the feed it was resolved from and where it can be found.
///
/// Everything except `version` is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageConsumer {
    /// Absent on the wire deserializes as empty so it is reported, not rejected
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    group: Option<String>,
    #[serde(default)]
    version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    feed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    url: Option<String>,
}

impl PackageConsumer {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            group: None,
            version: version.into(),
            feed: None,
            url: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_feed(mut self, feed: impl Into<String>) -> Self {
        self.feed = Some(feed.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn feed(&self) -> Option<&str> {
        self.feed.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Replace the consuming version, e.g. after the consumer is upgraded
    pub fn set_version(&mut self, version: impl Into<String>) {
        self.version = version.into();
    }
}

impl fmt::Display for PackageConsumer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) if !group.is_empty() => {
                write!(f, "{}/{} {}", group, self.name, self.version)
            }
            _ => write!(f, "{} {}", self.name, self.version),
        }
    }
}
