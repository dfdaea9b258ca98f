//! Domain layer - wire records and their validation

pub mod api_key;
pub mod batch;
pub mod error;
pub mod package_consumer;
pub mod violation;

pub use api_key::{
    ApiKeyBodyLogging, ApiKeyCredential, ApiKeyInfo, ApiKeyScope, ApiKeyType,
    ApiKeyValidationOptions, ApiKeyValidator, FeedTarget, KeyHashing, PackagePermission,
    RecordPurpose, SystemApi, SystemApis,
};
pub use batch::{BatchEntry, BatchReport, validate_batch};
pub use error::DomainError;
pub use package_consumer::{PackageConsumer, PackageConsumerValidator, UrlStrictness};
pub use violation::{Validator, Violation};
