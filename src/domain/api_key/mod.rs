//! API key domain
//!
//! Wire record for the create/list API key endpoints, its token
//! vocabularies, the type-conditional validator, and the typed credential a
//! valid record converts into.

mod entity;
mod scope;
mod tokens;
mod validation;

pub use entity::ApiKeyInfo;
pub use scope::{ApiKeyCredential, ApiKeyScope, FeedTarget, SystemApis};
pub use tokens::{
    ApiKeyBodyLogging, ApiKeyType, FULL_CONTROL, PackagePermission, SystemApi, UnknownToken,
};
pub use validation::{ApiKeyValidationOptions, ApiKeyValidator, KeyHashing, RecordPurpose};
