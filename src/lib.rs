//! ProGet payload contracts
//!
//! Wire records exchanged with a ProGet server and the validation rules they
//! must satisfy before they are sent or after they are received:
//! - `ApiKeyInfo`: API key create/list payloads, with type-conditional fields
//! - `PackageConsumer`: the package consuming a scanned dependency

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    ApiKeyCredential, ApiKeyInfo, ApiKeyValidator, BatchReport, PackageConsumer,
    PackageConsumerValidator, Validator, Violation, validate_batch,
};
