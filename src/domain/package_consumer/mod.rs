//! Package consumer domain

mod entity;
mod validation;

pub use entity::PackageConsumer;
pub use validation::{PackageConsumerValidator, UrlStrictness};
