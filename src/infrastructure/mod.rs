//! Infrastructure layer - process-level concerns

pub mod logging;
