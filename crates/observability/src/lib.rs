//! # huster-observability
//!
//! Structured Logging via tracing-subscriber (Text oder JSON auf stderr).

pub mod logging;

pub use logging::{log_format_gueltig, log_level_gueltig, logging_initialisieren};
