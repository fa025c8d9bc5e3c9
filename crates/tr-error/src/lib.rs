// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! tr-error
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Construction never fails: every input is optional, blank inputs collapse
//! to "absent", and unknown codes resolve through the registry fallback.
//! Render with [`ReportingError::to_text`] for logs and with
//! [`ReportingError::to_record`] for API responses.

mod builder;
mod error;
mod logging;
mod record;

pub use builder::ReportingErrorBuilder;
pub use error::ReportingError;
pub use record::ErrorRecord;

pub use tr_codes::{
    DefaultRegistry, ErrorCategory, ErrorCode, ErrorRegistry, error_description, error_name,
};
pub use tr_config::ReportingConfig;

/// Identifying name of this library; the default error origin.
pub const LIBRARY_NAME: &str = "tune-reporting";

/// Convenience alias for results whose error is a [`ReportingError`].
pub type Result<T> = std::result::Result<T, ReportingError>;
