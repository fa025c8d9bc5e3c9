// SPDX-License-Identifier: MIT OR Apache-2.0
#![doc = include_str!("../README.md")]
//! tr-codes
#![deny(unsafe_code)]
#![warn(missing_docs)]
//!
//! Every TUNE Reporting failure is classified by an [`ErrorCode`]. A code is
//! a plain `u16` so that values outside the built-in table (newer server
//! codes, HTTP statuses passed through verbatim) remain representable; the
//! [`ErrorRegistry`] seam turns any code into a name and a description and
//! is required to be total.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

// ---------------------------------------------------------------------------
// ErrorCategory
// ---------------------------------------------------------------------------

/// Broad family that an [`ErrorCode`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Not an error at all.
    Success,
    /// Defects inside the client library.
    Software,
    /// Caller-supplied input was rejected before or by the service.
    Request,
    /// Payload encoding, decoding, or upload problems.
    Data,
    /// Credential or authorisation problems.
    Auth,
    /// Client configuration problems.
    Config,
    /// The sentinel used when nothing more specific is known.
    Unexpected,
    /// The code is not in the registry.
    Unknown,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Success => "success",
            Self::Software => "software",
            Self::Request => "request",
            Self::Data => "data",
            Self::Auth => "auth",
            Self::Config => "config",
            Self::Unexpected => "unexpected",
            Self::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ErrorCode
// ---------------------------------------------------------------------------

/// Stable numeric error code.
///
/// Serialises as a bare integer and displays as one. Registered values are
/// exposed as associated constants; any other value is still a valid code
/// and resolves to the registry fallback.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// No error.
    pub const SUCCESS: Self = Self(0);
    /// Generic defect inside the client library.
    pub const SOFTWARE: Self = Self(600);
    /// Error raised without a more specific code assigned.
    pub const UNASSIGNED: Self = Self(601);
    /// A caller passed an invalid argument.
    pub const ARGUMENT: Self = Self(602);
    /// Request parameters failed validation.
    pub const VALIDATION: Self = Self(603);
    /// The request could not be completed.
    pub const REQUEST: Self = Self(604);
    /// The service answered with a non-success HTTP status.
    pub const REQUEST_HTTP: Self = Self(605);
    /// The service could not be reached.
    pub const REQUEST_CONNECT: Self = Self(606);
    /// A response body was not valid JSON or had the wrong shape.
    pub const JSON_DECODING: Self = Self(607);
    /// A value had an unexpected type or content.
    pub const UNEXPECTED_VALUE: Self = Self(608);
    /// Every retry attempt failed.
    pub const RETRY_EXHAUSTED: Self = Self(609);
    /// Uploading report data failed.
    pub const UPLOAD_DATA: Self = Self(610);
    /// Authentication was rejected.
    pub const AUTH: Self = Self(611);
    /// Client configuration is invalid.
    pub const CONFIG: Self = Self(612);
    /// Sentinel for failures with no better classification.
    pub const UNEXPECTED: Self = Self(699);

    /// Wrap a raw value.
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// The raw numeric value.
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Whether the built-in registry knows this code.
    pub fn is_registered(self) -> bool {
        lookup(self).is_some()
    }

    /// Every registered code, in ascending order.
    pub fn all() -> impl Iterator<Item = ErrorCode> {
        REGISTRY.iter().map(|entry| entry.code)
    }

    /// Returns the broad [`ErrorCategory`] this code belongs to.
    pub fn category(self) -> ErrorCategory {
        match self {
            Self::SUCCESS => ErrorCategory::Success,
            Self::SOFTWARE | Self::UNASSIGNED => ErrorCategory::Software,
            Self::ARGUMENT
            | Self::VALIDATION
            | Self::REQUEST
            | Self::REQUEST_HTTP
            | Self::REQUEST_CONNECT
            | Self::RETRY_EXHAUSTED => ErrorCategory::Request,
            Self::JSON_DECODING | Self::UNEXPECTED_VALUE | Self::UPLOAD_DATA => {
                ErrorCategory::Data
            }
            Self::AUTH => ErrorCategory::Auth,
            Self::CONFIG => ErrorCategory::Config,
            Self::UNEXPECTED => ErrorCategory::Unexpected,
            _ => ErrorCategory::Unknown,
        }
    }
}

impl Default for ErrorCode {
    fn default() -> Self {
        Self::UNEXPECTED
    }
}

impl From<u16> for ErrorCode {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Name returned for codes missing from the built-in table.
pub const UNKNOWN_NAME: &str = "REP_ERR_UNKNOWN";

/// Description returned for codes missing from the built-in table.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown error.";

/// Resolves an [`ErrorCode`] to human-facing text.
///
/// Implementations must be total: an unrecognised code yields a fallback
/// string, never a panic, because lookups run on the error-reporting path.
pub trait ErrorRegistry {
    /// Short symbolic name, e.g. `REP_ERR_VALIDATION`.
    fn name(&self, code: ErrorCode) -> Cow<'_, str>;

    /// One-sentence description, e.g. `Validation failed.`.
    fn description(&self, code: ErrorCode) -> Cow<'_, str>;
}

impl<T: ErrorRegistry + ?Sized> ErrorRegistry for &T {
    fn name(&self, code: ErrorCode) -> Cow<'_, str> {
        (**self).name(code)
    }

    fn description(&self, code: ErrorCode) -> Cow<'_, str> {
        (**self).description(code)
    }
}

impl<T: ErrorRegistry + ?Sized> ErrorRegistry for Box<T> {
    fn name(&self, code: ErrorCode) -> Cow<'_, str> {
        (**self).name(code)
    }

    fn description(&self, code: ErrorCode) -> Cow<'_, str> {
        (**self).description(code)
    }
}

/// The built-in code table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultRegistry;

impl ErrorRegistry for DefaultRegistry {
    fn name(&self, code: ErrorCode) -> Cow<'_, str> {
        Cow::Borrowed(error_name(code))
    }

    fn description(&self, code: ErrorCode) -> Cow<'_, str> {
        Cow::Borrowed(error_description(code))
    }
}

struct Entry {
    code: ErrorCode,
    name: &'static str,
    description: &'static str,
}

// Sorted by code; `lookup` relies on it.
const REGISTRY: &[Entry] = &[
    Entry {
        code: ErrorCode::SUCCESS,
        name: "REP_SUCCESS",
        description: "Success.",
    },
    Entry {
        code: ErrorCode::SOFTWARE,
        name: "REP_ERR_SOFTWARE",
        description: "Software error.",
    },
    Entry {
        code: ErrorCode::UNASSIGNED,
        name: "REP_ERR_UNASSIGNED",
        description: "Unassigned error.",
    },
    Entry {
        code: ErrorCode::ARGUMENT,
        name: "REP_ERR_ARGUMENT",
        description: "Invalid argument.",
    },
    Entry {
        code: ErrorCode::VALIDATION,
        name: "REP_ERR_VALIDATION",
        description: "Validation failed.",
    },
    Entry {
        code: ErrorCode::REQUEST,
        name: "REP_ERR_REQUEST",
        description: "Request failed.",
    },
    Entry {
        code: ErrorCode::REQUEST_HTTP,
        name: "REP_ERR_REQUEST_HTTP",
        description: "HTTP request failed.",
    },
    Entry {
        code: ErrorCode::REQUEST_CONNECT,
        name: "REP_ERR_REQUEST_CONNECT",
        description: "Connection to service failed.",
    },
    Entry {
        code: ErrorCode::JSON_DECODING,
        name: "REP_ERR_JSON_DECODING",
        description: "JSON decoding failed.",
    },
    Entry {
        code: ErrorCode::UNEXPECTED_VALUE,
        name: "REP_ERR_UNEXPECTED_VALUE",
        description: "Unexpected value.",
    },
    Entry {
        code: ErrorCode::RETRY_EXHAUSTED,
        name: "REP_ERR_RETRY_EXHAUSTED",
        description: "Retries exhausted.",
    },
    Entry {
        code: ErrorCode::UPLOAD_DATA,
        name: "REP_ERR_UPLOAD_DATA",
        description: "Data upload failed.",
    },
    Entry {
        code: ErrorCode::AUTH,
        name: "REP_ERR_AUTH",
        description: "Authentication failed.",
    },
    Entry {
        code: ErrorCode::CONFIG,
        name: "REP_ERR_CONFIG",
        description: "Configuration error.",
    },
    Entry {
        code: ErrorCode::UNEXPECTED,
        name: "REP_ERR_UNEXPECTED",
        description: "Unexpected error.",
    },
];

fn lookup(code: ErrorCode) -> Option<&'static Entry> {
    REGISTRY
        .binary_search_by_key(&code, |entry| entry.code)
        .ok()
        .map(|idx| &REGISTRY[idx])
}

/// Symbolic name of `code`, or [`UNKNOWN_NAME`].
pub fn error_name(code: ErrorCode) -> &'static str {
    lookup(code).map_or(UNKNOWN_NAME, |entry| entry.name)
}

/// Description of `code`, or [`UNKNOWN_DESCRIPTION`].
pub fn error_description(code: ErrorCode) -> &'static str {
    lookup(code).map_or(UNKNOWN_DESCRIPTION, |entry| entry.description)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
