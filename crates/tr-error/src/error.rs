// SPDX-License-Identifier: MIT OR Apache-2.0
//! The [`ReportingError`] value and its text rendering.

use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tr_codes::{ErrorCategory, ErrorCode};

use crate::builder::ReportingErrorBuilder;
use crate::record::ErrorRecord;

pub(crate) type BoxedSource = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// A TUNE Reporting failure.
///
/// Immutable once built, except for the request trace, which is often only
/// known after the error has been raised and can be attached later with
/// [`set_request_trace`](Self::set_request_trace).
#[derive(Clone)]
pub struct ReportingError {
    pub(crate) code: ErrorCode,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) message: Option<String>,
    pub(crate) origin: String,
    pub(crate) status: Option<u16>,
    pub(crate) reason: Option<String>,
    pub(crate) details: Option<Value>,
    pub(crate) sub_errors: Vec<Value>,
    pub(crate) request_trace: Option<String>,
    pub(crate) source: Option<BoxedSource>,
}

impl ReportingError {
    /// Start building an error. Every field is optional.
    pub fn builder() -> ReportingErrorBuilder {
        ReportingErrorBuilder::new()
    }

    /// An error carrying only `code`.
    pub fn new(code: ErrorCode) -> Self {
        Self::builder().code(code).build()
    }

    /// An error carrying `code` and caller context.
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::builder().code(code).message(message).build()
    }

    /// The resolved code; [`ErrorCode::UNEXPECTED`] when none was given.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Registry name of [`code`](Self::code), resolved at construction.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registry description of [`code`](Self::code), resolved at construction.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Shorthand for `self.code().category()`.
    pub fn category(&self) -> ErrorCategory {
        self.code.category()
    }

    /// The composed message: `"{code}: {description}"`, followed by
    /// `": '{message}'"` when caller context was given.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Component that raised the error.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Upstream transport status, e.g. the HTTP status code.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    /// Upstream status phrase.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Opaque supplementary payload.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Nested error records; empty when there are none.
    pub fn sub_errors(&self) -> &[Value] {
        &self.sub_errors
    }

    /// Serialised outbound request that triggered the failure.
    pub fn request_trace(&self) -> Option<&str> {
        self.request_trace.as_deref()
    }

    /// Attach the outbound request. A blank trace clears it.
    pub fn set_request_trace(&mut self, trace: impl Into<String>) {
        self.request_trace = non_blank(trace.into());
    }

    /// Drop any attached request trace.
    pub fn clear_request_trace(&mut self) {
        self.request_trace = None;
    }

    /// Owned form of [`set_request_trace`](Self::set_request_trace), for
    /// annotating an error while propagating it.
    #[must_use]
    pub fn with_request_trace(mut self, trace: impl Into<String>) -> Self {
        self.set_request_trace(trace);
        self
    }

    /// Human-readable rendering; identical to `Display`.
    ///
    /// `"{origin}: "` followed by the present parts, comma-separated, in a
    /// fixed order: composed message, reason, status, code and name,
    /// details, sub-errors.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    /// Structured form for API responses.
    pub fn to_record(&self) -> ErrorRecord {
        ErrorRecord::from(self)
    }

    /// [`to_record`](Self::to_record) as a JSON object.
    pub fn to_json(&self) -> Value {
        // A record only holds strings, integers, and JSON values.
        serde_json::to_value(self.to_record()).unwrap_or(Value::Null)
    }
}

impl Default for ReportingError {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for ReportingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("ReportingError");
        d.field("code", &self.code);
        d.field("name", &self.name);
        d.field("origin", &self.origin);
        if let Some(ref message) = self.message {
            d.field("message", message);
        }
        if let Some(status) = self.status {
            d.field("status", &status);
        }
        if let Some(ref reason) = self.reason {
            d.field("reason", reason);
        }
        if let Some(ref details) = self.details {
            d.field("details", details);
        }
        if !self.sub_errors.is_empty() {
            d.field("sub_errors", &self.sub_errors);
        }
        if self.request_trace.is_some() {
            d.field("request_trace", &"<redacted>");
        }
        if let Some(ref src) = self.source {
            d.field("source", &src.to_string());
        }
        d.finish()
    }
}

impl fmt::Display for ReportingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", self.origin)?;
        let mut sep = "";
        if let Some(ref message) = self.message {
            write!(f, "{message}")?;
            sep = ", ";
        }
        if let Some(ref reason) = self.reason {
            write!(f, "{sep}Error Reason: '{reason}'")?;
            sep = ", ";
        }
        if let Some(status) = self.status {
            write!(f, "{sep}Error Status: {status}")?;
            sep = ", ";
        }
        write!(f, "{sep}Exit Code: {}, Error Name: {}", self.code, self.name)?;
        if let Some(ref details) = self.details {
            write!(f, ", Error Details: {}", PlainJson(details))?;
        }
        if !self.sub_errors.is_empty() {
            write!(f, ", Errors: {}", Value::Array(self.sub_errors.clone()))?;
        }
        Ok(())
    }
}

impl std::error::Error for ReportingError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<serde_json::Error> for ReportingError {
    fn from(err: serde_json::Error) -> Self {
        Self::builder()
            .code(ErrorCode::JSON_DECODING)
            .message(err.to_string())
            .source(err)
            .build()
    }
}

impl From<std::io::Error> for ReportingError {
    fn from(err: std::io::Error) -> Self {
        Self::builder()
            .code(ErrorCode::SOFTWARE)
            .message(err.to_string())
            .source(err)
            .build()
    }
}

/// JSON strings render bare; everything else renders as compact JSON.
struct PlainJson<'a>(&'a Value);

impl fmt::Display for PlainJson<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalisation
// ---------------------------------------------------------------------------

/// `"{code}: {description}"` plus `": '{message}'"` when `message` is not blank.
///
/// Trailing periods are stripped from the description. Returns `None` only
/// when both the message and the description are empty.
pub(crate) fn compose_message(
    code: ErrorCode,
    description: &str,
    message: Option<&str>,
) -> Option<String> {
    let description = description.trim_end_matches('.');
    let prefix = format!("{code}: {description}");
    match message.map(str::trim).filter(|m| !m.is_empty()) {
        Some(message) => Some(format!("{prefix}: '{message}'")),
        None if !description.is_empty() => Some(prefix),
        None => None,
    }
}

pub(crate) fn non_blank(s: String) -> Option<String> {
    if s.trim().is_empty() { None } else { Some(s) }
}

/// JSON truthiness: `null`, `false`, `0`, `""`, `[]` and `{}` are absent.
pub(crate) fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LIBRARY_NAME;
    use serde_json::json;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn compose_with_message() {
        let got = compose_message(ErrorCode::VALIDATION, "Validation failed.", Some(" bad date "));
        assert_eq!(got.as_deref(), Some("603: Validation failed: 'bad date'"));
    }

    #[test]
    fn compose_without_message() {
        let got = compose_message(ErrorCode::AUTH, "Authentication failed.", None);
        assert_eq!(got.as_deref(), Some("611: Authentication failed"));
    }

    #[test]
    fn compose_strips_every_trailing_period() {
        let got = compose_message(ErrorCode::AUTH, "Denied...", Some(""));
        assert_eq!(got.as_deref(), Some("611: Denied"));
    }

    #[test]
    fn compose_empty_description_without_message_is_absent() {
        assert_eq!(compose_message(ErrorCode::new(1), "", Some("   ")), None);
        assert_eq!(compose_message(ErrorCode::new(1), "...", None), None);
    }

    #[test]
    fn compose_empty_description_with_message() {
        let got = compose_message(ErrorCode::new(1), "", Some("boom"));
        assert_eq!(got.as_deref(), Some("1: : 'boom'"));
    }

    #[test]
    fn empty_values() {
        for v in [json!(null), json!(false), json!(0), json!(0.0), json!(""), json!([]), json!({})] {
            assert!(is_empty_value(&v), "{v} should be empty");
        }
        for v in [json!(true), json!(1), json!(" "), json!([0]), json!({"a": null})] {
            assert!(!is_empty_value(&v), "{v} should be present");
        }
    }

    #[test]
    fn default_error() {
        let err = ReportingError::default();
        assert_eq!(err.code(), ErrorCode::UNEXPECTED);
        assert_eq!(err.name(), "REP_ERR_UNEXPECTED");
        assert_eq!(err.description(), "Unexpected error.");
        assert_eq!(err.message(), Some("699: Unexpected error"));
        assert_eq!(err.origin(), LIBRARY_NAME);
        assert_eq!(err.status(), None);
        assert_eq!(err.reason(), None);
        assert_eq!(err.details(), None);
        assert!(err.sub_errors().is_empty());
        assert_eq!(err.request_trace(), None);
        assert_eq!(err.category(), ErrorCategory::Unexpected);
    }

    #[test]
    fn text_for_default_error() {
        assert_eq!(
            ReportingError::default().to_text(),
            "tune-reporting: 699: Unexpected error, Exit Code: 699, Error Name: REP_ERR_UNEXPECTED"
        );
    }

    #[test]
    fn text_for_http_failure() {
        let err = ReportingError::builder()
            .code(ErrorCode::VALIDATION)
            .message("bad date")
            .status(400)
            .reason("Bad Request")
            .build();
        assert_eq!(
            err.to_text(),
            "tune-reporting: 603: Validation failed: 'bad date', Error Reason: 'Bad Request', \
             Error Status: 400, Exit Code: 603, Error Name: REP_ERR_VALIDATION"
        );
    }

    #[test]
    fn text_renders_details_and_sub_errors() {
        let err = ReportingError::builder()
            .code(ErrorCode::UPLOAD_DATA)
            .details("disk quota")
            .sub_error(json!({"field": "start_date"}))
            .build();
        assert_eq!(
            err.to_text(),
            "tune-reporting: 610: Data upload failed, Exit Code: 610, Error Name: REP_ERR_UPLOAD_DATA, \
             Error Details: disk quota, Errors: [{\"field\":\"start_date\"}]"
        );
    }

    #[test]
    fn text_renders_structured_details_as_json() {
        let err = ReportingError::builder()
            .details(json!({"limit": 10}))
            .build();
        assert!(err.to_text().ends_with("Error Details: {\"limit\":10}"));
    }

    #[test]
    fn display_matches_to_text() {
        let err = ReportingError::with_message(ErrorCode::AUTH, "expired key");
        assert_eq!(format!("{err}"), err.to_text());
    }

    #[test]
    fn request_trace_is_settable() {
        let mut err = ReportingError::new(ErrorCode::REQUEST);
        assert_eq!(err.request_trace(), None);
        err.set_request_trace("curl -X GET https://api.example.com/v2/advertiser/stats");
        assert_eq!(
            err.request_trace(),
            Some("curl -X GET https://api.example.com/v2/advertiser/stats")
        );
        err.set_request_trace("  ");
        assert_eq!(err.request_trace(), None);
        let err = err.with_request_trace("curl");
        assert_eq!(err.request_trace(), Some("curl"));
    }

    #[test]
    fn request_trace_does_not_touch_other_fields() {
        let mut err = ReportingError::with_message(ErrorCode::REQUEST, "boom");
        let before = err.to_text();
        let record = err.to_record();
        err.set_request_trace("curl https://example.com");
        assert_eq!(err.to_text(), before);
        assert_eq!(err.to_record(), record);
        err.clear_request_trace();
        assert!(err.request_trace().is_none());
    }

    #[test]
    fn debug_redacts_request_trace() {
        let err = ReportingError::new(ErrorCode::AUTH).with_request_trace("api_key=secret");
        let dbg = format!("{err:?}");
        assert!(dbg.contains("ReportingError"));
        assert!(dbg.contains("<redacted>"));
        assert!(!dbg.contains("secret"));
    }

    #[test]
    fn from_io_error_keeps_source() {
        let err: ReportingError = io::Error::new(io::ErrorKind::NotFound, "missing").into();
        assert_eq!(err.code(), ErrorCode::SOFTWARE);
        assert_eq!(err.message(), Some("600: Software error: 'missing'"));
        assert_eq!(err.source().unwrap().to_string(), "missing");
    }

    #[test]
    fn from_json_error() {
        let json_err = serde_json::from_str::<Value>("{oops").unwrap_err();
        let err = ReportingError::from(json_err);
        assert_eq!(err.code(), ErrorCode::JSON_DECODING);
        assert!(
            err.source()
                .unwrap()
                .downcast_ref::<serde_json::Error>()
                .is_some()
        );
    }

    #[test]
    fn source_is_none_by_default() {
        assert!(ReportingError::default().source().is_none());
    }
}
