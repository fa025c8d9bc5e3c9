// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fluent construction of [`ReportingError`].

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tr_codes::{DefaultRegistry, ErrorCode, ErrorRegistry};
use tr_config::ReportingConfig;

use crate::LIBRARY_NAME;
use crate::error::{BoxedSource, ReportingError, compose_message, is_empty_value, non_blank};

/// Builder returned by [`ReportingError::builder`].
///
/// Setters accept anything; normalisation happens in [`build`](Self::build),
/// which cannot fail.
///
/// ```
/// use tr_error::{ErrorCode, ReportingError};
///
/// let err = ReportingError::builder()
///     .code(ErrorCode::REQUEST_HTTP)
///     .status(503)
///     .reason("Service Unavailable")
///     .origin("advertiser-stats")
///     .build();
/// assert_eq!(err.origin(), "advertiser-stats");
/// ```
#[derive(Default)]
#[must_use]
pub struct ReportingErrorBuilder {
    code: Option<ErrorCode>,
    message: Option<String>,
    sub_errors: Vec<Value>,
    status: Option<u16>,
    reason: Option<String>,
    details: Option<Value>,
    origin: Option<String>,
    default_origin: Option<String>,
    request_trace: Option<String>,
    source: Option<BoxedSource>,
}

impl ReportingErrorBuilder {
    /// Empty builder; equivalent to [`ReportingError::builder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifying code. Defaults to [`ErrorCode::UNEXPECTED`].
    pub fn code(mut self, code: impl Into<ErrorCode>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Caller context appended to the composed message.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Append one nested error record.
    ///
    /// A value that fails to serialise is dropped.
    pub fn sub_error(mut self, error: impl Serialize) -> Self {
        if let Ok(v) = serde_json::to_value(error) {
            self.sub_errors.push(v);
        }
        self
    }

    /// Append several nested error records.
    pub fn sub_errors<I>(self, errors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Serialize,
    {
        errors.into_iter().fold(self, |b, e| b.sub_error(e))
    }

    /// Upstream transport status. `0` counts as absent.
    pub fn status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// Upstream status phrase.
    pub fn reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Supplementary payload, stored as JSON.
    ///
    /// A value that fails to serialise is dropped.
    pub fn details(mut self, details: impl Serialize) -> Self {
        self.details = serde_json::to_value(details).ok();
        self
    }

    /// Component raising the error.
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Serialised outbound request.
    pub fn request_trace(mut self, trace: impl Into<String>) -> Self {
        self.request_trace = Some(trace.into());
        self
    }

    /// Underlying cause, exposed through [`std::error::Error::source`].
    pub fn source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Take the fallback origin from `config` instead of [`LIBRARY_NAME`].
    pub fn config(mut self, config: &ReportingConfig) -> Self {
        self.default_origin = config.origin().map(str::to_owned);
        self
    }

    /// Build, resolving the code through [`DefaultRegistry`].
    pub fn build(self) -> ReportingError {
        self.build_with(&DefaultRegistry)
    }

    /// Build, resolving the code through `registry`.
    pub fn build_with<R: ErrorRegistry + ?Sized>(self, registry: &R) -> ReportingError {
        let code = self.code.unwrap_or(ErrorCode::UNEXPECTED);
        let name = registry.name(code).into_owned();
        let description = registry.description(code).into_owned();
        let message = compose_message(code, &description, self.message.as_deref());
        let origin = self
            .origin
            .and_then(non_blank)
            .or(self.default_origin)
            .unwrap_or_else(|| LIBRARY_NAME.to_owned());

        let err = ReportingError {
            code,
            name,
            description,
            message,
            origin,
            status: self.status.filter(|s| *s != 0),
            reason: self.reason.and_then(non_blank),
            details: self.details.filter(|d| !is_empty_value(d)),
            sub_errors: self.sub_errors,
            request_trace: self.request_trace.and_then(non_blank),
            source: self.source,
        };
        tracing::debug!(
            code = err.code.value(),
            name = %err.name,
            origin = %err.origin,
            "reporting error constructed"
        );
        err
    }
}
