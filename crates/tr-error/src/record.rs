// SPDX-License-Identifier: MIT OR Apache-2.0
//! Structured form of a [`ReportingError`] for API responses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tr_codes::ErrorCode;

use crate::error::ReportingError;

/// Serialisable snapshot of a [`ReportingError`].
///
/// `origin`, `code`, `description` and `name` are always present. Every
/// other key is omitted, never `null`, when the error has no value for it.
/// The request trace and the underlying cause are not part of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ErrorRecord {
    /// Component that raised the error.
    pub origin: String,
    /// Numeric error code.
    pub code: ErrorCode,
    /// Registry description of `code`.
    pub description: String,
    /// Registry name of `code`.
    pub name: String,
    /// Composed message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Upstream transport status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Upstream status phrase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// Supplementary payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    /// Nested error records.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sub_errors: Vec<Value>,
}

impl From<&ReportingError> for ErrorRecord {
    fn from(err: &ReportingError) -> Self {
        Self {
            origin: err.origin.clone(),
            code: err.code,
            description: err.description.clone(),
            name: err.name.clone(),
            message: err.message.clone(),
            status: err.status,
            reason: err.reason.clone(),
            details: err.details.clone(),
            sub_errors: err.sub_errors.clone(),
        }
    }
}

impl From<ReportingError> for ErrorRecord {
    fn from(err: ReportingError) -> Self {
        Self {
            origin: err.origin,
            code: err.code,
            description: err.description,
            name: err.name,
            message: err.message,
            status: err.status,
            reason: err.reason,
            details: err.details,
            sub_errors: err.sub_errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(value: &Value) -> Vec<&str> {
        let mut keys: Vec<&str> = value
            .as_object()
            .expect("record serialises to an object")
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        keys
    }

    #[test]
    fn default_error_record() {
        let json = ReportingError::default().to_json();
        assert_eq!(
            json,
            json!({
                "origin": "tune-reporting",
                "code": 699,
                "description": "Unexpected error.",
                "name": "REP_ERR_UNEXPECTED",
                "message": "699: Unexpected error"
            })
        );
    }

    #[test]
    fn full_record_has_every_key() {
        let err = ReportingError::builder()
            .code(ErrorCode::REQUEST_HTTP)
            .message("upstream")
            .status(502)
            .reason("Bad Gateway")
            .details(json!({"attempt": 3}))
            .sub_error("timeout")
            .request_trace("curl https://example.com")
            .build();
        let json = err.to_json();
        assert_eq!(
            keys(&json),
            [
                "code",
                "description",
                "details",
                "message",
                "name",
                "origin",
                "reason",
                "status",
                "sub_errors"
            ]
        );
        assert_eq!(json["status"], json!(502));
        assert_eq!(json["sub_errors"], json!(["timeout"]));
    }

    #[test]
    fn record_description_keeps_trailing_period() {
        let record = ReportingError::new(ErrorCode::VALIDATION).to_record();
        assert_eq!(record.description, "Validation failed.");
        assert_eq!(record.message.as_deref(), Some("603: Validation failed"));
    }

    #[test]
    fn record_omits_message_when_composition_is_empty() {
        struct Silent;
        impl tr_codes::ErrorRegistry for Silent {
            fn name(&self, _: ErrorCode) -> std::borrow::Cow<'_, str> {
                "".into()
            }
            fn description(&self, _: ErrorCode) -> std::borrow::Cow<'_, str> {
                "".into()
            }
        }
        let err = ReportingError::builder().build_with(&Silent);
        assert_eq!(
            keys(&err.to_json()),
            ["code", "description", "name", "origin"]
        );
    }

    #[test]
    fn record_deserialises_without_optional_keys() {
        let record: ErrorRecord = serde_json::from_value(json!({
            "origin": "exports",
            "code": 611,
            "description": "Authentication failed.",
            "name": "REP_ERR_AUTH"
        }))
        .unwrap();
        assert_eq!(record.code, ErrorCode::AUTH);
        assert!(record.message.is_none());
        assert!(record.sub_errors.is_empty());
    }

    #[test]
    fn owned_and_borrowed_conversions_agree() {
        let err = ReportingError::with_message(ErrorCode::UPLOAD_DATA, "chunk 4");
        let borrowed = ErrorRecord::from(&err);
        let owned = ErrorRecord::from(err);
        assert_eq!(borrowed, owned);
    }

    #[test]
    fn schema_names_record_fields() {
        let schema = schemars::schema_for!(ErrorRecord);
        let json = serde_json::to_string(&schema).unwrap();
        for field in ["origin", "code", "description", "name", "sub_errors"] {
            assert!(json.contains(field), "schema missing {field}");
        }
    }
}
