//! Domain-level error types.
//!
//! These errors are transport agnostic. The HTTP adapter maps each
//! [`ErrorCode`] to a status code; the payload itself (code, message, trace id
//! and structured details) is what clients inspect programmatically.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use utoipa::ToSchema;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The payload fails a field-level constraint.
    ValidationFailed,
    /// An identity precondition does not hold; `details.errorKey` names it.
    InvalidState,
    /// The referenced record does not exist.
    NotFound,
    /// The verb is not accepted on the addressed path.
    MethodNotSupported,
    /// An unexpected failure inside the service or its store.
    InternalError,
}

/// Identity precondition violated by a create, replace or patch request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidStateReason {
    /// A new record arrived with an id already set.
    IdExists,
    /// An update arrived without an id in the body.
    IdNull,
    /// The body id differs from the path id.
    IdInvalid,
    /// No record exists for the id being replaced.
    IdNotFound,
}

impl InvalidStateReason {
    /// Reason code carried in `details.errorKey`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::IdExists => "idexists",
            Self::IdNull => "idnull",
            Self::IdInvalid => "idinvalid",
            Self::IdNotFound => "idnotfound",
        }
    }

    fn message(self, entity: &str) -> String {
        match self {
            Self::IdExists => format!("A new {entity} cannot already have an ID"),
            Self::IdNull => "Invalid id".to_owned(),
            Self::IdInvalid => "Invalid ID".to_owned(),
            Self::IdNotFound => "Entity not found".to_owned(),
        }
    }
}

impl std::fmt::Display for InvalidStateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Error payload shared by the domain and its adapters.
///
/// Constructors capture the trace identifier in scope so the payload is
/// correlated with request logs automatically.
///
/// # Examples
/// ```
/// use backend::domain::{Error, ErrorCode, InvalidStateReason};
///
/// let err = Error::invalid_state("money", InvalidStateReason::IdNull);
/// assert_eq!(err.code(), ErrorCode::InvalidState);
/// assert_eq!(err.error_key(), Some("idnull"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
pub struct Error {
    #[schema(example = "invalid_state")]
    code: ErrorCode,
    #[schema(example = "Invalid ID")]
    message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Structured context, e.g. `{ "entityName": "income", "errorKey": "idinvalid" }`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl Error {
    /// Create a new error stamped with the current trace identifier.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        }
    }

    /// Mandatory fields were missing for `entity`.
    pub fn validation_failed(entity: &str, fields: &[&str]) -> Self {
        Self::new(
            ErrorCode::ValidationFailed,
            format!("{entity} is missing required fields: {}", fields.join(", ")),
        )
        .with_details(json!({
            "entityName": entity,
            "errorKey": "validation",
            "fields": fields,
        }))
    }

    /// Request parameters or body could not be interpreted.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message)
    }

    /// A request parameter for `entity` was rejected; `key` names the reason
    /// (`badpage`, `badsort`).
    pub fn bad_parameter(entity: &str, key: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_details(json!({
            "entityName": entity,
            "errorKey": key,
        }))
    }

    /// An identity precondition failed for `entity`.
    pub fn invalid_state(entity: &str, reason: InvalidStateReason) -> Self {
        Self::new(ErrorCode::InvalidState, reason.message(entity)).with_details(json!({
            "entityName": entity,
            "errorKey": reason.key(),
        }))
    }

    /// No `entity` exists for the requested id.
    pub fn not_found(entity: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{entity} not found")).with_details(json!({
            "entityName": entity,
            "errorKey": "notfound",
        }))
    }

    /// The verb is not accepted on the addressed `entity` path.
    pub fn method_not_supported(entity: &str, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::MethodNotSupported, message).with_details(json!({
            "entityName": entity,
            "errorKey": "methodnotsupported",
        }))
    }

    /// Unexpected failure; adapters redact the message before responding.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Replace the trace identifier.
    #[must_use]
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Correlation identifier, when one was in scope.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Structured details.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Reason code from `details.errorKey`, if present.
    pub fn error_key(&self) -> Option<&str> {
        self.details
            .as_ref()
            .and_then(|details| details.get("errorKey"))
            .and_then(Value::as_str)
    }

    /// Copy with the message and details replaced by a generic text.
    ///
    /// Internal errors pass through this before leaving the process.
    #[must_use]
    pub fn redacted(&self) -> Self {
        Self {
            code: self.code,
            message: "Internal server error".to_owned(),
            trace_id: self.trace_id.clone(),
            details: None,
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message.as_str())
    }
}

impl std::error::Error for Error {}
