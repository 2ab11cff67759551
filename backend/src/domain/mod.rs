//! Domain primitives and services.
//!
//! Purpose: hold the ledger record, the per-resource rules and the lifecycle
//! service, independent of HTTP and of any particular store.
//!
//! Public surface:
//! - Record / RecordPatch / RecordField: the shared entity and its attributes.
//! - Vertical, Income, Money: per-resource configuration.
//! - RecordService: create, replace, partial update, read, list, delete.
//! - Error / ErrorCode / InvalidStateReason: transport-agnostic failures.
//! - TraceId: per-request correlation identifier.

pub mod error;
pub mod ports;
mod record;
mod record_service;
pub mod trace_id;
mod vertical;

pub use self::error::{Error, ErrorCode, InvalidStateReason};
pub use self::record::{Record, RecordField, RecordPatch};
pub use self::record_service::RecordService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::vertical::{Income, Money, Vertical};
