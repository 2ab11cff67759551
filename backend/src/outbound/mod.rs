//! Outbound adapters implementing the record store port.
//!
//! - **persistence**: PostgreSQL stores using Diesel ORM
//! - **memory**: process-local store for tests and database-less runs
//!
//! Adapters translate between domain types and their storage representation
//! and contain no lifecycle rules.

pub mod memory;
pub mod persistence;
