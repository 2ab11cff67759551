//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Stores are thin translators between Diesel rows and [`Record`]; the
//! lifecycle rules live in the domain. Connections come from a `bb8` pool
//! through `diesel-async`, and every failure is mapped to
//! [`RecordStoreError`](crate::domain::ports::RecordStoreError).
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselIncomeStore, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/ledger")).await?;
//! let store = DieselIncomeStore::new(pool);
//! ```
//!
//! [`Record`]: crate::domain::Record

mod diesel_record_store;
mod error_mapping;
pub mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_record_store::{DieselIncomeStore, DieselMoneyStore};
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
