//! # polystore
//!
//! A store-agnostic CRUD query layer for administrative consoles.
//!
//! This crate turns a generic, store-agnostic description of an operation —
//! a target table or collection, a field map, an ordered list of filter
//! conditions, an optional row limit — into store-native statements for
//! three heterogeneous backends, executes them, and returns normalized
//! results:
//!
//! - **Relational** (MySQL via `sqlx`): parameterized SQL statements
//! - **Wide-column** (Cassandra via `scylla`): CQL with type-quoted literals
//! - **Document** (MongoDB): native filter/projection documents, untranslated
//!
//! ## Design
//!
//! - **One dialect abstraction** ([`sql::Dialect`]) carries every legitimate
//!   difference between the text dialects — identifier quoting, operator
//!   support, parameter binding, trailing clauses — so condition translation
//!   and statement building are written once.
//! - **Schema introspection per operation**: relational and wide-column
//!   operations discover column names and types fresh on every call; the
//!   Integer/other distinction decides whether literals are emitted bare or
//!   quoted.
//! - **One session per operation**: every public operation opens its own
//!   connection and tears it down on every exit path. Nothing is pooled or
//!   cached between operations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use polystore::{
//!     conditions_from_form, parse_row_limit, RelationalConfig, RelationalStore,
//! };
//!
//! # async fn run(form: Vec<(String, String)>) -> Result<(), Box<dyn std::error::Error>> {
//! let store = RelationalStore::new(RelationalConfig::new(
//!     "localhost", "root", "secret", "inventory",
//! ));
//!
//! let conditions = conditions_from_form(&form)?;
//! let limit = parse_row_limit("10")?;
//!
//! let result = store.select_records("products", &conditions, limit).await?;
//! println!("{} rows", result.rows.len());
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod logging;
pub mod request;
pub mod schema;
pub mod sql;
pub mod transfer;

// Re-export main types for convenience
pub use backend::{DocumentStore, RelationalStore, ResultSet, WideColumnStore};
pub use config::{DocumentConfig, RelationalConfig, WideColumnConfig};
pub use error::{Result, StoreError};
pub use logging::init_logging;
pub use request::{
    conditions_from_form, fields_from_form, parse_row_limit, Condition, ConditionOperator, Joiner,
};
pub use schema::{FieldDef, FieldType, TableSchema};

// Re-export SQL utilities for advanced users
pub use sql::{CqlDialect, Dialect, MySqlDialect, QueryBuilder, Statement};

// Document-store helpers
pub use backend::document::{json_records_to_documents, parse_document, render_connection_uri};
