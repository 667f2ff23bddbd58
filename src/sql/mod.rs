//! Statement construction for the text dialects
//!
//! Provides the dialect abstraction, condition translation, statement
//! building, and identifier sanitization shared by the relational and
//! wide-column backends.

pub mod builder;
pub mod condition;
pub mod dialect;
pub mod sanitize;

pub use builder::{QueryBuilder, Statement, NO_CHANGE_SENTINEL};
pub use condition::{build_where_clause, format_param, split_in_list, Param};
pub use dialect::{CqlDialect, Dialect, MySqlDialect};
pub use sanitize::{validate_identifier, validate_type_expr};
