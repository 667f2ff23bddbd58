//! Backend-specific rendering rules
//!
//! Both text dialects share one condition translator and one query builder;
//! everything that legitimately differs between them — identifier quoting,
//! operator support, parameter binding, trailing clauses — lives behind the
//! [`Dialect`] trait.

use crate::error::{Result, StoreError};
use crate::request::ConditionOperator;
use crate::schema::FieldType;

/// Rendering capability implemented once per text dialect
pub trait Dialect: Send + Sync {
    fn name(&self) -> &'static str;

    /// Render an identifier for statement text. Identifiers are validated
    /// before reaching this point.
    fn quote_identifier(&self, identifier: &str) -> String;

    /// Bind marker for value slots, or `None` when the dialect inlines
    /// literals instead of binding parameters.
    fn placeholder(&self) -> Option<&'static str>;

    /// Native operator symbol for a condition operator. Dialects reject
    /// operators they do not support.
    fn render_operator(&self, operator: ConditionOperator) -> Result<&'static str>;

    /// Row-limit suffix
    fn limit_clause(&self, limit: u64) -> String {
        format!(" LIMIT {limit}")
    }

    /// Suffix appended to every SELECT statement
    fn select_suffix(&self) -> &'static str {
        ""
    }

    /// Type-aware literal formatting: integers are emitted bare, everything
    /// else is single-quoted with embedded quotes doubled.
    fn quote_literal(&self, value: &str, field_type: FieldType) -> String {
        if field_type.is_bare() {
            value.trim().to_string()
        } else {
            format!("'{}'", value.replace('\'', "''"))
        }
    }
}

fn comparison_symbol(operator: ConditionOperator) -> &'static str {
    match operator {
        ConditionOperator::Equals => "=",
        ConditionOperator::NotEquals => "<>",
        ConditionOperator::GreaterThan => ">",
        ConditionOperator::GreaterOrEqual => ">=",
        ConditionOperator::LessThan => "<",
        ConditionOperator::LessOrEqual => "<=",
        ConditionOperator::In => "IN",
        ConditionOperator::Like => "LIKE",
    }
}

/// MySQL rendering rules: backtick identifiers, `?` bind markers, LIKE
/// supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        format!("`{}`", identifier.replace('`', "``"))
    }

    fn placeholder(&self) -> Option<&'static str> {
        Some("?")
    }

    fn render_operator(&self, operator: ConditionOperator) -> Result<&'static str> {
        Ok(comparison_symbol(operator))
    }
}

/// CQL rendering rules: bare identifiers (validated, case-insensitive),
/// inlined type-quoted literals, `ALLOW FILTERING` on every select, no LIKE.
///
/// Literals are inlined rather than bound so that the Integer-bare /
/// other-quoted policy sidesteps CQL's stricter typed-literal requirements
/// for dynamically discovered columns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CqlDialect;

impl Dialect for CqlDialect {
    fn name(&self) -> &'static str {
        "cql"
    }

    fn quote_identifier(&self, identifier: &str) -> String {
        identifier.to_string()
    }

    fn placeholder(&self) -> Option<&'static str> {
        None
    }

    fn render_operator(&self, operator: ConditionOperator) -> Result<&'static str> {
        if operator == ConditionOperator::Like {
            return Err(StoreError::malformed(
                "operator 'like' is not supported by the CQL dialect",
            ));
        }
        Ok(comparison_symbol(operator))
    }

    fn select_suffix(&self) -> &'static str {
        " ALLOW FILTERING"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // Operator Rendering Tests
    // =========================================================================

    #[test]
    fn test_mysql_operators() {
        let d = MySqlDialect;
        assert_eq!(d.render_operator(ConditionOperator::Equals).unwrap(), "=");
        assert_eq!(
            d.render_operator(ConditionOperator::NotEquals).unwrap(),
            "<>"
        );
        assert_eq!(
            d.render_operator(ConditionOperator::GreaterThan).unwrap(),
            ">"
        );
        assert_eq!(
            d.render_operator(ConditionOperator::GreaterOrEqual)
                .unwrap(),
            ">="
        );
        assert_eq!(d.render_operator(ConditionOperator::LessThan).unwrap(), "<");
        assert_eq!(
            d.render_operator(ConditionOperator::LessOrEqual).unwrap(),
            "<="
        );
        assert_eq!(d.render_operator(ConditionOperator::Like).unwrap(), "LIKE");
        assert_eq!(d.render_operator(ConditionOperator::In).unwrap(), "IN");
    }

    #[test]
    fn test_cql_rejects_like() {
        let d = CqlDialect;
        let err = d.render_operator(ConditionOperator::Like).unwrap_err();
        assert!(matches!(err, StoreError::MalformedInput(_)));
    }

    #[test]
    fn test_cql_supports_comparisons() {
        let d = CqlDialect;
        assert_eq!(d.render_operator(ConditionOperator::Equals).unwrap(), "=");
        assert_eq!(d.render_operator(ConditionOperator::In).unwrap(), "IN");
    }

    // =========================================================================
    // Identifier Quoting Tests
    // =========================================================================

    #[test]
    fn test_mysql_identifier_quoting() {
        let d = MySqlDialect;
        assert_eq!(d.quote_identifier("users"), "`users`");
        assert_eq!(d.quote_identifier("or`der"), "`or``der`");
    }

    #[test]
    fn test_cql_identifier_is_bare() {
        let d = CqlDialect;
        assert_eq!(d.quote_identifier("users"), "users");
    }

    // =========================================================================
    // Literal Formatting Tests
    // =========================================================================

    #[test]
    fn test_integer_literal_is_bare() {
        let d = CqlDialect;
        assert_eq!(d.quote_literal("42", FieldType::Integer), "42");
        assert_eq!(d.quote_literal(" 42 ", FieldType::Integer), "42");
    }

    #[test]
    fn test_text_literal_is_quoted_once() {
        let d = CqlDialect;
        let quoted = d.quote_literal("Berlin", FieldType::Text);
        assert_eq!(quoted, "'Berlin'");
        assert_eq!(quoted.matches('\'').count(), 2);
    }

    #[test]
    fn test_opaque_literal_quotes_like_text() {
        let d = MySqlDialect;
        assert_eq!(d.quote_literal("2021-05-29", FieldType::Opaque), "'2021-05-29'");
    }

    #[test]
    fn test_embedded_quote_is_doubled() {
        let d = MySqlDialect;
        assert_eq!(d.quote_literal("O'Brien", FieldType::Text), "'O''Brien'");
    }

    // =========================================================================
    // Clause Tests
    // =========================================================================

    #[test]
    fn test_limit_clause() {
        assert_eq!(MySqlDialect.limit_clause(5), " LIMIT 5");
        assert_eq!(CqlDialect.limit_clause(1), " LIMIT 1");
    }

    #[test]
    fn test_select_suffix() {
        assert_eq!(MySqlDialect.select_suffix(), "");
        assert_eq!(CqlDialect.select_suffix(), " ALLOW FILTERING");
    }

    #[test]
    fn test_placeholders() {
        assert_eq!(MySqlDialect.placeholder(), Some("?"));
        assert_eq!(CqlDialect.placeholder(), None);
    }
}
