//! Identifier and type-expression validation
//!
//! Identifiers reaching the query builder come straight from web forms, so
//! everything that gets spliced into statement text as an identifier or a
//! column type must pass these checks first. Literal values never go through
//! here; they are bound as parameters or quoted by the dialect.

use crate::error::{Result, StoreError};
use regex::Regex;

/// Validate a table or column name
///
/// Must start with a letter and contain only letters, digits, and
/// underscores. Reserved words are acceptable because dialects quote
/// identifiers where their syntax requires it.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(StoreError::malformed("identifier cannot be empty"));
    }

    let re = Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap();
    if !re.is_match(name) {
        return Err(StoreError::malformed(format!(
            "identifier '{name}' is invalid: must start with a letter and contain only letters, digits, and underscores"
        )));
    }

    Ok(())
}

/// Validate a column type expression used in CREATE TABLE
///
/// Accepts bare type names (`INT`, `text`), multi-word types
/// (`DOUBLE PRECISION`), and parenthesized size arguments
/// (`VARCHAR(50)`, `DECIMAL(10,2)`).
pub fn validate_type_expr(type_expr: &str) -> Result<()> {
    let trimmed = type_expr.trim();
    if trimmed.is_empty() {
        return Err(StoreError::malformed("column type cannot be empty"));
    }

    let re = Regex::new(r"^[A-Za-z][A-Za-z0-9_ ]*(\([0-9]+(, ?[0-9]+)?\))?$").unwrap();
    if !re.is_match(trimmed) {
        return Err(StoreError::malformed(format!(
            "column type '{trimmed}' is not a recognized type expression"
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // validate_identifier Tests
    // =========================================================================

    #[test]
    fn test_validate_identifier_valid() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("Employee_Records").is_ok());
        assert!(validate_identifier("t1").is_ok());
        assert!(validate_identifier("a").is_ok());
    }

    #[test]
    fn test_validate_identifier_empty() {
        let err = validate_identifier("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_starts_with_digit() {
        assert!(validate_identifier("1users").is_err());
        assert!(validate_identifier("0").is_err());
    }

    #[test]
    fn test_validate_identifier_starts_with_underscore() {
        assert!(validate_identifier("_users").is_err());
    }

    #[test]
    fn test_validate_identifier_rejects_injection_attempts() {
        assert!(validate_identifier("users; DROP TABLE users").is_err());
        assert!(validate_identifier("users--").is_err());
        assert!(validate_identifier("users'").is_err());
        assert!(validate_identifier("us ers").is_err());
        assert!(validate_identifier("users)").is_err());
    }

    // =========================================================================
    // validate_type_expr Tests
    // =========================================================================

    #[test]
    fn test_validate_type_expr_bare() {
        assert!(validate_type_expr("INT").is_ok());
        assert!(validate_type_expr("text").is_ok());
        assert!(validate_type_expr("BIGINT").is_ok());
    }

    #[test]
    fn test_validate_type_expr_sized() {
        assert!(validate_type_expr("VARCHAR(50)").is_ok());
        assert!(validate_type_expr("DECIMAL(10,2)").is_ok());
        assert!(validate_type_expr("DECIMAL(10, 2)").is_ok());
    }

    #[test]
    fn test_validate_type_expr_multiword() {
        assert!(validate_type_expr("DOUBLE PRECISION").is_ok());
    }

    #[test]
    fn test_validate_type_expr_trims_whitespace() {
        assert!(validate_type_expr("  INT  ").is_ok());
    }

    #[test]
    fn test_validate_type_expr_invalid() {
        assert!(validate_type_expr("").is_err());
        assert!(validate_type_expr("INT); DROP TABLE x").is_err());
        assert!(validate_type_expr("VARCHAR('50')").is_err());
        assert!(validate_type_expr("(50)").is_err());
    }
}
