//! Condition translation for WHERE clauses
//!
//! Converts the ordered, flat condition list from the console form into a
//! dialect-native filter expression. Fragments are concatenated left-to-right
//! with each condition's joiner inserted between it and the next one; the
//! joiner stored on the final condition is never rendered. There is no
//! parenthesization: the form produces a single-level condition list and the
//! translator preserves exactly that shape.

use crate::error::{Result, StoreError};
use crate::request::{Condition, ConditionOperator};
use crate::schema::{FieldType, TableSchema};
use crate::sql::dialect::Dialect;
use crate::sql::sanitize::validate_identifier;

/// A value bound into a parameterized statement
///
/// Integer-typed fields bind as integers when the raw value parses; anything
/// else binds as text and the backend performs its own coercion, exactly as
/// it would for an inlined literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Int(i64),
    Text(String),
}

/// Format one raw value for binding, honoring the field's type
pub fn format_param(value: &str, field_type: FieldType) -> Param {
    if field_type.is_bare() {
        if let Ok(int_val) = value.trim().parse::<i64>() {
            return Param::Int(int_val);
        }
    }
    Param::Text(value.to_string())
}

/// Split the raw value of an `in` condition into its comparison targets
///
/// Elements are comma-separated; each is stripped of stray single quotes and
/// trimmed. Input order is preserved.
pub fn split_in_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|part| part.replace('\'', "").trim().to_string())
        .filter(|part| !part.is_empty())
        .collect()
}

/// Build the WHERE clause for a condition list
///
/// Returns the clause text (including the leading ` WHERE `, empty when the
/// list is empty) together with the parameters to bind. Inline dialects get
/// their literals embedded and return no parameters.
pub fn build_where_clause(
    conditions: &[Condition],
    schema: &TableSchema,
    dialect: &dyn Dialect,
) -> Result<(String, Vec<Param>)> {
    if conditions.is_empty() {
        return Ok((String::new(), Vec::new()));
    }

    let mut sql = String::from(" WHERE ");
    let mut params = Vec::new();

    for (idx, condition) in conditions.iter().enumerate() {
        validate_identifier(&condition.field)?;

        let field_type = schema.field_type(&condition.field);
        let operator = dialect.render_operator(condition.operator)?;
        let field = dialect.quote_identifier(&condition.field);

        match condition.operator {
            ConditionOperator::In => {
                let elements = split_in_list(&condition.value);
                if elements.is_empty() {
                    return Err(StoreError::malformed(format!(
                        "'in' condition on '{}' has no values",
                        condition.field
                    )));
                }

                let rendered: Vec<String> = match dialect.placeholder() {
                    Some(marker) => elements
                        .iter()
                        .map(|element| {
                            params.push(format_param(element, field_type));
                            marker.to_string()
                        })
                        .collect(),
                    None => elements
                        .iter()
                        .map(|element| dialect.quote_literal(element, field_type))
                        .collect(),
                };

                sql.push_str(&format!("{field} {operator} ({})", rendered.join(",")));
            }
            ConditionOperator::Like => {
                let pattern = format!("%{}%", condition.value);
                match dialect.placeholder() {
                    Some(marker) => {
                        params.push(Param::Text(pattern));
                        sql.push_str(&format!("{field} {operator} {marker}"));
                    }
                    None => {
                        sql.push_str(&format!(
                            "{field} {operator} {}",
                            dialect.quote_literal(&pattern, FieldType::Text)
                        ));
                    }
                }
            }
            _ => match dialect.placeholder() {
                Some(marker) => {
                    params.push(format_param(&condition.value, field_type));
                    sql.push_str(&format!("{field} {operator} {marker}"));
                }
                None => {
                    sql.push_str(&format!(
                        "{field} {operator} {}",
                        dialect.quote_literal(&condition.value, field_type)
                    ));
                }
            },
        }

        // The joiner on the final condition is parsed but never rendered.
        if idx + 1 < conditions.len() {
            sql.push_str(&format!(" {} ", condition.joiner.as_sql()));
        }
    }

    Ok((sql, params))
}
