//! Operation request types and form normalization
//!
//! The web console submits flat form maps. Data fields arrive under keys
//! ending in `_field`; ordered condition lists arrive as numbered
//! `fieldName<N>` / `fieldOperator<N>` / `fieldValue<N>` / `recordOperator<N>`
//! groups. This module parses those conventions into the generic request
//! shape the query layer consumes.

use crate::error::{Result, StoreError};

/// Comparison operator of a single condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    GreaterThan,
    GreaterOrEqual,
    LessThan,
    LessOrEqual,
    /// Substring match, relational dialect only
    Like,
    /// Membership in a comma-separated value list
    In,
}

impl ConditionOperator {
    /// Parse the operator tag submitted by the console form.
    /// Unrecognized tags are rejected before any backend call.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "equals" => Ok(Self::Equals),
            "not equals" => Ok(Self::NotEquals),
            "greater than" => Ok(Self::GreaterThan),
            "greater than equals" => Ok(Self::GreaterOrEqual),
            "less than" => Ok(Self::LessThan),
            "less than equals" => Ok(Self::LessOrEqual),
            "like" => Ok(Self::Like),
            "in" => Ok(Self::In),
            other => Err(StoreError::malformed(format!(
                "unknown condition operator '{other}'"
            ))),
        }
    }
}

/// Boolean joiner applied between a condition and the next one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Joiner {
    #[default]
    And,
    Or,
}

impl Joiner {
    pub fn from_tag(tag: &str) -> Self {
        if tag.trim().eq_ignore_ascii_case("or") {
            Joiner::Or
        } else {
            Joiner::And
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Joiner::And => "AND",
            Joiner::Or => "OR",
        }
    }
}

/// One (field, operator, value, joiner) filter tuple
///
/// Conditions form an ordered, flat list; fragments are concatenated
/// left-to-right with the joiner stored on the preceding condition. The
/// joiner on the final condition is parsed but never rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Condition {
    pub field: String,
    pub operator: ConditionOperator,
    /// Raw value string; comma-separated for [`ConditionOperator::In`]
    pub value: String,
    pub joiner: Joiner,
}

impl Condition {
    pub fn new(
        field: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<String>,
        joiner: Joiner,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
            joiner,
        }
    }
}

/// Look up a form value by exact key
fn form_value<'a>(form: &'a [(String, String)], key: &str) -> Option<&'a str> {
    form.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Assemble the ordered condition list from numbered form keys
///
/// Scans the form in submission order for `fieldName<N>` keys and pulls the
/// matching `fieldOperator<N>` / `fieldValue<N>` / `recordOperator<N>`
/// companions. A `fieldName<N>` without its companions is malformed input.
pub fn conditions_from_form(form: &[(String, String)]) -> Result<Vec<Condition>> {
    let mut conditions = Vec::new();

    for (key, field) in form {
        let Some(suffix) = key.strip_prefix("fieldName") else {
            continue;
        };

        let operator_tag = form_value(form, &format!("fieldOperator{suffix}")).ok_or_else(|| {
            StoreError::malformed(format!("condition {suffix} is missing its operator"))
        })?;
        let value = form_value(form, &format!("fieldValue{suffix}")).ok_or_else(|| {
            StoreError::malformed(format!("condition {suffix} is missing its value"))
        })?;
        let joiner = form_value(form, &format!("recordOperator{suffix}")).unwrap_or("and");

        conditions.push(Condition::new(
            field.trim(),
            ConditionOperator::from_tag(operator_tag)?,
            value,
            Joiner::from_tag(joiner),
        ));
    }

    Ok(conditions)
}

/// Collect data fields from `<name>_field` keys, preserving submission order
pub fn fields_from_form(form: &[(String, String)]) -> Vec<(String, String)> {
    form.iter()
        .filter_map(|(key, value)| {
            key.strip_suffix("_field")
                .map(|name| (name.to_string(), value.clone()))
        })
        .collect()
}

/// Parse the row-limit form parameter. Empty string means no limit.
pub fn parse_row_limit(raw: &str) -> Result<Option<u64>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u64>()
        .map(Some)
        .map_err(|_| StoreError::malformed(format!("invalid row limit '{trimmed}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // =========================================================================
    // Operator Tag Tests
    // =========================================================================

    #[test]
    fn test_operator_tags() {
        assert_eq!(
            ConditionOperator::from_tag("equals").unwrap(),
            ConditionOperator::Equals
        );
        assert_eq!(
            ConditionOperator::from_tag("Not Equals").unwrap(),
            ConditionOperator::NotEquals
        );
        assert_eq!(
            ConditionOperator::from_tag("GREATER THAN EQUALS").unwrap(),
            ConditionOperator::GreaterOrEqual
        );
        assert_eq!(
            ConditionOperator::from_tag("in").unwrap(),
            ConditionOperator::In
        );
    }

    #[test]
    fn test_unknown_operator_is_malformed() {
        let err = ConditionOperator::from_tag("approximately").unwrap_err();
        assert!(matches!(err, StoreError::MalformedInput(_)));
    }

    #[test]
    fn test_joiner_parsing_defaults_to_and() {
        assert_eq!(Joiner::from_tag("or"), Joiner::Or);
        assert_eq!(Joiner::from_tag("OR"), Joiner::Or);
        assert_eq!(Joiner::from_tag("and"), Joiner::And);
        assert_eq!(Joiner::from_tag(""), Joiner::And);
    }

    // =========================================================================
    // Form Parsing Tests
    // =========================================================================

    #[test]
    fn test_conditions_from_form_ordered() {
        let form = form(&[
            ("tableName", "users"),
            ("fieldName1", "age"),
            ("fieldOperator1", "greater than"),
            ("fieldValue1", "30"),
            ("recordOperator1", "and"),
            ("fieldName2", "city"),
            ("fieldOperator2", "equals"),
            ("fieldValue2", "Berlin"),
            ("recordOperator2", "or"),
        ]);

        let conditions = conditions_from_form(&form).unwrap();
        assert_eq!(conditions.len(), 2);
        assert_eq!(conditions[0].field, "age");
        assert_eq!(conditions[0].operator, ConditionOperator::GreaterThan);
        assert_eq!(conditions[0].joiner, Joiner::And);
        assert_eq!(conditions[1].field, "city");
        assert_eq!(conditions[1].value, "Berlin");
        assert_eq!(conditions[1].joiner, Joiner::Or);
    }

    #[test]
    fn test_conditions_from_form_missing_companion() {
        let form = form(&[("fieldName1", "age"), ("fieldValue1", "30")]);
        let err = conditions_from_form(&form).unwrap_err();
        assert!(matches!(err, StoreError::MalformedInput(_)));
    }

    #[test]
    fn test_conditions_from_form_trims_field_name() {
        let form = form(&[
            ("fieldName1", "  age "),
            ("fieldOperator1", "equals"),
            ("fieldValue1", "30"),
            ("recordOperator1", "and"),
        ]);
        let conditions = conditions_from_form(&form).unwrap();
        assert_eq!(conditions[0].field, "age");
    }

    #[test]
    fn test_no_conditions_is_empty_list() {
        let form = form(&[("tableName", "users"), ("rowLimit", "10")]);
        assert!(conditions_from_form(&form).unwrap().is_empty());
    }

    #[test]
    fn test_fields_from_form() {
        let form = form(&[
            ("tableName", "users"),
            ("name_field", "Alice"),
            ("age_field", "30"),
            ("submit", "Insert"),
        ]);

        let fields = fields_from_form(&form);
        assert_eq!(
            fields,
            vec![
                ("name".to_string(), "Alice".to_string()),
                ("age".to_string(), "30".to_string()),
            ]
        );
    }

    // =========================================================================
    // Row Limit Tests
    // =========================================================================

    #[test]
    fn test_row_limit_empty_means_unlimited() {
        assert_eq!(parse_row_limit("").unwrap(), None);
        assert_eq!(parse_row_limit("   ").unwrap(), None);
    }

    #[test]
    fn test_row_limit_numeric() {
        assert_eq!(parse_row_limit("25").unwrap(), Some(25));
        assert_eq!(parse_row_limit(" 1 ").unwrap(), Some(1));
    }

    #[test]
    fn test_row_limit_invalid() {
        assert!(matches!(
            parse_row_limit("ten").unwrap_err(),
            StoreError::MalformedInput(_)
        ));
        assert!(matches!(
            parse_row_limit("-5").unwrap_err(),
            StoreError::MalformedInput(_)
        ));
    }
}
