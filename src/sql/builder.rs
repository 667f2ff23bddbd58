//! Statement assembly for both text dialects
//!
//! One builder constructs every statement kind the console issues — CREATE
//! TABLE, single and bulk INSERT, SELECT, UPDATE, DELETE — from field maps,
//! condition lists, and a [`Dialect`]. Identifiers and type expressions are
//! validated before splicing; values become bind parameters on dialects that
//! support them and policy-quoted literals on dialects that do not.

use crate::error::{Result, StoreError};
use crate::request::Condition;
use crate::schema::{FieldType, TableSchema};
use crate::sql::condition::{build_where_clause, format_param, Param};
use crate::sql::dialect::Dialect;
use crate::sql::sanitize::{validate_identifier, validate_type_expr};

/// Update values equal to this sentinel leave the field out of the SET list
pub const NO_CHANGE_SENTINEL: &str = "no change";

/// One executable statement: text plus the parameters to bind (empty for
/// inline dialects)
#[derive(Debug, Clone)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Param>,
}

impl Statement {
    fn new(sql: String) -> Self {
        Self {
            sql,
            params: Vec::new(),
        }
    }

    fn with_params(sql: String, params: Vec<Param>) -> Self {
        Self { sql, params }
    }
}

/// Dialect-driven statement builder
pub struct QueryBuilder<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// `CREATE TABLE IF NOT EXISTS t (name type, ...)` preserving field order
    pub fn create_table(&self, table: &str, fields: &[(String, String)]) -> Result<Statement> {
        validate_identifier(table)?;
        if fields.is_empty() {
            return Err(StoreError::malformed(
                "create table requires at least one field",
            ));
        }

        let mut defs = Vec::with_capacity(fields.len());
        for (name, type_expr) in fields {
            validate_identifier(name)?;
            validate_type_expr(type_expr)?;
            defs.push(format!(
                "{} {}",
                self.dialect.quote_identifier(name),
                type_expr.trim()
            ));
        }

        Ok(Statement::new(format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.dialect.quote_identifier(table),
            defs.join(", ")
        )))
    }

    /// `DROP TABLE t`
    pub fn drop_table(&self, table: &str) -> Result<Statement> {
        validate_identifier(table)?;
        Ok(Statement::new(format!(
            "DROP TABLE {}",
            self.dialect.quote_identifier(table)
        )))
    }

    /// Single-record INSERT with a parenthesized column list and matching
    /// VALUES list in field-map order
    pub fn insert_single(
        &self,
        table: &str,
        fields: &[(String, String)],
        schema: &TableSchema,
    ) -> Result<Statement> {
        validate_identifier(table)?;
        if fields.is_empty() {
            return Err(StoreError::malformed("insert requires at least one field"));
        }

        let mut columns = Vec::with_capacity(fields.len());
        let mut values = Vec::with_capacity(fields.len());
        let mut params = Vec::new();

        for (name, value) in fields {
            validate_identifier(name)?;
            columns.push(self.dialect.quote_identifier(name));
            let field_type = schema.field_type(name);
            match self.dialect.placeholder() {
                Some(marker) => {
                    params.push(format_param(value, field_type));
                    values.push(marker.to_string());
                }
                None => values.push(self.dialect.quote_literal(value, field_type)),
            }
        }

        Ok(Statement::with_params(
            format!(
                "INSERT INTO {} ({}) VALUES ({})",
                self.dialect.quote_identifier(table),
                columns.join(","),
                values.join(",")
            ),
            params,
        ))
    }

    /// One row of a bulk INSERT
    ///
    /// An empty header list means a positional insert with no column list;
    /// value types then follow the schema's declared column order.
    pub fn insert_row(
        &self,
        table: &str,
        headers: &[String],
        row: &[String],
        schema: &TableSchema,
    ) -> Result<Statement> {
        validate_identifier(table)?;
        if row.is_empty() {
            return Err(StoreError::malformed("insert row has no values"));
        }

        let column_list = if headers.is_empty() {
            String::new()
        } else {
            let mut columns = Vec::with_capacity(headers.len());
            for header in headers {
                validate_identifier(header)?;
                columns.push(self.dialect.quote_identifier(header));
            }
            format!(" ({})", columns.join(","))
        };

        let mut values = Vec::with_capacity(row.len());
        let mut params = Vec::new();

        for (idx, value) in row.iter().enumerate() {
            let field_type = if headers.is_empty() {
                schema
                    .fields
                    .get(idx)
                    .map(|f| f.field_type)
                    .unwrap_or(FieldType::Text)
            } else {
                schema.field_type(&headers[idx])
            };

            match self.dialect.placeholder() {
                Some(marker) => {
                    params.push(format_param(value, field_type));
                    values.push(marker.to_string());
                }
                None => values.push(self.dialect.quote_literal(value, field_type)),
            }
        }

        Ok(Statement::with_params(
            format!(
                "INSERT INTO {}{} VALUES ({})",
                self.dialect.quote_identifier(table),
                column_list,
                values.join(",")
            ),
            params,
        ))
    }

    /// `SELECT * FROM t [WHERE ...] [LIMIT n]` plus the dialect suffix
    ///
    /// No ORDER BY is applied at this layer; row order is the backend's
    /// default.
    pub fn select(
        &self,
        table: &str,
        conditions: &[Condition],
        schema: &TableSchema,
        row_limit: Option<u64>,
    ) -> Result<Statement> {
        self.select_projection(table, "*", conditions, schema, row_limit)
    }

    /// SELECT of a single column, used by the keyed-delete pre-pass
    pub fn select_column(
        &self,
        table: &str,
        column: &str,
        conditions: &[Condition],
        schema: &TableSchema,
    ) -> Result<Statement> {
        validate_identifier(column)?;
        let projection = self.dialect.quote_identifier(column);
        self.select_projection(table, &projection, conditions, schema, None)
    }

    fn select_projection(
        &self,
        table: &str,
        projection: &str,
        conditions: &[Condition],
        schema: &TableSchema,
        row_limit: Option<u64>,
    ) -> Result<Statement> {
        validate_identifier(table)?;
        let (where_clause, params) = build_where_clause(conditions, schema, self.dialect)?;

        let mut sql = format!(
            "SELECT {projection} FROM {}{where_clause}",
            self.dialect.quote_identifier(table)
        );
        if let Some(limit) = row_limit {
            sql.push_str(&self.dialect.limit_clause(limit));
        }
        sql.push_str(self.dialect.select_suffix());

        Ok(Statement::with_params(sql, params))
    }

    /// `DELETE FROM t [WHERE ...]`
    pub fn delete(
        &self,
        table: &str,
        conditions: &[Condition],
        schema: &TableSchema,
    ) -> Result<Statement> {
        validate_identifier(table)?;
        let (where_clause, params) = build_where_clause(conditions, schema, self.dialect)?;

        Ok(Statement::with_params(
            format!(
                "DELETE FROM {}{where_clause}",
                self.dialect.quote_identifier(table)
            ),
            params,
        ))
    }

    /// `DELETE FROM t WHERE key IN (k1,k2,...)` for backends that can only
    /// delete by key
    pub fn delete_by_key_list(
        &self,
        table: &str,
        key_column: &str,
        keys: &[String],
        key_type: FieldType,
    ) -> Result<Statement> {
        validate_identifier(table)?;
        validate_identifier(key_column)?;
        if keys.is_empty() {
            return Err(StoreError::malformed("keyed delete requires at least one key"));
        }

        let mut params = Vec::new();
        let rendered: Vec<String> = match self.dialect.placeholder() {
            Some(marker) => keys
                .iter()
                .map(|key| {
                    params.push(format_param(key, key_type));
                    marker.to_string()
                })
                .collect(),
            None => keys
                .iter()
                .map(|key| self.dialect.quote_literal(key, key_type))
                .collect(),
        };

        Ok(Statement::with_params(
            format!(
                "DELETE FROM {} WHERE {} IN ({})",
                self.dialect.quote_identifier(table),
                self.dialect.quote_identifier(key_column),
                rendered.join(",")
            ),
            params,
        ))
    }

    /// `UPDATE t SET f1 = v1, ... [WHERE ...]`
    ///
    /// Fields whose new value equals the `"no change"` sentinel
    /// (case-insensitive) are left out of the SET list entirely. An update
    /// where every field is unchanged is malformed input.
    pub fn update(
        &self,
        table: &str,
        fields: &[(String, String)],
        conditions: &[Condition],
        schema: &TableSchema,
    ) -> Result<Statement> {
        validate_identifier(table)?;

        let mut assignments = Vec::new();
        let mut params = Vec::new();

        for (name, value) in fields {
            if value.trim().eq_ignore_ascii_case(NO_CHANGE_SENTINEL) {
                continue;
            }
            validate_identifier(name)?;

            let field = self.dialect.quote_identifier(name);
            let field_type = schema.field_type(name);
            match self.dialect.placeholder() {
                Some(marker) => {
                    params.push(format_param(value, field_type));
                    assignments.push(format!("{field} = {marker}"));
                }
                None => assignments.push(format!(
                    "{field} = {}",
                    self.dialect.quote_literal(value, field_type)
                )),
            }
        }

        if assignments.is_empty() {
            return Err(StoreError::malformed("update contains no changed fields"));
        }

        let (where_clause, where_params) = build_where_clause(conditions, schema, self.dialect)?;
        params.extend(where_params);

        Ok(Statement::with_params(
            format!(
                "UPDATE {} SET {}{where_clause}",
                self.dialect.quote_identifier(table),
                assignments.join(", ")
            ),
            params,
        ))
    }
}
