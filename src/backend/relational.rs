//! Relational (MySQL) backend adapter
//!
//! Opens one plain connection per operation — no pool — creates the target
//! database if absent, runs the operation's statements with bind parameters,
//! and closes the connection on every exit path. Schema introspection reads
//! `information_schema.columns` fresh on each call.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlRow};
use sqlx::{ConnectOptions, Connection, Row};
use tracing::{debug, error, info};

use crate::backend::ResultSet;
use crate::config::RelationalConfig;
use crate::error::{Result, StoreError};
use crate::request::Condition;
use crate::schema::{FieldDef, FieldType, TableSchema};
use crate::sql::{MySqlDialect, Param, QueryBuilder, Statement};

/// MySQL adapter; holds connection parameters only, never a live connection
pub struct RelationalStore {
    config: RelationalConfig,
}

impl RelationalStore {
    pub fn new(config: RelationalConfig) -> Self {
        Self { config }
    }

    fn builder(&self) -> QueryBuilder<'static> {
        QueryBuilder::new(&MySqlDialect)
    }

    /// Open a session: connect, create the database if absent, switch to it.
    async fn open(&self) -> Result<MySqlConnection> {
        info!(host = %self.config.host, database = %self.config.database, "opening MySQL session");

        let options = MySqlConnectOptions::new()
            .host(&self.config.host)
            .port(self.config.port)
            .username(&self.config.username)
            .password(&self.config.password);

        let mut conn = options.connect().await.map_err(|e| {
            error!(error = %e, "failed to connect to MySQL");
            StoreError::connection(e.to_string())
        })?;

        crate::sql::validate_identifier(&self.config.database)?;
        sqlx::query(&format!(
            "CREATE DATABASE IF NOT EXISTS `{}`",
            self.config.database
        ))
        .execute(&mut conn)
        .await?;
        sqlx::query(&format!("USE `{}`", self.config.database))
            .execute(&mut conn)
            .await?;

        Ok(conn)
    }

    /// Close the session and resolve the operation outcome. The connection
    /// is closed on every path; an operation error takes precedence over a
    /// close error.
    async fn finish<T>(conn: MySqlConnection, outcome: Result<T>) -> Result<T> {
        debug!("closing MySQL session");
        let closed = conn.close().await;
        let value = outcome?;
        closed?;
        Ok(value)
    }

    fn bind_statement(stmt: &Statement) -> sqlx::query::Query<'_, sqlx::MySql, sqlx::mysql::MySqlArguments> {
        let mut query = sqlx::query(&stmt.sql);
        for param in &stmt.params {
            query = match param {
                Param::Int(v) => query.bind(*v),
                Param::Text(v) => query.bind(v.clone()),
            };
        }
        query
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create a table, dropping any existing table of the same name first.
    /// Destructive overwrite is intentional: creating twice with the same
    /// field map yields a structurally identical empty table both times.
    pub async fn create_table(&self, table: &str, fields: &[(String, String)]) -> Result<()> {
        let mut conn = self.open().await?;
        let outcome = self.create_table_inner(&mut conn, table, fields).await;
        Self::finish(conn, outcome).await
    }

    async fn create_table_inner(
        &self,
        conn: &mut MySqlConnection,
        table: &str,
        fields: &[(String, String)],
    ) -> Result<()> {
        info!(table, "creating table");

        let existing = sqlx::query(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = DATABASE() AND table_name = ?",
        )
        .bind(table)
        .fetch_optional(&mut *conn)
        .await?;

        if existing.is_some() {
            let drop_stmt = self.builder().drop_table(table)?;
            debug!(sql = %drop_stmt.sql, "dropping existing table");
            sqlx::query(&drop_stmt.sql).execute(&mut *conn).await?;
        }

        let stmt = self.builder().create_table(table, fields)?;
        debug!(sql = %stmt.sql, "executing statement");
        sqlx::query(&stmt.sql).execute(&mut *conn).await?;

        info!(table, "table created");
        Ok(())
    }

    /// Discover the table's ordered column names and types
    pub async fn describe(&self, table: &str) -> Result<TableSchema> {
        let mut conn = self.open().await?;
        let outcome = Self::describe_inner(&mut conn, table).await;
        Self::finish(conn, outcome).await
    }

    async fn describe_inner(conn: &mut MySqlConnection, table: &str) -> Result<TableSchema> {
        debug!(table, "introspecting schema");

        let rows = sqlx::query(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_schema = DATABASE() AND table_name = ? \
             ORDER BY ordinal_position",
        )
        .bind(table)
        .fetch_all(&mut *conn)
        .await?;

        if rows.is_empty() {
            return Err(StoreError::not_found(format!("table '{table}' does not exist")));
        }

        let fields = rows
            .iter()
            .map(|row| {
                let name: String = row.try_get(0)?;
                let type_name: String = row.try_get(1)?;
                Ok(FieldDef::new(name, FieldType::from_mysql(&type_name)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(TableSchema::new(fields))
    }

    /// Insert one record from a field→value map
    pub async fn insert_single(&self, table: &str, fields: &[(String, String)]) -> Result<()> {
        let mut conn = self.open().await?;
        let outcome = self.insert_single_inner(&mut conn, table, fields).await;
        Self::finish(conn, outcome).await
    }

    async fn insert_single_inner(
        &self,
        conn: &mut MySqlConnection,
        table: &str,
        fields: &[(String, String)],
    ) -> Result<()> {
        info!(table, "inserting single record");

        let schema = Self::describe_inner(conn, table).await?;
        let stmt = self.builder().insert_single(table, fields, &schema)?;
        debug!(sql = %stmt.sql, "executing statement");
        Self::bind_statement(&stmt).execute(&mut *conn).await?;

        info!(table, "record inserted");
        Ok(())
    }

    /// Insert many records, one statement per row, autocommitted row-at-a-time
    ///
    /// A failure mid-sequence leaves prior rows applied and aborts the
    /// remainder with [`StoreError::PartialBulk`]. Returns the number of rows
    /// inserted.
    pub async fn insert_bulk(
        &self,
        table: &str,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> Result<usize> {
        let mut conn = self.open().await?;
        let outcome = self.insert_bulk_inner(&mut conn, table, headers, rows).await;
        Self::finish(conn, outcome).await
    }

    async fn insert_bulk_inner(
        &self,
        conn: &mut MySqlConnection,
        table: &str,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> Result<usize> {
        info!(table, rows = rows.len(), "inserting multiple records");

        let schema = Self::describe_inner(conn, table).await?;

        for (idx, row) in rows.iter().enumerate() {
            let applied = async {
                let stmt = self.builder().insert_row(table, headers, row, &schema)?;
                debug!(sql = %stmt.sql, row = idx, "executing statement");
                Self::bind_statement(&stmt).execute(&mut *conn).await?;
                Ok(())
            }
            .await;

            if let Err(e) = applied {
                return Err(StoreError::partial_bulk(idx, e));
            }
        }

        info!(table, rows = rows.len(), "all records inserted");
        Ok(rows.len())
    }

    /// Fetch headers and rows matching the conditions, bounded by the row
    /// limit. Row order is the backend's default; no ORDER BY is applied.
    pub async fn select_records(
        &self,
        table: &str,
        conditions: &[Condition],
        row_limit: Option<u64>,
    ) -> Result<ResultSet> {
        let mut conn = self.open().await?;
        let outcome = self
            .select_records_inner(&mut conn, table, conditions, row_limit)
            .await;
        Self::finish(conn, outcome).await
    }

    async fn select_records_inner(
        &self,
        conn: &mut MySqlConnection,
        table: &str,
        conditions: &[Condition],
        row_limit: Option<u64>,
    ) -> Result<ResultSet> {
        info!(table, "selecting records");

        let schema = Self::describe_inner(conn, table).await?;
        let stmt = self.builder().select(table, conditions, &schema, row_limit)?;
        debug!(sql = %stmt.sql, "executing statement");

        let db_rows = Self::bind_statement(&stmt).fetch_all(&mut *conn).await?;

        let rows = db_rows
            .iter()
            .map(|row| {
                schema
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(idx, field)| decode_cell(row, idx, field.field_type))
                    .collect()
            })
            .collect();

        Ok(ResultSet::new(schema.headers(), rows))
    }

    /// Delete matching records. A filter matching zero rows executes without
    /// error here; only the wide-column and document backends pre-check.
    pub async fn delete_records(&self, table: &str, conditions: &[Condition]) -> Result<u64> {
        let mut conn = self.open().await?;
        let outcome = self.delete_records_inner(&mut conn, table, conditions).await;
        Self::finish(conn, outcome).await
    }

    async fn delete_records_inner(
        &self,
        conn: &mut MySqlConnection,
        table: &str,
        conditions: &[Condition],
    ) -> Result<u64> {
        info!(table, "deleting records");

        let schema = Self::describe_inner(conn, table).await?;
        let stmt = self.builder().delete(table, conditions, &schema)?;
        debug!(sql = %stmt.sql, "executing statement");

        let result = Self::bind_statement(&stmt).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }

    /// Update matching records from a field→new-value map; values equal to
    /// the "no change" sentinel are skipped
    pub async fn update_records(
        &self,
        table: &str,
        fields: &[(String, String)],
        conditions: &[Condition],
    ) -> Result<u64> {
        let mut conn = self.open().await?;
        let outcome = self
            .update_records_inner(&mut conn, table, fields, conditions)
            .await;
        Self::finish(conn, outcome).await
    }

    async fn update_records_inner(
        &self,
        conn: &mut MySqlConnection,
        table: &str,
        fields: &[(String, String)],
        conditions: &[Condition],
    ) -> Result<u64> {
        info!(table, "updating records");

        let schema = Self::describe_inner(conn, table).await?;
        let stmt = self.builder().update(table, fields, conditions, &schema)?;
        debug!(sql = %stmt.sql, "executing statement");

        let result = Self::bind_statement(&stmt).execute(&mut *conn).await?;
        Ok(result.rows_affected())
    }
}

/// Render one cell to its display string using the introspected type, with
/// decode fallbacks for types the coarse classification does not cover
fn decode_cell(row: &MySqlRow, idx: usize, field_type: FieldType) -> String {
    if field_type == FieldType::Integer {
        if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
            return v.to_string();
        }
    }
    if let Ok(Some(v)) = row.try_get::<Option<String>, _>(idx) {
        return v;
    }
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        return v.to_string();
    }
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return v.to_string();
    }
    String::new()
}
