//! Wide-column (Cassandra/CQL) backend adapter
//!
//! Opens one cluster session per operation and shuts it down at the end of
//! that operation. Statements are rendered by the CQL dialect with inlined,
//! type-quoted literals; column types come from a fresh
//! `system_schema.columns` lookup each call. Arbitrary filtered deletes are
//! not supported by the store, so delete first resolves the partition-key
//! values of the matching rows and then issues a keyed delete.

use scylla::frame::response::result::CqlValue;
use scylla::{Session, SessionBuilder};
use tracing::{debug, error, info};

use crate::backend::ResultSet;
use crate::config::WideColumnConfig;
use crate::error::{Result, StoreError};
use crate::request::Condition;
use crate::schema::{FieldDef, FieldType, TableSchema};
use crate::sql::{CqlDialect, QueryBuilder};

/// Cassandra adapter; holds connection parameters only, never a live session
pub struct WideColumnStore {
    config: WideColumnConfig,
}

impl WideColumnStore {
    pub fn new(config: WideColumnConfig) -> Self {
        Self { config }
    }

    fn builder(&self) -> QueryBuilder<'static> {
        QueryBuilder::new(&CqlDialect)
    }

    /// Open a session: connect with plain-text auth, probe liveness, and
    /// switch to the configured keyspace.
    async fn open(&self) -> Result<Session> {
        info!(node = %self.config.node, keyspace = %self.config.keyspace, "opening Cassandra session");

        let session = SessionBuilder::new()
            .known_node(&self.config.node)
            .user(&self.config.username, &self.config.password)
            .build()
            .await
            .map_err(|e| {
                error!(error = %e, "failed to connect to Cassandra");
                StoreError::connection(e.to_string())
            })?;

        // Liveness probe before any real work.
        session
            .query("SELECT release_version FROM system.local", ())
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        session
            .use_keyspace(&self.config.keyspace, true)
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        Ok(session)
    }

    async fn execute(session: &Session, cql: &str) -> Result<scylla::QueryResult> {
        debug!(cql, "executing statement");
        session
            .query(cql.to_string(), ())
            .await
            .map_err(|e| StoreError::backend(e.to_string()))
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Create a table if it does not already exist. Unlike the relational
    /// backend, an existing table is left untouched.
    pub async fn create_table(&self, table: &str, fields: &[(String, String)]) -> Result<()> {
        let session = self.open().await?;
        let stmt = self.builder().create_table(table, fields);
        let outcome = match stmt {
            Ok(stmt) => Self::execute(&session, &stmt.sql).await.map(|_| ()),
            Err(e) => Err(e),
        };
        drop(session);
        if outcome.is_ok() {
            info!(table, "table created");
        }
        outcome
    }

    /// Discover the table's column names, types, and partition key
    pub async fn describe(&self, table: &str) -> Result<TableSchema> {
        let session = self.open().await?;
        let outcome = self.describe_inner(&session, table).await;
        drop(session);
        outcome
    }

    async fn describe_inner(&self, session: &Session, table: &str) -> Result<TableSchema> {
        debug!(table, "introspecting schema");

        let result = session
            .query(
                "SELECT column_name, kind, type FROM system_schema.columns \
                 WHERE keyspace_name = ? AND table_name = ? ALLOW FILTERING",
                (self.config.keyspace.as_str(), table),
            )
            .await
            .map_err(|e| StoreError::backend(e.to_string()))?;

        let mut fields = Vec::new();
        let mut partition_key = None;

        for row in result
            .rows_typed::<(String, String, String)>()
            .map_err(|e| StoreError::backend(e.to_string()))?
        {
            let (name, kind, type_name) = row.map_err(|e| StoreError::backend(e.to_string()))?;
            if kind == "partition_key" {
                partition_key = Some(name.clone());
            }
            fields.push(FieldDef::new(name, FieldType::from_cql(&type_name)));
        }

        if fields.is_empty() {
            return Err(StoreError::not_found(format!(
                "table '{}' does not exist in keyspace '{}'",
                table, self.config.keyspace
            )));
        }

        let mut schema = TableSchema::new(fields);
        schema.partition_key = partition_key;
        Ok(schema)
    }

    /// Insert one record; values are quoted per the introspected column type
    pub async fn insert_single(&self, table: &str, fields: &[(String, String)]) -> Result<()> {
        let session = self.open().await?;
        let outcome = async {
            let schema = self.describe_inner(&session, table).await?;
            let stmt = self.builder().insert_single(table, fields, &schema)?;
            Self::execute(&session, &stmt.sql).await?;
            info!(table, "record inserted");
            Ok(())
        }
        .await;
        drop(session);
        outcome
    }

    /// Insert many records, one statement per row
    ///
    /// A failure mid-sequence leaves prior rows applied and aborts the
    /// remainder with [`StoreError::PartialBulk`].
    pub async fn insert_bulk(
        &self,
        table: &str,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> Result<usize> {
        let session = self.open().await?;
        let outcome = async {
            info!(table, rows = rows.len(), "inserting multiple records");
            let schema = self.describe_inner(&session, table).await?;

            for (idx, row) in rows.iter().enumerate() {
                let applied = async {
                    let stmt = self.builder().insert_row(table, headers, row, &schema)?;
                    Self::execute(&session, &stmt.sql).await?;
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
        .await;
        drop(session);
        outcome
    }

    /// Fetch headers and rows matching the conditions. Every select carries
    /// `ALLOW FILTERING`; row order is the backend's default.
    pub async fn select_records(
        &self,
        table: &str,
        conditions: &[Condition],
        row_limit: Option<u64>,
    ) -> Result<ResultSet> {
        let session = self.open().await?;
        let outcome = async {
            info!(table, "selecting records");
            let schema = self.describe_inner(&session, table).await?;
            let stmt = self.builder().select(table, conditions, &schema, row_limit)?;
            let result = Self::execute(&session, &stmt.sql).await?;

            let headers: Vec<String> = result
                .col_specs
                .iter()
                .map(|spec| spec.name.clone())
                .collect();

            let rows = result
                .rows
                .unwrap_or_default()
                .into_iter()
                .map(|row| row.columns.iter().map(cql_value_to_string).collect())
                .collect();

            Ok(ResultSet::new(headers, rows))
        }
        .await;
        drop(session);
        outcome
    }

    /// Delete matching records via the partition key
    ///
    /// The store disallows arbitrary filtered deletes, so this first selects
    /// the partition-key values of the matching rows, raises `NotFound` when
    /// none match, then issues `DELETE ... WHERE pk IN (...)`.
    pub async fn delete_records(&self, table: &str, conditions: &[Condition]) -> Result<u64> {
        let session = self.open().await?;
        let outcome = self.delete_records_inner(&session, table, conditions).await;
        drop(session);
        outcome
    }

    async fn delete_records_inner(
        &self,
        session: &Session,
        table: &str,
        conditions: &[Condition],
    ) -> Result<u64> {
        info!(table, "deleting records");

        let schema = self.describe_inner(session, table).await?;
        let partition_key = schema.partition_key.clone().ok_or_else(|| {
            StoreError::backend(format!("table '{table}' has no partition key column"))
        })?;

        let stmt = self
            .builder()
            .select_column(table, &partition_key, conditions, &schema)?;
        let result = Self::execute(session, &stmt.sql).await?;

        let keys: Vec<String> = result
            .rows
            .unwrap_or_default()
            .iter()
            .map(|row| row.columns.first().map(cql_value_to_string).unwrap_or_default())
            .collect();

        if keys.is_empty() {
            return Err(StoreError::not_found(
                "no records match the given filter conditions",
            ));
        }

        let key_type = schema.field_type(&partition_key);
        let delete_stmt =
            self.builder()
                .delete_by_key_list(table, &partition_key, &keys, key_type)?;
        Self::execute(session, &delete_stmt.sql).await?;

        info!(table, deleted = keys.len(), "records deleted");
        Ok(keys.len() as u64)
    }

    /// Update matching records; values equal to the "no change" sentinel are
    /// skipped
    pub async fn update_records(
        &self,
        table: &str,
        fields: &[(String, String)],
        conditions: &[Condition],
    ) -> Result<()> {
        let session = self.open().await?;
        let outcome = async {
            info!(table, "updating records");
            let schema = self.describe_inner(&session, table).await?;

            // A filtered update must match at least one row before mutating.
            if !conditions.is_empty() {
                let partition_key = schema.partition_key.clone().ok_or_else(|| {
                    StoreError::backend(format!("table '{table}' has no partition key column"))
                })?;
                let probe = self
                    .builder()
                    .select_column(table, &partition_key, conditions, &schema)?;
                let result = Self::execute(&session, &probe.sql).await?;
                if result.rows.unwrap_or_default().is_empty() {
                    return Err(StoreError::not_found(
                        "no records match the given filter conditions",
                    ));
                }
            }

            let stmt = self.builder().update(table, fields, conditions, &schema)?;
            Self::execute(&session, &stmt.sql).await?;
            Ok(())
        }
        .await;
        drop(session);
        outcome
    }
}

/// Render one CQL cell to its display string; NULL renders empty
fn cql_value_to_string(value: &Option<CqlValue>) -> String {
    match value {
        None => String::new(),
        Some(CqlValue::Text(s)) | Some(CqlValue::Ascii(s)) => s.clone(),
        Some(CqlValue::Int(v)) => v.to_string(),
        Some(CqlValue::BigInt(v)) => v.to_string(),
        Some(CqlValue::SmallInt(v)) => v.to_string(),
        Some(CqlValue::TinyInt(v)) => v.to_string(),
        Some(CqlValue::Boolean(v)) => v.to_string(),
        Some(CqlValue::Float(v)) => v.to_string(),
        Some(CqlValue::Double(v)) => v.to_string(),
        Some(CqlValue::Uuid(v)) => v.to_string(),
        Some(CqlValue::Timeuuid(v)) => v.to_string(),
        Some(other) => format!("{other:?}"),
    }
}
