use crate::database::client::get_db;
use crate::database::rows::rows_to_objects;
use crate::util::env_config::ENV_CONFIG;
use anyhow::Result;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement, Value};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use tracing::{error, warn};

/// Tables probed by `table_counts` and the ACID harness.
pub const TPCC_TABLES: [&str; 7] = [
    "warehouse",
    "district",
    "customer",
    "order_table",
    "order_line",
    "item",
    "stock",
];

pub fn provider_name() -> String {
    ENV_CONFIG.provider_label.clone()
}

/// Binds positional `$1…$n` values and returns rows as JSON objects.
pub async fn execute_query(sql: &str, values: Vec<Value>) -> Result<Vec<JsonValue>> {
    let stmt = Statement::from_sql_and_values(DatabaseBackend::Postgres, sql, values);
    execute(stmt).await
}

pub async fn execute(stmt: Statement) -> Result<Vec<JsonValue>> {
    let db = get_db().await?;
    let sql = stmt.sql.clone();
    let rows = db.query_all(stmt).await.map_err(|e| {
        error!("Query execution failed: {} (query: {})", e, sql);
        e
    })?;
    Ok(rows_to_objects(&rows, &sql))
}

/// Runs a statement expected to yield a single-row, single-column count.
pub async fn fetch_count(stmt: Statement) -> Result<i64> {
    let db = get_db().await?;
    let row = db.query_one(stmt).await?;
    match row {
        Some(row) => Ok(row.try_get_by::<Option<i64>, _>(0)?.unwrap_or(0)),
        None => Ok(0),
    }
}

pub async fn count(sql: &str, values: Vec<Value>) -> Result<i64> {
    fetch_count(Statement::from_sql_and_values(
        DatabaseBackend::Postgres,
        sql,
        values,
    ))
    .await
}

/// `SELECT 1` probe; reports a boolean, never an error.
pub async fn test_connection() -> bool {
    match count("SELECT 1", vec![]).await {
        Ok(_) => true,
        Err(e) => {
            error!("Connection test failed: {}", e);
            false
        }
    }
}

/// Record counts for the major TPC-C tables. Tables that cannot be counted
/// are left out of the map, so presence doubles as an accessibility signal.
pub async fn table_counts() -> BTreeMap<&'static str, i64> {
    let mut counts = BTreeMap::new();
    for table in TPCC_TABLES {
        match count(&format!("SELECT COUNT(*) AS count FROM {table}"), vec![]).await {
            Ok(n) => {
                counts.insert(table, n);
            }
            Err(e) => warn!("Failed to count {}: {}", table, e),
        }
    }
    counts
}
