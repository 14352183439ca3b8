use crate::database::connector;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{error, warn};

pub struct AnalyticsService;

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardMetrics {
    pub total_warehouses: i64,
    pub total_customers: i64,
    pub total_orders: i64,
    pub total_items: i64,
    pub new_orders: i64,
    pub low_stock_items: i64,
    pub orders_last_24h: i64,
    pub avg_order_value: f64,
}

impl AnalyticsService {
    /// Dashboard counters. Each metric degrades to zero on its own; a single
    /// failing query must not blank the whole dashboard.
    pub async fn dashboard_metrics() -> DashboardMetrics {
        let mut metrics = DashboardMetrics::default();

        metrics.total_warehouses =
            Self::count_or_zero("SELECT COUNT(*) AS count FROM warehouse").await;
        metrics.total_customers =
            Self::count_or_zero("SELECT COUNT(*) AS count FROM customer").await;
        metrics.total_orders =
            Self::count_or_zero("SELECT COUNT(*) AS count FROM order_table").await;
        metrics.total_items = Self::count_or_zero("SELECT COUNT(*) AS count FROM item").await;
        metrics.new_orders = Self::count_or_zero(
            "SELECT COUNT(*) AS count FROM order_table WHERE o_carrier_id IS NULL",
        )
        .await;
        metrics.low_stock_items =
            Self::count_or_zero("SELECT COUNT(*) AS count FROM stock WHERE s_quantity < 50").await;
        metrics.orders_last_24h = Self::count_or_zero(
            "SELECT COUNT(*) AS count FROM order_table \
             WHERE o_entry_d > CURRENT_TIMESTAMP - INTERVAL '24 hours'",
        )
        .await;
        metrics.avg_order_value = Self::avg_order_value().await;

        metrics
    }

    async fn count_or_zero(sql: &str) -> i64 {
        match connector::count(sql, vec![]).await {
            Ok(n) => n,
            Err(e) => {
                warn!("Dashboard metric query failed: {} ({})", e, sql);
                0
            }
        }
    }

    async fn avg_order_value() -> f64 {
        let sql = "SELECT AVG(total_amount) AS avg_amount FROM ( \
                       SELECT SUM(ol_amount) AS total_amount \
                       FROM order_line \
                       GROUP BY ol_w_id, ol_d_id, ol_o_id \
                   ) AS order_totals";
        match connector::execute_query(sql, vec![]).await {
            Ok(rows) => rows
                .first()
                .and_then(|row| super::field_f64(row, "avg_amount"))
                .unwrap_or(0.0),
            Err(e) => {
                warn!("Average order value query failed: {}", e);
                0.0
            }
        }
    }

    /// Warehouse rows for the filter dropdowns. Empty on failure, never an
    /// error, matching how the pages degrade.
    pub async fn warehouses() -> Vec<JsonValue> {
        match Self::try_warehouses().await {
            Ok(rows) => rows,
            Err(e) => {
                error!("Failed to get warehouses: {}", e);
                Vec::new()
            }
        }
    }

    async fn try_warehouses() -> Result<Vec<JsonValue>> {
        connector::execute_query(
            "SELECT w_id, w_name, w_city, w_state FROM warehouse ORDER BY w_id",
            vec![],
        )
        .await
    }
}
