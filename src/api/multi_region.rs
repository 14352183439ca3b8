use crate::api::envelope::{parse_body, require_fields, ApiResult};
use crate::database::connector;
use crate::service::customer_name;
use crate::service::order::{NewOrderRequest, OrderService};
use crate::util::env_config::ENV_CONFIG;
use axum::extract::Query;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::time::Instant;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct RecentOrdersQuery {
    #[serde(default = "default_recent_limit")]
    pub limit: u64,
}

fn default_recent_limit() -> u64 {
    20
}

/// `POST /api/test/multi-region/create-order` — New Order with execution
/// time and region metadata for latency comparison across regions.
pub async fn create_order(Json(body): Json<JsonValue>) -> ApiResult {
    let started = Instant::now();
    info!("Multi-region Create Order API called");

    require_fields(&body, &["warehouse_id", "district_id", "customer_id", "items"])?;
    let request: NewOrderRequest = parse_body(body)?;

    let mut result = OrderService::execute_new_order(&request).await?;
    let execution_time_ms =
        (started.elapsed().as_secs_f64() * 1000.0 * 100.0).round() / 100.0;
    info!(
        "Multi-Region New Order Transaction completed in {:.2}ms",
        execution_time_ms
    );

    if result["success"] == json!(true) {
        if let Some(object) = result.as_object_mut() {
            object.insert("execution_time_ms".to_string(), json!(execution_time_ms));
            object.insert(
                "executed_in_region".to_string(),
                json!(ENV_CONFIG.region_name),
            );
            object.insert("provider".to_string(), json!(connector::provider_name()));
        }
    }

    Ok(Json(result))
}

/// `GET /api/test/multi-region/orders-by-region` — order counts grouped by
/// warehouse.
pub async fn orders_by_region() -> ApiResult {
    info!("Multi-region Orders by Region API called");
    let warehouse_stats = OrderService::orders_by_warehouse().await?;
    info!(
        "Retrieved region statistics for {} warehouses",
        warehouse_stats.len()
    );

    Ok(Json(json!({
        "success": true,
        "warehouse_stats": warehouse_stats,
        "current_region": ENV_CONFIG.region_name,
        "provider": connector::provider_name(),
    })))
}

/// `GET /api/test/multi-region/recent-orders` — recent orders annotated
/// with the serving region.
pub async fn recent_orders(Query(query): Query<RecentOrdersQuery>) -> ApiResult {
    info!("Multi-region Recent Orders API called");
    let rows = OrderService::recent_orders(query.limit).await?;

    let orders: Vec<JsonValue> = rows
        .iter()
        .map(|row| {
            json!({
                "order_id": row.get("o_id").cloned().unwrap_or(JsonValue::Null),
                "warehouse_id": row.get("o_w_id").cloned().unwrap_or(JsonValue::Null),
                "district_id": row.get("o_d_id").cloned().unwrap_or(JsonValue::Null),
                "customer_id": row.get("o_c_id").cloned().unwrap_or(JsonValue::Null),
                "order_date": row.get("o_entry_d").cloned().unwrap_or(JsonValue::Null),
                "customer_name": customer_name(row),
                "status": row.get("status").cloned().unwrap_or(JsonValue::Null),
                "region": ENV_CONFIG.region_name,
            })
        })
        .collect();

    info!("Retrieved {} recent orders with region information", orders.len());
    Ok(Json(json!({
        "success": true,
        "orders": orders,
        "current_region": ENV_CONFIG.region_name,
        "provider": connector::provider_name(),
    })))
}
