use crate::database::connector;
use crate::service::analytics::AnalyticsService;
use crate::service::inventory::{InventoryFilters, InventoryService};
use crate::service::order::{OrderFilters, OrderService};
use crate::service::payment::{PaymentFilters, PaymentService};
use crate::util::pagination::{offset_for, PageInfo};
use axum::extract::Query;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use tracing::{error, info};

fn default_page() -> u64 {
    1
}

fn default_list_limit() -> u64 {
    50
}

fn default_inventory_limit() -> u64 {
    100
}

/// Main dashboard: key metrics plus the provider label.
pub async fn dashboard() -> Json<JsonValue> {
    info!("Dashboard page accessed");
    let metrics = AnalyticsService::dashboard_metrics().await;
    Json(json!({
        "metrics": metrics,
        "provider": connector::provider_name(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct OrdersPageQuery {
    pub warehouse_id: Option<i64>,
    pub district_id: Option<i64>,
    pub customer_id: Option<i64>,
    pub status: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: u64,
    #[serde(default = "default_page")]
    pub page: u64,
}

pub async fn orders(Query(query): Query<OrdersPageQuery>) -> Json<JsonValue> {
    let limit = query.limit.max(1);
    let offset = offset_for(query.page, limit);
    info!(
        "Orders page accessed: warehouse_id={:?}, district_id={:?}, customer_id={:?}, status={:?}, limit={}, page={}",
        query.warehouse_id, query.district_id, query.customer_id, query.status, limit, query.page
    );

    let filters = OrderFilters {
        warehouse_id: query.warehouse_id,
        district_id: query.district_id,
        customer_id: query.customer_id,
        status: query.status.clone(),
    };
    let filters_echo = json!({
        "warehouse_id": query.warehouse_id,
        "district_id": query.district_id,
        "customer_id": query.customer_id,
        "status": query.status,
        "limit": limit,
    });

    match OrderService::get_orders(&filters, limit, offset).await {
        Ok(result) => {
            let total_count = result["total_count"].as_u64().unwrap_or(0);
            let warehouses = AnalyticsService::warehouses().await;
            info!(
                "Retrieved {} orders out of {} total",
                result["orders"].as_array().map_or(0, Vec::len),
                total_count
            );
            Json(json!({
                "orders": result["orders"],
                "warehouses": warehouses,
                "pagination": PageInfo::compute(query.page, limit, total_count),
                "filters": filters_echo,
            }))
        }
        Err(e) => {
            error!("Orders page error: {}", e);
            Json(json!({
                "orders": [],
                "warehouses": [],
                "pagination": PageInfo::empty(limit),
                "filters": filters_echo,
                "error": format!("Error loading orders: {e}"),
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InventoryPageQuery {
    pub warehouse_id: Option<i64>,
    pub threshold: Option<i64>,
    pub item_search: Option<String>,
    #[serde(default = "default_inventory_limit")]
    pub limit: u64,
    #[serde(default = "default_page")]
    pub page: u64,
}

pub async fn inventory(Query(query): Query<InventoryPageQuery>) -> Json<JsonValue> {
    let limit = query.limit.max(1);
    let offset = offset_for(query.page, limit);
    info!(
        "Inventory page accessed: warehouse_id={:?}, threshold={:?}, search='{}', limit={}, page={}",
        query.warehouse_id,
        query.threshold,
        query.item_search.as_deref().unwrap_or(""),
        limit,
        query.page
    );

    let filters = InventoryFilters {
        warehouse_id: query.warehouse_id,
        low_stock_threshold: query.threshold,
        item_search: query.item_search.clone(),
    };
    let filters_echo = json!({
        "warehouse_id": query.warehouse_id,
        "threshold": query.threshold,
        "item_search": query.item_search,
        "limit": limit,
    });

    match InventoryService::get_inventory_paginated(&filters, limit, offset).await {
        Ok(result) => {
            let total_count = result["total_count"].as_u64().unwrap_or(0);
            let warehouses = AnalyticsService::warehouses().await;
            info!(
                "Retrieved {} inventory items out of {} total",
                result["inventory"].as_array().map_or(0, Vec::len),
                total_count
            );
            Json(json!({
                "inventory": result["inventory"],
                "warehouses": warehouses,
                "pagination": PageInfo::compute(query.page, limit, total_count),
                "filters": filters_echo,
            }))
        }
        Err(e) => {
            error!("Inventory page error: {}", e);
            Json(json!({
                "inventory": [],
                "warehouses": [],
                "pagination": PageInfo::empty(limit),
                "filters": filters_echo,
                "error": format!("Error loading inventory: {e}"),
            }))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PaymentsPageQuery {
    pub warehouse_id: Option<i64>,
    pub district_id: Option<i64>,
    pub customer_id: Option<i64>,
    #[serde(default = "default_list_limit")]
    pub limit: u64,
    #[serde(default = "default_page")]
    pub page: u64,
}

pub async fn payments(Query(query): Query<PaymentsPageQuery>) -> Json<JsonValue> {
    let limit = query.limit.max(1);
    let offset = offset_for(query.page, limit);
    info!(
        "Payments page accessed: warehouse_id={:?}, district_id={:?}, customer_id={:?}, limit={}, page={}",
        query.warehouse_id, query.district_id, query.customer_id, limit, query.page
    );

    let filters = PaymentFilters {
        warehouse_id: query.warehouse_id,
        district_id: query.district_id,
        customer_id: query.customer_id,
    };
    let filters_echo = json!({
        "warehouse_id": query.warehouse_id,
        "district_id": query.district_id,
        "customer_id": query.customer_id,
        "limit": limit,
    });

    match PaymentService::get_payment_history_paginated(&filters, limit, offset).await {
        Ok(result) => {
            let total_count = result["total_count"].as_u64().unwrap_or(0);
            let warehouses = AnalyticsService::warehouses().await;
            info!(
                "Retrieved {} payment records out of {} total",
                result["payments"].as_array().map_or(0, Vec::len),
                total_count
            );
            Json(json!({
                "payments": result["payments"],
                "warehouses": warehouses,
                "pagination": PageInfo::compute(query.page, limit, total_count),
                "filters": filters_echo,
            }))
        }
        Err(e) => {
            error!("Payments page error: {}", e);
            Json(json!({
                "payments": [],
                "warehouses": [],
                "pagination": PageInfo::empty(limit),
                "filters": filters_echo,
                "error": format!("Error loading payments: {e}"),
            }))
        }
    }
}
