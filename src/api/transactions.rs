use crate::api::envelope::{parse_body, require_fields, ApiError, ApiResult};
use crate::service::inventory::InventoryService;
use crate::service::order::{NewOrderRequest, OrderService};
use crate::service::payment::PaymentService;
use axum::extract::{Path, Query};
use axum::Json;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::time::Instant;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub warehouse_id: i64,
    pub district_id: i64,
    pub customer_id: i64,
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct DeliveryRequest {
    pub warehouse_id: i64,
    pub carrier_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct StockLevelQuery {
    #[serde(default = "default_stock_threshold")]
    pub threshold: i64,
}

fn default_stock_threshold() -> i64 {
    10
}

/// `POST /api/new-order` — TPC-C New Order.
pub async fn new_order(Json(body): Json<JsonValue>) -> ApiResult {
    let started = Instant::now();
    info!("TPC-C New Order Transaction API called");

    require_fields(&body, &["warehouse_id", "district_id", "customer_id", "items"])?;
    let request: NewOrderRequest = parse_body(body)?;

    let result = OrderService::execute_new_order(&request).await?;
    info!(
        "New Order Transaction completed in {:.2}ms",
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(Json(result))
}

/// `POST /api/payment` — TPC-C Payment.
pub async fn payment(Json(body): Json<JsonValue>) -> ApiResult {
    let started = Instant::now();
    info!("TPC-C Payment Transaction API called");

    require_fields(&body, &["warehouse_id", "district_id", "customer_id", "amount"])?;
    let request: PaymentRequest = parse_body(body)?;
    let amount = Decimal::from_f64(request.amount)
        .ok_or_else(|| ApiError::BadRequest("amount must be a finite number".to_string()))?;

    let result = PaymentService::execute_payment(
        request.warehouse_id,
        request.district_id,
        request.customer_id,
        amount,
    )
    .await?;
    info!(
        "Payment Transaction completed in {:.2}ms",
        started.elapsed().as_secs_f64() * 1000.0
    );
    Ok(Json(result))
}

/// `GET /api/order-status/{w}/{d}/{c}` — TPC-C Order Status.
pub async fn order_status(
    Path((warehouse_id, district_id, customer_id)): Path<(i64, i64, i64)>,
) -> ApiResult {
    let result = OrderService::get_order_status(warehouse_id, district_id, customer_id).await?;
    Ok(Json(result))
}

/// `POST /api/delivery` — TPC-C Delivery.
pub async fn delivery(Json(body): Json<JsonValue>) -> ApiResult {
    require_fields(&body, &["warehouse_id", "carrier_id"])?;
    let request: DeliveryRequest = parse_body(body)?;

    let result = OrderService::execute_delivery(request.warehouse_id, request.carrier_id).await?;
    Ok(Json(result))
}

/// `GET /api/stock-level/{w}/{d}` — TPC-C Stock Level.
pub async fn stock_level(
    Path((warehouse_id, district_id)): Path<(i64, i64)>,
    Query(query): Query<StockLevelQuery>,
) -> ApiResult {
    let result =
        InventoryService::get_stock_level(warehouse_id, district_id, query.threshold).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_order_required_fields() {
        let body = json!({"warehouse_id": 1, "district_id": 1, "customer_id": 1});
        let err = require_fields(&body, &["warehouse_id", "district_id", "customer_id", "items"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: items");
    }

    #[test]
    fn test_payment_request_parses() {
        let request: PaymentRequest = parse_body(json!({
            "warehouse_id": 1, "district_id": 2, "customer_id": 3, "amount": 12.5,
        }))
        .unwrap();
        assert_eq!(request.amount, 12.5);
    }

    #[test]
    fn test_delivery_request_rejects_wrong_types() {
        assert!(parse_body::<DeliveryRequest>(json!({
            "warehouse_id": "west", "carrier_id": 1,
        }))
        .is_err());
    }

    #[test]
    fn test_stock_level_threshold_default() {
        let query: StockLevelQuery = serde_json::from_value(json!({})).unwrap();
        assert_eq!(query.threshold, 10);
    }
}
