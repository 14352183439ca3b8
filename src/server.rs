use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::CorsLayer;

use crate::api::{acid, health, multi_region, pages, transactions};
use crate::util::env_config::ENV_CONFIG;

pub fn app() -> Router {
    Router::new()
        .route("/", get(pages::dashboard))
        .route("/orders", get(pages::orders))
        .route("/inventory", get(pages::inventory))
        .route("/payments", get(pages::payments))
        .route("/api/new-order", post(transactions::new_order))
        .route("/api/payment", post(transactions::payment))
        .route(
            "/api/order-status/{warehouse_id}/{district_id}/{customer_id}",
            get(transactions::order_status),
        )
        .route("/api/delivery", post(transactions::delivery))
        .route(
            "/api/stock-level/{warehouse_id}/{district_id}",
            get(transactions::stock_level),
        )
        .route("/api/health", get(health::health))
        .route("/api/test/acid/{test_type}", post(acid::run))
        .route(
            "/api/test/multi-region/create-order",
            post(multi_region::create_order),
        )
        .route(
            "/api/test/multi-region/orders-by-region",
            get(multi_region::orders_by_region),
        )
        .route(
            "/api/test/multi-region/recent-orders",
            get(multi_region::recent_orders),
        )
        .fallback(not_found)
        .layer(CorsLayer::permissive())
}

async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Resource not found"})),
    )
}

pub async fn run_server() -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", ENV_CONFIG.port);
    tracing::info!("HTTP server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app()).await?;

    Ok(())
}
