use crate::api::envelope::{ApiError, ApiResult};
use crate::service::acid::AcidTests;
use axum::extract::Path;
use axum::Json;
use serde_json::Value as JsonValue;
use tracing::info;

/// `POST /api/test/acid/{test_type}` — runs one sanity check or the suite.
pub async fn run(Path(test_type): Path<String>) -> ApiResult {
    info!("ACID test requested: {}", test_type);

    let result: JsonValue = match test_type.as_str() {
        "atomicity" => to_value(AcidTests::test_atomicity().await)?,
        "consistency" => to_value(AcidTests::test_consistency().await)?,
        "isolation" => to_value(AcidTests::test_isolation().await)?,
        "durability" => to_value(AcidTests::test_durability().await)?,
        "all" => AcidTests::run_all().await,
        other => {
            return Err(ApiError::BadRequest(format!("Unknown test type: {other}")));
        }
    };

    Ok(Json(result))
}

fn to_value<T: serde::Serialize>(value: T) -> Result<JsonValue, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.into()))
}
