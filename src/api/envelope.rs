use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value as JsonValue};
use thiserror::Error;
use tracing::error;

/// Transport-level failures. Validation maps to 400, everything else to 500;
/// both render the `{"error": …}` envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingField(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn error_body(message: &str) -> JsonValue {
    json!({"error": message})
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        if status.is_server_error() {
            error!("Request failed: {}", message);
        }
        (status, Json(error_body(&message))).into_response()
    }
}

pub type ApiResult = Result<Json<JsonValue>, ApiError>;

/// Rejects on the first missing field, mirroring the per-field validation
/// the transaction endpoints promise.
pub fn require_fields(body: &JsonValue, fields: &[&str]) -> Result<(), ApiError> {
    if !body.is_object() {
        return Err(ApiError::BadRequest(
            "Request body must be a JSON object".to_string(),
        ));
    }
    for field in fields {
        if body.get(*field).is_none() {
            return Err(ApiError::MissingField((*field).to_string()));
        }
    }
    Ok(())
}

pub fn parse_body<T: DeserializeOwned>(body: JsonValue) -> Result<T, ApiError> {
    serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid request body: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_validation_errors_are_400() {
        assert_eq!(
            ApiError::MissingField("items".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::BadRequest("nope".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_internal_errors_are_500() {
        let err = ApiError::from(anyhow::anyhow!("db down"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "db down");
    }

    #[test]
    fn test_error_body_shape() {
        assert_eq!(
            error_body("Missing required field: items"),
            json!({"error": "Missing required field: items"})
        );
    }

    #[test]
    fn test_require_fields_reports_first_missing() {
        let body = json!({"warehouse_id": 1});
        let err = require_fields(&body, &["warehouse_id", "district_id", "customer_id"])
            .unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: district_id");
    }

    #[test]
    fn test_require_fields_accepts_null_values() {
        // Presence is what is validated, not the value.
        let body = json!({"carrier_id": null});
        assert!(require_fields(&body, &["carrier_id"]).is_ok());
    }

    #[test]
    fn test_require_fields_rejects_non_object() {
        let err = require_fields(&json!([1, 2]), &["warehouse_id"]).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_parse_body_maps_to_bad_request() {
        #[derive(Debug, Deserialize)]
        struct Req {
            #[allow(dead_code)]
            warehouse_id: i64,
        }
        let err = parse_body::<Req>(json!({"warehouse_id": "one"})).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
