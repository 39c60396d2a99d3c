use crate::AppState;
use axum::{response::IntoResponse, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::{OpenApi, ToSchema};

/// Server time in the shape the mobile client reads (`timestamp.date`).
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Timestamp {
    /// "YYYY-MM-DD HH:MM:SS.ffffff"
    pub date: String,
    pub timezone_type: u8,
    pub timezone: String,
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(now: DateTime<Utc>) -> Self {
        Self {
            date: now.format("%Y-%m-%d %H:%M:%S%.6f").to_string(),
            timezone_type: 3,
            timezone: "UTC".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatusResponse {
    pub message: String,
    pub status: String,
    pub timestamp: Timestamp,
}

#[utoipa::path(
    get,
    path = "/",
    tag = "status",
    responses(
        (status = 200, description = "Service is up", body = StatusResponse)
    )
)]
pub async fn status() -> impl IntoResponse {
    Json(StatusResponse {
        message: "Hello from the Rextract backend!".to_string(),
        status: "success".to_string(),
        timestamp: Utc::now().into(),
    })
}

/// Returns the router for the status endpoint (merged at the root)
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(status))
}

#[derive(OpenApi)]
#[openapi(paths(status), components(schemas(StatusResponse, Timestamp)))]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 14, 5, 7).unwrap();
        let timestamp = Timestamp::from(at);
        assert_eq!(timestamp.date, "2025-03-09 14:05:07.000000");
        assert_eq!(timestamp.timezone, "UTC");
    }

    #[tokio::test]
    async fn test_status_body() {
        let response = status().await.into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "success");
        assert!(body["timestamp"]["date"].is_string());
    }
}
