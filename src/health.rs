use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    status: String,
    database: String,
}

pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthCheckResponse>) {
    match state.gateway.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthCheckResponse {
                status: "ok".to_string(),
                database: "reachable".to_string(),
            }),
        ),
        Err(e) => {
            tracing::error!("Health check could not reach MongoDB: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthCheckResponse {
                    status: "degraded".to_string(),
                    database: "unreachable".to_string(),
                }),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{app, config::GatewayConfig, gateway::CommandGateway};
    use axum::{body::Body, http::Request};
    use std::{sync::Arc, time::Duration};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_reports_unreachable_database() {
        let state = AppState {
            gateway: Arc::new(CommandGateway::new(GatewayConfig {
                mongo_uri: "mongodb://127.0.0.1:1/?connectTimeoutMS=200".to_string(),
                server_selection_timeout: Some(Duration::from_millis(300)),
                ..GatewayConfig::default()
            })),
        };

        let response = app(state)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], "unreachable");
    }
}
