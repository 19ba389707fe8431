use axum::{
    extract::{Json, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mongodb::bson::{Bson, Document};
use serde_json::{Value, json};

use crate::{AppState, error::GatewayError};

// HTTP-facing errors
#[derive(Debug)]
pub enum ApiError {
    InvalidCommand(String),
    Gateway(GatewayError),
}

impl From<GatewayError> for ApiError {
    fn from(err: GatewayError) -> Self {
        ApiError::Gateway(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidCommand(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::InvalidCommand(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Gateway(err @ GatewayError::Connection(_)) => {
                (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
            ApiError::Gateway(err @ GatewayError::Command(_)) => {
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));
        (status, body).into_response()
    }
}

/// Turn an extended-JSON request body into a command document.
pub fn parse_command(body: Value) -> Result<Document, ApiError> {
    match Bson::try_from(body) {
        Ok(Bson::Document(command)) => Ok(command),
        Ok(_) => Err(ApiError::InvalidCommand(
            "Command must be a JSON object".to_string(),
        )),
        Err(e) => Err(ApiError::InvalidCommand(format!(
            "Invalid extended JSON command: {}",
            e
        ))),
    }
}

pub async fn save_post(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let command = parse_command(body)?;
    let response = state.gateway.save_post(command).await?;
    Ok(Json(Bson::Document(response).into_relaxed_extjson()))
}

pub async fn find_posts(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(body) = payload?;
    let command = parse_command(body)?;
    let posts = state.gateway.find_posts(command).await?.map(|batch| {
        batch
            .into_iter()
            .map(|doc| Bson::Document(doc).into_relaxed_extjson())
            .collect::<Vec<_>>()
    });
    Ok(Json(json!({ "posts": posts })))
}
