//! Interop shim that forwards raw command documents to the `mondocks`
//! MongoDB database.
//!
//! The two entry points, [`save_post`] and [`find_posts`], open a fresh
//! connection to [`config::DEFAULT_MONGO_URI`] on every call. Use
//! [`gateway::CommandGateway`] directly for a different endpoint or a shared
//! connection.

pub mod config;
pub mod db_mongo;
pub mod error;
pub mod gateway;
pub mod health;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use mongodb::bson::Document;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::{ConnectionMode, GatewayConfig};
pub use db_mongo::extract_first_batch;
pub use error::GatewayError;
pub use gateway::CommandGateway;

/// Run `command` against the default database and return the raw response.
pub async fn save_post(command: Document) -> Result<Document, GatewayError> {
    CommandGateway::default().save_post(command).await
}

/// Run a query command against the default database and return
/// `cursor.firstBatch`, or `None` when the response has no such path.
pub async fn find_posts(command: Document) -> Result<Option<Vec<Document>>, GatewayError> {
    CommandGateway::default().find_posts(command).await
}

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<CommandGateway>,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/posts", post(routes::save_post))
        .route("/posts/find", post(routes::find_posts))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
