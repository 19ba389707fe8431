use mongodb::{Database, bson::Document};
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::config::{ConnectionMode, GatewayConfig};
use crate::db_mongo::{self, command_name, extract_first_batch};
use crate::error::GatewayError;

/// Forwards raw command documents to the configured database.
pub struct CommandGateway {
    config: GatewayConfig,
    shared: OnceCell<Database>,
}

impl CommandGateway {
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            config,
            shared: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Get a database handle.
    ///
    /// In `PerCall` mode every call opens a fresh client. In `Shared` mode the
    /// first successful connection is kept; a failed attempt is not cached.
    pub async fn connect(&self) -> Result<Database, GatewayError> {
        match self.config.connection_mode {
            ConnectionMode::PerCall => db_mongo::open_database(&self.config).await,
            ConnectionMode::Shared => self
                .shared
                .get_or_try_init(|| db_mongo::open_database(&self.config))
                .await
                .cloned(),
        }
    }

    pub async fn ping(&self) -> Result<(), GatewayError> {
        self.connect().await.map(|_| ())
    }

    /// Run one command verbatim and return the raw response.
    pub async fn execute(&self, command: Document) -> Result<Document, GatewayError> {
        let db = self.connect().await?;
        let command_id = Uuid::new_v4();
        let name = command_name(&command).to_string();

        tracing::info!(
            "Forwarding command '{}' to '{}' (id: {})",
            name,
            db.name(),
            command_id
        );

        db.run_command(command).await.map_err(|e| {
            let err = GatewayError::from_command_error(e);
            tracing::error!(
                "Command '{}' failed (id: {}, connection: {}): {}",
                name,
                command_id,
                err.is_connection(),
                err.driver_error()
            );
            err
        })
    }

    pub async fn save_post(&self, command: Document) -> Result<Document, GatewayError> {
        self.execute(command).await
    }

    /// Run a query-shaped command and return `cursor.firstBatch`.
    ///
    /// A response without that path gives `Ok(None)`, not an error.
    pub async fn find_posts(&self, command: Document) -> Result<Option<Vec<Document>>, GatewayError> {
        let response = self.execute(command).await?;
        let batch = extract_first_batch(&response);
        if batch.is_none() {
            tracing::debug!("Response carried no cursor.firstBatch");
        }
        Ok(batch)
    }
}

impl Default for CommandGateway {
    fn default() -> Self {
        Self::new(GatewayConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;
    use std::time::Duration;

    // Nothing listens on port 1, so server selection gives up quickly.
    fn unreachable_config(mode: ConnectionMode) -> GatewayConfig {
        GatewayConfig {
            mongo_uri: "mongodb://127.0.0.1:1/?connectTimeoutMS=200".to_string(),
            connection_mode: mode,
            server_selection_timeout: Some(Duration::from_millis(300)),
            ..GatewayConfig::default()
        }
    }

    #[tokio::test]
    async fn test_save_post_unreachable_is_connection_error() {
        let gateway = CommandGateway::new(unreachable_config(ConnectionMode::PerCall));
        let err = gateway
            .save_post(doc! { "insert": "posts", "documents": [ { "title": "hello" } ] })
            .await
            .unwrap_err();
        assert!(err.is_connection(), "unexpected error: {err}");
    }

    #[tokio::test]
    async fn test_find_posts_unreachable_is_connection_error() {
        let gateway = CommandGateway::new(unreachable_config(ConnectionMode::PerCall));
        let result = gateway.find_posts(doc! { "find": "posts", "filter": {} }).await;
        assert!(matches!(result, Err(GatewayError::Connection(_))));
    }

    #[tokio::test]
    async fn test_shared_mode_does_not_cache_failures() {
        let gateway = CommandGateway::new(unreachable_config(ConnectionMode::Shared));
        assert!(gateway.ping().await.unwrap_err().is_connection());
        assert!(gateway.ping().await.unwrap_err().is_connection());
        assert!(gateway.shared.get().is_none());
    }

    #[tokio::test]
    async fn test_invalid_uri_is_connection_error() {
        let gateway = CommandGateway::new(GatewayConfig {
            mongo_uri: "not-a-mongo-uri".to_string(),
            ..GatewayConfig::default()
        });
        let err = gateway.ping().await.unwrap_err();
        assert!(err.is_connection());
    }

    #[test]
    fn test_default_gateway_targets_mondocks() {
        let gateway = CommandGateway::default();
        assert_eq!(gateway.config().database_name, "mondocks");
        assert_eq!(gateway.config().connection_mode, ConnectionMode::PerCall);
    }
}
