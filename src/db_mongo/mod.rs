pub mod response;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};

use crate::config::GatewayConfig;
use crate::error::GatewayError;

pub use response::{command_name, extract_first_batch};

/// Build a MongoDB client for `uri`.
///
/// The driver connects lazily, so this only fails on a malformed URI or an
/// SRV lookup failure.
pub async fn create_client(
    uri: &str,
    server_selection_timeout: Option<std::time::Duration>,
) -> mongodb::error::Result<Client> {
    let mut options = ClientOptions::parse(uri).await?;
    if let Some(timeout) = server_selection_timeout {
        options.server_selection_timeout = Some(timeout);
    }
    Client::with_options(options)
}

/// Open a client, bind it to the configured database and ping it.
pub async fn open_database(config: &GatewayConfig) -> Result<Database, GatewayError> {
    let client = create_client(&config.mongo_uri, config.server_selection_timeout)
        .await
        .map_err(GatewayError::Connection)?;

    let db = client.database(&config.database_name);

    // Ping to verify connection
    db.run_command(doc! { "ping": 1 })
        .await
        .map_err(GatewayError::Connection)?;

    tracing::debug!("Connected to MongoDB database '{}'", db.name());
    Ok(db)
}
