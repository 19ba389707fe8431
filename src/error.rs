use mongodb::error::{Error as MongoError, ErrorKind};
use thiserror::Error;

/// Failures surfaced by the command gateway.
///
/// Both variants wrap the driver error as-is; a missing `cursor.firstBatch`
/// is not an error and never shows up here.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Failed to connect to MongoDB: {0}")]
    Connection(#[source] MongoError),

    #[error("MongoDB command failed: {0}")]
    Command(#[source] MongoError),
}

impl GatewayError {
    /// Sort an error raised while running a command: transport and auth
    /// failures still count as connection errors.
    pub fn from_command_error(err: MongoError) -> Self {
        if is_connection_error(&err) {
            GatewayError::Connection(err)
        } else {
            GatewayError::Command(err)
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, GatewayError::Connection(_))
    }

    pub fn driver_error(&self) -> &MongoError {
        match self {
            GatewayError::Connection(e) | GatewayError::Command(e) => e,
        }
    }
}

fn is_connection_error(err: &MongoError) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Io(_)
            | ErrorKind::ServerSelection { .. }
            | ErrorKind::DnsResolve { .. }
            | ErrorKind::Authentication { .. }
            | ErrorKind::ConnectionPoolCleared { .. }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_is_connection() {
        let err: MongoError = io::Error::new(io::ErrorKind::ConnectionRefused, "refused").into();
        let classified = GatewayError::from_command_error(err);
        assert!(classified.is_connection());
        assert!(matches!(*classified.driver_error().kind, ErrorKind::Io(_)));
    }

    #[test]
    fn test_other_errors_are_command_failures() {
        let classified = GatewayError::from_command_error(MongoError::custom("no such command"));
        assert!(matches!(classified, GatewayError::Command(_)));
        assert!(!classified.is_connection());
        assert!(classified.to_string().starts_with("MongoDB command failed"));
    }
}
