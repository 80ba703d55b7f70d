// src/infra/errors.rs — Error types for callboard

use serde::Serialize;
use thiserror::Error;

/// Failure classes reported by the data access layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Connection,
    Query,
    DataShape,
    Timeout,
    Config,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Connection => "connection",
            ErrorKind::Query => "query",
            ErrorKind::DataShape => "data_shape",
            ErrorKind::Timeout => "timeout",
            ErrorKind::Config => "config",
            ErrorKind::Other => "other",
        }
    }
}

#[derive(Error, Debug)]
pub enum DashError {
    // Store errors
    #[error("Store unreachable: {0}")]
    Connection(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Unexpected result shape: {0}")]
    DataShape(String),

    #[error("'{operation}' timed out after {secs}s")]
    Timeout { operation: &'static str, secs: u64 },

    // User errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DashError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DashError::Connection(_) => ErrorKind::Connection,
            DashError::Query(_) => ErrorKind::Query,
            DashError::DataShape(_) => ErrorKind::DataShape,
            DashError::Timeout { .. } => ErrorKind::Timeout,
            DashError::Config(_) => ErrorKind::Config,
            DashError::Io(_) | DashError::Other(_) => ErrorKind::Other,
        }
    }
}

impl From<rusqlite::Error> for DashError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as E;

        match &err {
            E::InvalidColumnIndex(_)
            | E::InvalidColumnName(_)
            | E::InvalidColumnType(..)
            | E::FromSqlConversionFailure(..)
            | E::IntegralValueOutOfRange(..) => DashError::DataShape(err.to_string()),
            E::SqliteFailure(code, _)
                if matches!(
                    code.code,
                    ErrorCode::CannotOpen
                        | ErrorCode::DatabaseBusy
                        | ErrorCode::DatabaseLocked
                        | ErrorCode::NotADatabase
                        | ErrorCode::PermissionDenied
                ) =>
            {
                DashError::Connection(err.to_string())
            }
            _ => DashError::Query(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(DashError::Connection("x".into()).kind(), ErrorKind::Connection);
        assert_eq!(DashError::Query("x".into()).kind(), ErrorKind::Query);
        assert_eq!(DashError::DataShape("x".into()).kind(), ErrorKind::DataShape);
        assert_eq!(
            DashError::Timeout {
                operation: "fetch_interval_traffic",
                secs: 5
            }
            .kind(),
            ErrorKind::Timeout
        );
    }

    #[test]
    fn test_missing_column_is_data_shape() {
        let err: DashError = rusqlite::Error::InvalidColumnName("received".into()).into();
        assert_eq!(err.kind(), ErrorKind::DataShape);
    }

    #[test]
    fn test_unknown_table_is_query_failure() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err = conn
            .prepare("SELECT * FROM no_such_table")
            .map(|_| ())
            .unwrap_err();
        let err: DashError = err.into();
        assert_eq!(err.kind(), ErrorKind::Query);
    }

    #[test]
    fn test_timeout_message() {
        let err = DashError::Timeout {
            operation: "fetch_agent_breakdown",
            secs: 10,
        };
        assert_eq!(err.to_string(), "'fetch_agent_breakdown' timed out after 10s");
    }
}
