use std::time::Duration;

use thiserror::Error;

/// Failure of a single repository call.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("query did not complete within {0:?}")]
    Timeout(Duration),

    #[error("no matching row")]
    NotFound,

    #[error("failed to decode row: {0}")]
    Scan(#[source] sqlx::Error),

    #[error("database connection failed: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("query failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => RepoError::NotFound,
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::Decode(_) => RepoError::Scan(err),
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => RepoError::Connection(err),
            other => RepoError::Query(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_becomes_not_found() {
        assert!(matches!(
            RepoError::from(sqlx::Error::RowNotFound),
            RepoError::NotFound
        ));
    }

    #[test]
    fn decode_failures_are_scan_errors() {
        let err = sqlx::Error::ColumnNotFound("image".into());
        assert!(matches!(RepoError::from(err), RepoError::Scan(_)));
    }

    #[test]
    fn pool_failures_are_connection_errors() {
        assert!(matches!(
            RepoError::from(sqlx::Error::PoolClosed),
            RepoError::Connection(_)
        ));
        assert!(matches!(
            RepoError::from(sqlx::Error::PoolTimedOut),
            RepoError::Connection(_)
        ));
    }

    #[test]
    fn timeout_message_names_the_deadline() {
        let err = RepoError::Timeout(Duration::from_secs(3));
        assert_eq!(err.to_string(), "query did not complete within 3s");
    }
}
