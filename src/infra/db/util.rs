use sqlx::error::ErrorKind;

use crate::application::repos::RepoError;

/// SQLSTATE raised when a statement is cancelled (e.g. `statement_timeout`).
const QUERY_CANCELED: &str = "57014";

pub fn map_sqlx_error(err: sqlx::Error) -> RepoError {
    match err {
        sqlx::Error::RowNotFound => RepoError::NotFound,
        sqlx::Error::PoolTimedOut => RepoError::Timeout,
        sqlx::Error::Database(db) => match db.kind() {
            ErrorKind::UniqueViolation => RepoError::Duplicate {
                constraint: db.constraint().unwrap_or("unknown").to_string(),
            },
            ErrorKind::ForeignKeyViolation | ErrorKind::NotNullViolation => {
                RepoError::InvalidInput {
                    message: db.message().to_string(),
                }
            }
            ErrorKind::CheckViolation => RepoError::Integrity {
                message: db.message().to_string(),
            },
            _ if db.code().as_deref() == Some(QUERY_CANCELED) => RepoError::Timeout,
            _ => RepoError::from_persistence(db.message()),
        },
        other => RepoError::from_persistence(other),
    }
}

/// Escape `%`, `_` and `\` so user text matches literally inside `LIKE`.
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::RowNotFound),
            RepoError::NotFound
        ));
    }

    #[test]
    fn pool_timeout_maps_to_timeout() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolTimedOut),
            RepoError::Timeout
        ));
    }

    #[test]
    fn other_errors_are_persistence() {
        assert!(matches!(
            map_sqlx_error(sqlx::Error::PoolClosed),
            RepoError::Persistence(_)
        ));
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_done\\"), "100\\%\\_done\\\\");
        assert_eq!(escape_like("plain"), "plain");
    }
}
