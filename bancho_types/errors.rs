use thiserror::Error;

pub mod app_error;
pub mod db_error;

pub use app_error::AppError;
pub use db_error::DbError;

pub type Result<T, E = ApplicationError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<sqlx::Error> for ApplicationError {
    fn from(err: sqlx::Error) -> Self {
        ApplicationError::Db(DbError::Database(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vanished_request_is_a_db_error() {
        let err: ApplicationError = DbError::MapRequestVanished(17).into();
        assert!(matches!(err, ApplicationError::Db(DbError::MapRequestVanished(17))));
        assert_eq!(err.to_string(), "Map request with ID 17 vanished right after insert");
    }

    #[test]
    fn test_caller_errors_are_app_errors() {
        let err: ApplicationError = AppError::EmptyUpdate.into();
        assert!(matches!(err, ApplicationError::App(AppError::EmptyUpdate)));
        assert_eq!(err.to_string(), "Must provide at least one field to update");
    }

    #[test]
    fn test_driver_errors_are_wrapped() {
        let err: ApplicationError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApplicationError::Db(DbError::Database(sqlx::Error::RowNotFound))));
    }
}
