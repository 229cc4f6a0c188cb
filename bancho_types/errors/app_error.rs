use thiserror::Error;

/// Errors for caller mistakes and misconfiguration.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Must provide at least one filter")]
    MissingFilter,

    #[error("Must provide at least one field to update")]
    EmptyUpdate,

    #[error("You need to set env {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for env {0}")]
    InvalidEnv(&'static str),
}
