use thiserror::Error;

use crate::domain::errors::DomainError;
use crate::sql::SqlTemplateError;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid SQL: {0}")]
    Sql(#[from] SqlTemplateError),

    #[error("Failed to bind parameter: {0}")]
    Bind(String),

    #[error("Corrupt row: {0}")]
    Decode(#[from] DomainError),
}
