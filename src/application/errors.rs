//! Error types shared by the use cases.

use thiserror::Error;

use crate::application::cache::LazyCacheError;
use crate::application::ports::RepositoryError;
use crate::domain::errors::DomainError;

/// Error type for assessment use cases (lookup, outcome linking)
#[derive(Debug, Error)]
pub enum AssessmentUseCaseError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Cache error: {0}")]
    Cache(#[from] LazyCacheError),

    #[error("Assessment not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Error type for outcome search
#[derive(Debug, Error)]
pub enum OutcomeUseCaseError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Cache error: {0}")]
    Cache(#[from] LazyCacheError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Error type for reports
#[derive(Debug, Error)]
pub enum ReportUseCaseError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Cache error: {0}")]
    Cache(#[from] LazyCacheError),
}
