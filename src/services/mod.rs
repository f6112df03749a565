//! Service layer: the contact store, view derivation, mutations, exports and
//! the delete confirmation gate.

use thiserror::Error;

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

pub mod delete_gate;
pub mod export;
pub mod main;
pub mod mutations;
pub mod store;
pub mod view;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("{0}")]
    Form(String),

    #[error("contact not found")]
    NotFound,

    /// The request conflicts with an operation already in progress.
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Export(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}
