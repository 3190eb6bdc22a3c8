use sea_orm::DbErr;
use thiserror::Error;

use crate::strategies::Capability;

/// Failures raised while composing a listing query.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Invalid strategy name: {0}")]
    UnknownStrategy(String),
    #[error("Invalid sort direction: {0}")]
    InvalidDirection(String),
    #[error("{strategy} expects {expected}, got {got}")]
    TypeMismatch {
        strategy: &'static str,
        expected: &'static str,
        got: &'static str,
    },
    #[error("{strategy} requires {capability:?} in the base query")]
    MissingCapability {
        strategy: &'static str,
        capability: Capability,
    },
    #[error("Invalid hierarchy path: {0}")]
    InvalidPath(String),
}

impl StrategyError {
    /// Errors caused by request input rather than by how the engine was wired.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            StrategyError::UnknownStrategy(_)
                | StrategyError::InvalidDirection(_)
                | StrategyError::InvalidPath(_)
        )
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error(transparent)]
    Strategy(#[from] StrategyError),
    #[error("Database error: {0}")]
    Db(#[from] DbErr),
    #[error("{0} not found")]
    NotFound(String),
}
