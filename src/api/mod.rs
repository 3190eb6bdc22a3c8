pub mod params;
pub mod public;

use axum::{
    http::StatusCode,
    middleware,
    response::Response,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde_json::json;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::CatalogError;
use crate::middleware::logging::{logging_middleware, to_response, ApiError};
use public::public_api_router;

pub fn create_api_router(shared_db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .nest("/api", public_api_router(shared_db))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Maps a failed listing to its HTTP response. Server-side failures keep their
/// details in the log extension only.
pub fn error_response(err: CatalogError) -> Response {
    let (status, ext) = match &err {
        CatalogError::Strategy(inner) if inner.is_client_error() => {
            (StatusCode::BAD_REQUEST, ApiError::QueryError(inner.to_string()))
        }
        CatalogError::Strategy(inner) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::QueryError(inner.to_string()),
        ),
        CatalogError::NotFound(_) => (StatusCode::NOT_FOUND, ApiError::General(err.to_string())),
        CatalogError::Db(inner) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::DbError(inner.to_string()),
        ),
    };

    let message = if status.is_server_error() {
        "Internal server error.".to_string()
    } else {
        err.to_string()
    };

    to_response((status, Json(json!({ "error": message }))), Err(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrategyError;
    use crate::strategies::Capability;
    use sea_orm::DbErr;

    #[test]
    fn status_mapping() {
        let cases = [
            (
                CatalogError::from(StrategyError::UnknownStrategy("rating".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                CatalogError::from(StrategyError::InvalidDirection("up".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                CatalogError::from(StrategyError::MissingCapability {
                    strategy: "popular",
                    capability: Capability::ReviewsJoined,
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CatalogError::from(StrategyError::TypeMismatch {
                    strategy: "activity",
                    expected: "bool",
                    got: "text",
                }),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                CatalogError::NotFound("Product 1".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                CatalogError::Db(DbErr::Custom("boom".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            let response = error_response(err);
            assert_eq!(response.status(), status);
            assert!(response
                .extensions()
                .get::<Result<(), ApiError>>()
                .is_some_and(|ext| ext.is_err()));
        }
    }
}
