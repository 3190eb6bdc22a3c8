use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error_response;
use crate::crud::{category_list, CategoryFilters};
use crate::db::session;
use crate::middleware::logging::to_response;
use crate::strategies::HierarchyFilter;

pub fn category_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/:id/children", get(get_children))
        .route("/categories/:id/children/", get(get_children))
        .route("/categories/:id/parents", get(get_parents))
        .route("/categories/:id/parents/", get(get_parents))
        .layer(Extension(db))
}

async fn get_categories(Extension(db): Extension<Arc<DatabaseConnection>>) -> Response {
    let filters = CategoryFilters {
        deactivated: Some(false),
        level: Some(1),
        ..Default::default()
    };
    list(&db, filters).await
}

async fn get_children(
    Path(id): Path<Uuid>,
    Query(params): Query<LevelQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    list(&db, related(id, true, params.level)).await
}

async fn get_parents(
    Path(id): Path<Uuid>,
    Query(params): Query<LevelQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    list(&db, related(id, false, params.level)).await
}

async fn list(db: &DatabaseConnection, filters: CategoryFilters) -> Response {
    let result = session(db, |txn| {
        Box::pin(async move { category_list(txn, filters).await })
    })
    .await;

    match result {
        Ok(categories) => to_response((StatusCode::OK, Json(categories)), Ok(())),
        Err(err) => error_response(err),
    }
}

//utils
fn related(id: Uuid, descendants: bool, level: Option<i64>) -> CategoryFilters {
    CategoryFilters {
        deactivated: Some(false),
        hierarchy: Some(HierarchyFilter {
            category_id: id,
            descendants: Some(descendants),
        }),
        level,
    }
}

//structs
#[derive(Deserialize)]
struct LevelQuery {
    level: Option<i64>,
}
