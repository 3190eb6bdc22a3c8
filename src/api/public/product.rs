use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Response,
    routing::get,
    Json, Router,
};
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::api::error_response;
use crate::api::params::ListParams;
use crate::crud::{get_product_reviews, product_detail, products_list, ProductListFilters};
use crate::db::session;
use crate::middleware::logging::{to_response, ApiError};

pub fn product_router(db: Arc<DatabaseConnection>) -> Router {
    Router::new()
        .route("/products", get(get_products))
        .route("/products/:id/detail", get(get_product))
        .route("/products/:id/reviews", get(get_reviews))
        .layer(Extension(db))
}

async fn get_products(
    Query(params): Query<GetProductsQuery>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    if let Err(errors) = params.validate() {
        return to_response(
            (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "Invalid query parameters",
                    "fields": errors
                })),
            ),
            Err(ApiError::ValidationFail(errors.to_string())),
        );
    }

    let page = params.page();
    let (limit, offset) = (page.limit(), page.offset());
    let ordering = page.ordering("id");
    let filters = ProductListFilters {
        activity: Some(true),
        category: params.category_id,
        search: params.search,
        popular: params.min_avg_rating,
        discount: params.min_discount,
    };

    let result = session(&db, |txn| {
        Box::pin(async move { products_list(txn, limit, offset, filters, &ordering[..]).await })
    })
    .await;

    match result {
        Ok(products) => to_response((StatusCode::OK, Json(products)), Ok(())),
        Err(err) => error_response(err),
    }
}

async fn get_product(
    Path(id): Path<Uuid>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let result = session(&db, |txn| {
        Box::pin(async move { product_detail(txn, id, Some(true)).await })
    })
    .await;

    match result {
        Ok(product) => to_response((StatusCode::OK, Json(product)), Ok(())),
        Err(err) => error_response(err),
    }
}

async fn get_reviews(
    Path(id): Path<Uuid>,
    Query(params): Query<ListParams>,
    Extension(db): Extension<Arc<DatabaseConnection>>,
) -> Response {
    let (limit, offset) = (params.limit(), params.offset());
    let ordering = params.ordering("");

    let result = session(&db, |txn| {
        Box::pin(async move { get_product_reviews(txn, id, limit, offset, &ordering[..]).await })
    })
    .await;

    match result {
        Ok(reviews) => to_response((StatusCode::OK, Json(reviews)), Ok(())),
        Err(err) => error_response(err),
    }
}

//structs
#[derive(Debug, Default, Deserialize, Validate)]
struct GetProductsQuery {
    skip: Option<u64>,
    limit: Option<u64>,
    ordering: Option<String>,
    search: Option<String>,
    category_id: Option<Uuid>,
    #[validate(range(max = 5.0))]
    min_avg_rating: Option<f64>,
    #[validate(range(min = 0.0))]
    min_discount: Option<f64>,
}

impl GetProductsQuery {
    fn page(&self) -> ListParams {
        ListParams {
            skip: self.skip,
            limit: self.limit,
            ordering: self.ordering.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_and_discount_bounds() {
        let valid = GetProductsQuery {
            min_avg_rating: Some(5.0),
            min_discount: Some(0.0),
            ..Default::default()
        };
        assert!(valid.validate().is_ok());

        let invalid = GetProductsQuery {
            min_avg_rating: Some(5.5),
            min_discount: Some(-1.0),
            ..Default::default()
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("min_avg_rating"));
        assert!(fields.contains_key("min_discount"));
    }

    #[test]
    fn paging_comes_from_query() {
        let query = GetProductsQuery {
            skip: Some(3),
            limit: Some(100),
            ordering: Some("popular, -id".into()),
            ..Default::default()
        };
        let page = query.page();
        assert_eq!(page.offset(), 3);
        assert_eq!(page.limit(), 30);
        assert_eq!(page.ordering("id"), vec!["popular", "-id"]);
    }
}
